/// Run metadata written next to the rendered image.
use crate::boundary_filter::EdgeStatistics;
use crate::bounds::TerrainBounds;
use crate::context::RasterContext;
use crate::rasterizer::RasterReport;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Triangle counts through the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TriangleSummary {
    /// Produced by the Delaunay triangulation
    pub produced: usize,
    /// Removed by the boundary-quality filter
    pub rejected_by_filter: usize,
    /// Skipped for a near-zero planar area
    pub degenerate: usize,
    /// Painted at least one pixel
    pub rasterized: usize,
}

/// Wall-clock duration of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTiming {
    pub name: String,
    pub seconds: f64,
}

/// Everything worth knowing about one rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    /// Pixel size in metres (x, y)
    pub pixel_size: (f64, f64),
    pub bounds: TerrainBounds,
    pub point_count: usize,
    pub triangles: TriangleSummary,
    pub edge_statistics: Option<EdgeStatistics>,
    pub pixels_painted: usize,
    pub pixels_clamped: usize,
    pub coverage_percent: f64,
    /// Stages in execution order
    pub stages: Vec<StageTiming>,
}

impl RenderSummary {
    pub fn new(
        input: &Path,
        output: &Path,
        ctx: &RasterContext,
        point_count: usize,
        triangles: TriangleSummary,
        edge_statistics: Option<EdgeStatistics>,
        report: &RasterReport,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            width: ctx.width,
            height: ctx.height,
            pixel_size: (ctx.lg_pix, ctx.h_pix),
            bounds: ctx.bounds(),
            point_count,
            triangles,
            edge_statistics,
            pixels_painted: report.pixels_painted,
            pixels_clamped: report.pixels_clamped,
            coverage_percent: report.pixels_painted as f64 / ctx.pixel_count() as f64 * 100.0,
            stages: Vec::new(),
        }
    }
}

/// `<dir>/<stem>_metadata.json` for an image path.
pub fn metadata_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    image_path.with_file_name(format!("{stem}_metadata.json"))
}

pub struct MetadataWriter {
    path: PathBuf,
}

impl MetadataWriter {
    pub fn new(image_path: &Path) -> Self {
        Self {
            path: metadata_path(image_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the summary as pretty JSON.
    pub fn write(&self, summary: &RenderSummary) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Prints manifest-style summary for verification and debugging.
pub fn print_summary(summary: &RenderSummary) {
    println!("Render Summary:");
    println!("  Points: {}", summary.point_count);
    println!(
        "  Bounds: ({:.2}, {:.2}) to ({:.2}, {:.2}), depth {:.2} to {:.2}",
        summary.bounds.min_x,
        summary.bounds.min_y,
        summary.bounds.max_x,
        summary.bounds.max_y,
        summary.bounds.min_depth,
        summary.bounds.max_depth
    );
    println!(
        "  Triangles: {} produced, {} filtered, {} degenerate, {} rasterized",
        summary.triangles.produced,
        summary.triangles.rejected_by_filter,
        summary.triangles.degenerate,
        summary.triangles.rasterized
    );
    if let Some(stats) = &summary.edge_statistics {
        println!(
            "  Longest edge: mean {:.3} m, std {:.3} m, cut at {:.3} m",
            stats.mean, stats.std_dev, stats.threshold
        );
    }
    println!(
        "  Pixels: {} painted ({:.1}% coverage), {} clamped",
        summary.pixels_painted, summary.coverage_percent, summary.pixels_clamped
    );
}
