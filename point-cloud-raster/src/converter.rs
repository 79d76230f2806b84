/// Survey to shaded raster pipeline orchestrating every stage.
use crate::boundary_filter::{FilterOutcome, filter_triangles};
use crate::bounds::TerrainBounds;
use crate::colormap::Colormap;
use crate::context::{RasterContext, RenderSettings};
use crate::error::{RasterError, Result};
use crate::image_export::write_image;
use crate::metadata::{
    MetadataWriter, RenderSummary, StageTiming, TriangleSummary, print_summary,
};
use crate::point::PointCloud;
use crate::projection::Projection;
use crate::rasterizer::{
    PixelBuffer, RasterReport, Rasterizer, build_triangles, validate_mesh,
};
use crate::reader::{PointFormat, create_reader, read_points_with};
use crate::triangle::Triangle;
use crate::triangulation::triangulate;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default image written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "raster.ppm";

/// Grid size, rendering settings and console behaviour of one run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub width: usize,
    pub height: usize,
    pub settings: RenderSettings,
    /// Suppress stage logging and progress bars
    pub quiet: bool,
}

impl ConvertOptions {
    /// Default settings with a `width` x `height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            settings: RenderSettings::default(),
            quiet: false,
        }
    }
}

/// Turns a bathymetric survey into a shaded raster image and its metadata.
pub struct RasterConverter {
    /// Survey file, text or LAS/LAZ
    input_path: PathBuf,
    /// Image path, format chosen by extension
    output_path: PathBuf,
    options: ConvertOptions,
}

impl RasterConverter {
    /// Validate paths and grid size and create the output directory.
    pub fn new(input: &Path, output: &Path, options: ConvertOptions) -> Result<Self> {
        if !input.is_file() {
            return Err(RasterError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input file does not exist: {}", input.display()),
            )));
        }
        if options.width == 0 || options.height == 0 {
            return Err(RasterError::InvalidContext(format!(
                "raster size must be at least 1x1, got {}x{}",
                options.width, options.height
            )));
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            options,
        })
    }

    /// Run the whole pipeline: read, project, triangulate, filter, shade,
    /// rasterize, then write the image and its metadata.
    pub fn convert(&self) -> Result<RenderSummary> {
        let started = Instant::now();
        let mut timings = Vec::new();
        self.log(format!(
            "Rasterizing {} to {} ({}x{})...",
            self.input_path.display(),
            self.output_path.display(),
            self.options.width,
            self.options.height
        ));

        let format = PointFormat::from_path(&self.input_path);
        let mut cloud = self.stage(&mut timings, "Reading points", || self.load_points(format))?;
        self.log(format!("  {} points", cloud.len()));

        // LAS coordinates are already planar
        let projection = match format {
            PointFormat::Las => Projection::Planar,
            PointFormat::Text => self.options.settings.projection,
        };
        let bounds = self.stage(&mut timings, "Projecting points", || {
            Ok(cloud.project(&projection))
        })?;
        self.print_bounds(&bounds);

        let ctx = RasterContext::new(
            self.options.width,
            self.options.height,
            &bounds,
            &self.options.settings,
        )?;
        self.log(format!(
            "  Pixel size: {:.3} x {:.3} m",
            ctx.lg_pix, ctx.h_pix
        ));

        let indices = self.stage(&mut timings, "Triangulating", || {
            let indices = triangulate(cloud.coords())?;
            validate_mesh(cloud.points(), cloud.coords(), &indices)?;
            Ok(indices)
        })?;
        let produced = indices.len() / 3;
        self.log(format!("  {produced} triangles"));

        let filter = self.stage(&mut timings, "Filtering boundary triangles", || {
            Ok(filter_triangles(cloud.coords(), &indices))
        })?;
        self.print_filter(&filter);

        let (triangles, degenerate) = self.stage(&mut timings, "Shading triangles", || {
            Ok(build_triangles(cloud.points(), &filter.kept, &ctx))
        })?;
        if degenerate > 0 {
            self.log(format!("  Skipped {degenerate} degenerate triangles"));
        }

        let mut buffer = PixelBuffer::new(&ctx);
        let report = self.stage(&mut timings, "Rasterizing", || {
            Ok(self.rasterize(&ctx, &triangles, &mut buffer))
        })?;
        if report.pixels_clamped > 0 {
            self.log(format!(
                "  {} pixels deeper than the survey range were clamped",
                report.pixels_clamped
            ));
        }
        if report.is_empty() {
            return Err(RasterError::NothingRasterized);
        }

        self.stage(&mut timings, "Writing image", || {
            write_image(&self.output_path, &buffer, &Colormap::haxby(), ctx.nb_colors)
        })?;
        self.log(format!("  Saved {}", self.output_path.display()));

        let mut summary = RenderSummary::new(
            &self.input_path,
            &self.output_path,
            &ctx,
            cloud.len(),
            TriangleSummary {
                produced,
                rejected_by_filter: filter.rejected,
                degenerate,
                rasterized: report.triangles_rasterized,
            },
            filter.stats,
            &report,
        );
        summary.stages = timings;

        let metadata = MetadataWriter::new(&self.output_path);
        metadata.write(&summary)?;
        self.log(format!("Saved {}", metadata.path().display()));

        if !self.options.quiet {
            print_summary(&summary);
        }
        self.log(format!(
            "Conversion complete in {:.2} s",
            started.elapsed().as_secs_f64()
        ));
        Ok(summary)
    }

    /// Run one pipeline stage, print `- <name>... (<seconds> s)` and record
    /// its duration.
    fn stage<T, F>(&self, timings: &mut Vec<StageTiming>, name: &str, run: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let started = Instant::now();
        let value = run()?;
        let seconds = started.elapsed().as_secs_f64();

        self.log(format!("- {name}... ({seconds:.2} s)"));
        timings.push(StageTiming {
            name: name.to_string(),
            seconds,
        });
        Ok(value)
    }

    /// Read the survey behind a progress bar sized from the LAS header, or a
    /// counter for text input whose length is unknown up front.
    fn load_points(&self, format: PointFormat) -> Result<PointCloud> {
        let pb = match format {
            PointFormat::Las => self.progress_bar(self.inspect_las()?, "points"),
            PointFormat::Text => self.counter("points"),
        };
        pb.set_message("Loading points");

        let points = read_points_with(&self.input_path, |read| {
            if read % 50_000 == 0 {
                pb.set_position(read as u64);
            }
        })?;

        pb.set_position(points.len() as u64);
        pb.finish_with_message("Points loaded");
        Ok(PointCloud::new(points))
    }

    fn rasterize(
        &self,
        ctx: &RasterContext,
        triangles: &[Triangle],
        buffer: &mut PixelBuffer,
    ) -> RasterReport {
        let rasterizer = Rasterizer::new(ctx);
        let pb = self.progress_bar(triangles.len() as u64, "triangles");

        let report = if self.options.settings.parallel {
            pb.set_message(format!(
                "Rasterizing on {} threads",
                rayon::current_num_threads()
            ));
            let report = rasterizer.rasterize_parallel(triangles, buffer);
            pb.set_position(triangles.len() as u64);
            report
        } else {
            pb.set_message("Rasterizing");
            rasterizer.rasterize_with(triangles, buffer, |done| {
                if done % 10_000 == 0 {
                    pb.set_position(done as u64);
                }
            })
        };

        pb.finish_with_message(format!("{} pixels painted", report.pixels_painted));
        report
    }

    fn progress_bar(&self, len: u64, unit: &str) -> ProgressBar {
        if self.options.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "[{{bar:40.green/blue}}] {{pos}}/{{len}} {unit} ({{percent}}%) {{msg}}"
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb
    }

    fn counter(&self, unit: &str) -> ProgressBar {
        if self.options.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(&format!("{{spinner:.green}} {{pos}} {unit} {{msg}}"))
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    }

    fn log(&self, message: String) {
        if !self.options.quiet {
            println!("{message}");
        }
    }

    fn print_bounds(&self, bounds: &TerrainBounds) {
        self.log("Projected bounds:".to_string());
        self.log(format!("  X: {:.2} to {:.2}", bounds.min_x, bounds.max_x));
        self.log(format!("  Y: {:.2} to {:.2}", bounds.min_y, bounds.max_y));
        self.log(format!(
            "  Depth: {:.2} (shallowest) to {:.2} (deepest)",
            bounds.min_depth, bounds.max_depth
        ));
    }

    fn print_filter(&self, filter: &FilterOutcome) {
        match &filter.stats {
            Some(stats) => self.log(format!(
                "Boundary filter: kept {}, removed {} (longest edge cut at {:.3} m)",
                filter.kept.len(),
                filter.rejected,
                stats.threshold
            )),
            None => self.log("Boundary filter: no triangles to measure".to_string()),
        }
    }

    /// Print the header details of a LAS/LAZ input and return its point count.
    fn inspect_las(&self) -> Result<u64> {
        let reader = create_reader(&self.input_path)?;
        let header = reader.header();
        if self.options.quiet {
            return Ok(header.number_of_points());
        }
        let transforms = header.transforms();

        println!("LAS/LAZ File Information:");
        println!(
            "  Version: {}.{}",
            header.version().major,
            header.version().minor
        );
        println!("  Points: {}", header.number_of_points());
        println!("  Point format: {:?}", header.point_format().to_u8());
        println!(
            "  Scale factors: X={}, Y={}, Z={}",
            transforms.x.scale, transforms.y.scale, transforms.z.scale
        );
        println!(
            "  Offsets: X={}, Y={}, Z={}",
            transforms.x.offset, transforms.y.offset, transforms.z.offset
        );
        Ok(header.number_of_points())
    }
}
