/// Pixel/triangle rasterization into the colour and illumination buffers.
///
/// Every triangle scans the pixels of its bounding box and claims those whose
/// centre it contains. A pixel is written once: the first triangle in
/// enumeration order wins, later ones never overwrite it.
use crate::boundary_filter::{FilterOutcome, filter_triangles};
use crate::context::{ColorIndex, RasterContext};
use crate::error::{RasterError, Result};
use crate::pixel_index::{
    PixelCoord, bounding_box, coord_of_index, linear_index, pixel_center, storage_offset,
};
use crate::point::Point;
use crate::quantizer::convert_to_color;
use crate::triangle::Triangle;
use constants::render_settings::FULL_ILLUMINATION;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

const UNCLAIMED: usize = usize::MAX;

/// Row-major colour indices and illumination factors, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    default_color: ColorIndex,
    colors: Vec<ColorIndex>,
    illumination: Vec<f64>,
}

impl PixelBuffer {
    /// All pixels unpainted and fully lit.
    pub fn new(ctx: &RasterContext) -> Self {
        let len = ctx.pixel_count();
        Self {
            width: ctx.width,
            height: ctx.height,
            default_color: ctx.default_color,
            colors: vec![ctx.default_color; len],
            illumination: vec![FULL_ILLUMINATION; len],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn default_color(&self) -> ColorIndex {
        self.default_color
    }

    pub fn colors(&self) -> &[ColorIndex] {
        &self.colors
    }

    pub fn illumination(&self) -> &[f64] {
        &self.illumination
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_unpainted(&self, offset: usize) -> bool {
        self.colors[offset] == self.default_color
    }

    /// Write the pixel only if no triangle claimed it yet.
    pub fn try_claim(&mut self, offset: usize, color: ColorIndex, illumination: f64) -> bool {
        if !self.is_unpainted(offset) {
            return false;
        }
        self.colors[offset] = color;
        self.illumination[offset] = illumination;
        true
    }

    pub fn painted_count(&self) -> usize {
        self.colors
            .iter()
            .filter(|&&c| c != self.default_color)
            .count()
    }
}

/// Counters gathered while rasterizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RasterReport {
    /// Triangles handed to the rasterizer
    pub triangles: usize,
    /// Triangles that claimed at least one pixel
    pub triangles_rasterized: usize,
    pub pixels_painted: usize,
    /// Pixels deeper than `max_depth`, clamped to the last colour
    pub pixels_clamped: usize,
}

impl RasterReport {
    /// True when nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.pixels_painted == 0
    }

    fn absorb(&mut self, painted: usize, clamped: usize) {
        self.triangles += 1;
        if painted > 0 {
            self.triangles_rasterized += 1;
        }
        self.pixels_painted += painted;
        self.pixels_clamped += clamped;
    }
}

pub struct Rasterizer<'a> {
    ctx: &'a RasterContext,
}

impl<'a> Rasterizer<'a> {
    pub fn new(ctx: &'a RasterContext) -> Self {
        Self { ctx }
    }

    /// Rasterize triangles one after the other.
    pub fn rasterize(&self, triangles: &[Triangle], buffer: &mut PixelBuffer) -> RasterReport {
        self.rasterize_with(triangles, buffer, |_| {})
    }

    /// Sequential rasterization calling `on_triangle` with the number of
    /// triangles done so far.
    pub fn rasterize_with<F>(
        &self,
        triangles: &[Triangle],
        buffer: &mut PixelBuffer,
        mut on_triangle: F,
    ) -> RasterReport
    where
        F: FnMut(usize),
    {
        let mut report = RasterReport::default();
        for (idx, triangle) in triangles.iter().enumerate() {
            let (painted, clamped) = self.rasterize_triangle(triangle, buffer);
            report.absorb(painted, clamped);
            on_triangle(idx + 1);
        }
        report
    }

    /// Paint the unclaimed pixels whose centre lies in or on `triangle`.
    /// Returns the number of pixels painted and how many of them were clamped.
    pub fn rasterize_triangle(
        &self,
        triangle: &Triangle,
        buffer: &mut PixelBuffer,
    ) -> (usize, usize) {
        let mut painted = 0;
        let mut clamped = 0;

        for (offset, x, y) in self.candidates(triangle) {
            if buffer.is_unpainted(offset) && triangle.contain(x, y) {
                let color = convert_to_color(triangle.compute_depth(x, y), self.ctx);
                if buffer.try_claim(offset, color.index, triangle.illumination) {
                    painted += 1;
                    clamped += color.clamped as usize;
                }
            }
        }
        (painted, clamped)
    }

    /// Rasterize on the rayon pool with the same result as [`Rasterizer::rasterize`].
    ///
    /// Pass one records, per pixel, the lowest ordinal of the triangles that
    /// contain its centre. Pass two colours each claimed pixel from its owner.
    pub fn rasterize_parallel(
        &self,
        triangles: &[Triangle],
        buffer: &mut PixelBuffer,
    ) -> RasterReport {
        let owners: Vec<AtomicUsize> = (0..buffer.len())
            .map(|_| AtomicUsize::new(UNCLAIMED))
            .collect();

        let snapshot = &*buffer;
        triangles
            .par_iter()
            .enumerate()
            .for_each(|(ordinal, triangle)| {
                for (offset, x, y) in self.candidates(triangle) {
                    if snapshot.is_unpainted(offset) && triangle.contain(x, y) {
                        owners[offset].fetch_min(ordinal, Ordering::Relaxed);
                    }
                }
            });

        let ctx = self.ctx;
        let (painted, clamped) = buffer
            .colors
            .par_iter_mut()
            .zip(buffer.illumination.par_iter_mut())
            .zip(owners.par_iter())
            .enumerate()
            .map(|(offset, ((color, illumination), owner))| {
                let ordinal = owner.load(Ordering::Relaxed);
                if ordinal == UNCLAIMED {
                    return (0, 0);
                }
                let triangle = &triangles[ordinal];
                let (x, y) = pixel_center(coord_of_index(offset + 1, ctx.width), ctx);
                let quantized = convert_to_color(triangle.compute_depth(x, y), ctx);
                *color = quantized.index;
                *illumination = triangle.illumination;
                (1, quantized.clamped as usize)
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        let mut used = vec![false; triangles.len()];
        for owner in &owners {
            let ordinal = owner.load(Ordering::Relaxed);
            if ordinal != UNCLAIMED {
                used[ordinal] = true;
            }
        }

        RasterReport {
            triangles: triangles.len(),
            triangles_rasterized: used.iter().filter(|&&u| u).count(),
            pixels_painted: painted,
            pixels_clamped: clamped,
        }
    }

    /// Storage offset and real-world centre of every pixel in the triangle's
    /// bounding box.
    fn candidates(&self, triangle: &Triangle) -> impl Iterator<Item = (usize, f64, f64)> + use<'a> {
        let ctx = self.ctx;
        let (min, max) = bounding_box(&[triangle.p1, triangle.p2, triangle.p3], ctx);

        (min.row..=max.row).flat_map(move |row| {
            (min.col..=max.col).map(move |col| {
                let coord = PixelCoord { row, col };
                let (x, y) = pixel_center(coord, ctx);
                (storage_offset(linear_index(coord, ctx.width)), x, y)
            })
        })
    }
}

/// Build the triangle models of surviving index triples, skipping degenerate
/// ones, and shade them with the context's light. Returns the triangles and
/// the number skipped.
pub fn build_triangles<'p>(
    points: &'p [Point],
    kept: &[[usize; 3]],
    ctx: &RasterContext,
) -> (Vec<Triangle<'p>>, usize) {
    let mut triangles = Vec::with_capacity(kept.len());
    let mut degenerate = 0;

    for &[i, j, k] in kept {
        let mut triangle = Triangle::new(&points[i], &points[j], &points[k]);
        if triangle.is_degenerate(ctx.min_triangle_area) {
            degenerate += 1;
            continue;
        }
        triangle.compute_illumination(ctx.sun_dir);
        triangles.push(triangle);
    }
    (triangles, degenerate)
}

/// Result of rendering a triangulated point set.
#[derive(Debug, Clone)]
pub struct MeshRaster {
    pub buffer: PixelBuffer,
    pub filter: FilterOutcome,
    pub degenerate: usize,
    pub report: RasterReport,
}

/// Check that `coords` is parallel to `points` and that `triangle_indices`
/// holds whole triples referencing existing points.
pub fn validate_mesh(points: &[Point], coords: &[f64], triangle_indices: &[usize]) -> Result<()> {
    if coords.len() != points.len() * 2 {
        return Err(RasterError::Triangulation(format!(
            "coordinate buffer holds {} values for {} points",
            coords.len(),
            points.len()
        )));
    }
    if triangle_indices.len() % 3 != 0 {
        return Err(RasterError::Triangulation(format!(
            "triangle index list length {} is not a multiple of 3",
            triangle_indices.len()
        )));
    }
    if let Some(bad) = triangle_indices.iter().find(|&&i| i >= points.len()) {
        return Err(RasterError::Triangulation(format!(
            "triangle references point {bad} of {}",
            points.len()
        )));
    }
    Ok(())
}

/// Filter, model and rasterize a triangle index list over `points`.
///
/// `coords` is the flat `{x0, y0, x1, y1, ...}` buffer parallel to `points`.
/// An empty result is returned as a report with no painted pixels; callers
/// decide whether that is an error.
pub fn render_mesh(
    points: &[Point],
    coords: &[f64],
    triangle_indices: &[usize],
    ctx: &RasterContext,
    parallel: bool,
) -> Result<MeshRaster> {
    validate_mesh(points, coords, triangle_indices)?;

    let filter = filter_triangles(coords, triangle_indices);
    let (triangles, degenerate) = build_triangles(points, &filter.kept, ctx);

    let mut buffer = PixelBuffer::new(ctx);
    let rasterizer = Rasterizer::new(ctx);
    let report = if parallel {
        rasterizer.rasterize_parallel(&triangles, &mut buffer)
    } else {
        rasterizer.rasterize(&triangles, &mut buffer)
    };

    Ok(MeshRaster {
        buffer,
        filter,
        degenerate,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::TerrainBounds;
    use crate::context::RenderSettings;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, -1.0),
            Point::new(8.0, 0.0, -2.0),
            Point::new(8.0, 8.0, -3.0),
            Point::new(0.0, 8.0, -2.0),
        ]
    }

    fn ctx(points: &[Point], size: usize) -> RasterContext {
        let bounds = TerrainBounds::from_points(points);
        RasterContext::new(size, size, &bounds, &RenderSettings::default()).unwrap()
    }

    #[test]
    fn claimed_pixels_are_never_overwritten() {
        let points = square();
        let ctx = ctx(&points, 4);
        let mut buffer = PixelBuffer::new(&ctx);

        assert!(buffer.try_claim(0, 7, 0.6));
        assert!(!buffer.try_claim(0, 9, 0.9));
        assert_eq!(buffer.colors()[0], 7);
        assert_eq!(buffer.illumination()[0], 0.6);
    }

    #[test]
    fn first_triangle_wins_on_overlap() {
        let points = square();
        let ctx = ctx(&points, 8);
        let mut first = Triangle::new(&points[0], &points[1], &points[2]);
        first.illumination = 0.55;
        let mut second = Triangle::new(&points[0], &points[1], &points[3]);
        second.illumination = 0.95;

        let mut buffer = PixelBuffer::new(&ctx);
        let report = Rasterizer::new(&ctx).rasterize(&[first, second], &mut buffer);

        // bottom-right corner pixel lies in both triangles
        let offset = storage_offset(linear_index(PixelCoord { row: 8, col: 8 }, 8));
        assert_eq!(buffer.illumination()[offset], 0.55);
        assert_eq!(report.triangles, 2);
        assert_eq!(report.triangles_rasterized, 2);
        assert_eq!(report.pixels_painted, buffer.painted_count());
    }

    #[test]
    fn parallel_matches_sequential() {
        let points = square();
        let ctx = ctx(&points, 16);
        let kept = [[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]];
        let (triangles, degenerate) = build_triangles(&points, &kept, &ctx);
        assert_eq!(degenerate, 0);

        let rasterizer = Rasterizer::new(&ctx);
        let mut sequential = PixelBuffer::new(&ctx);
        let seq_report = rasterizer.rasterize(&triangles, &mut sequential);
        let mut parallel = PixelBuffer::new(&ctx);
        let par_report = rasterizer.rasterize_parallel(&triangles, &mut parallel);

        assert_eq!(sequential, parallel);
        assert_eq!(seq_report, par_report);
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let points = vec![
            Point::new(0.0, 0.0, -1.0),
            Point::new(1.0, 1.0, -1.0),
            Point::new(2.0, 2.0, -1.0),
            Point::new(2.0, 0.0, -1.0),
        ];
        let ctx = ctx(&points, 4);
        let (triangles, degenerate) = build_triangles(&points, &[[0, 1, 2], [0, 3, 2]], &ctx);
        assert_eq!(triangles.len(), 1);
        assert_eq!(degenerate, 1);
    }

    #[test]
    fn invalid_index_is_an_error() {
        let points = square();
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let ctx = ctx(&points, 4);
        let err = render_mesh(&points, &coords, &[0, 1, 9], &ctx, false);
        assert!(matches!(err, Err(RasterError::Triangulation(_))));
    }

    #[test]
    fn malformed_meshes_are_rejected() {
        let points = square();
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();

        assert!(validate_mesh(&points, &coords, &[0, 1, 2, 0, 2, 3]).is_ok());
        assert!(validate_mesh(&points, &coords, &[]).is_ok());
        assert!(matches!(
            validate_mesh(&points, &coords, &[0, 1]),
            Err(RasterError::Triangulation(_))
        ));
        assert!(matches!(
            validate_mesh(&points, &coords[..6], &[0, 1, 2]),
            Err(RasterError::Triangulation(_))
        ));
        assert!(matches!(
            validate_mesh(&points, &coords, &[0, 1, 4]),
            Err(RasterError::Triangulation(_))
        ));
    }

    #[test]
    fn empty_index_list_paints_nothing() {
        let points = square();
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let ctx = ctx(&points, 4);
        let raster = render_mesh(&points, &coords, &[], &ctx, false).unwrap();
        assert!(raster.report.is_empty());
        assert_eq!(raster.buffer.painted_count(), 0);
    }
}
