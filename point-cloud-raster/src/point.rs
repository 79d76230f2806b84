/// Surveyed elevation samples and their flat coordinate buffer
use crate::bounds::TerrainBounds;
use crate::projection::Projection;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A single sample in planar metres. Depth is negative downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl Point {
    /// Create a point, negating positive depths so every sample follows
    /// the negative-down convention.
    pub fn new(x: f64, y: f64, depth: f64) -> Self {
        Self {
            x,
            y,
            depth: normalize_depth(depth),
        }
    }
}

/// Flip a positively expressed depth to the negative-down convention.
pub fn normalize_depth(depth: f64) -> f64 {
    if depth > 0.0 { -depth } else { depth }
}

/// Ordered point list with the parallel `{x0, y0, x1, y1, ...}` buffer
/// consumed by the triangulator.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    points: Vec<Point>,
    coords: Vec<f64>,
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        let coords = flatten(&points);
        Self { points, coords }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Flat coordinate buffer, two entries per point.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reproject every point in place, rebuild the flat buffer and return
    /// the bounds of the projected cloud.
    pub fn project(&mut self, projection: &Projection) -> TerrainBounds {
        let projector = projection.projector();
        self.points.par_iter_mut().for_each(|point| {
            let (x, y) = projector.project(point.x, point.y);
            point.x = x;
            point.y = y;
        });
        self.coords = flatten(&self.points);

        self.points
            .par_chunks(25_000)
            .map(TerrainBounds::from_points)
            .reduce(TerrainBounds::new, TerrainBounds::merge)
    }

    /// Bounds of the cloud without reprojecting it.
    pub fn bounds(&self) -> TerrainBounds {
        TerrainBounds::from_points(&self.points)
    }
}

fn flatten(points: &[Point]) -> Vec<f64> {
    let mut coords = Vec::with_capacity(points.len() * 2);
    for point in points {
        coords.push(point.x);
        coords.push(point.y);
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_depths_are_negated() {
        assert_eq!(Point::new(0.0, 0.0, 12.5).depth, -12.5);
        assert_eq!(Point::new(0.0, 0.0, -3.0).depth, -3.0);
        assert_eq!(Point::new(0.0, 0.0, 0.0).depth, 0.0);
    }

    #[test]
    fn flat_buffer_is_parallel_to_points() {
        let cloud = PointCloud::new(vec![
            Point::new(1.0, 2.0, -1.0),
            Point::new(3.0, 4.0, -2.0),
        ]);
        assert_eq!(cloud.coords(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn planar_projection_keeps_coordinates_and_tracks_bounds() {
        let mut cloud = PointCloud::new(vec![
            Point::new(10.0, 20.0, -1.0),
            Point::new(30.0, 5.0, -4.0),
        ]);
        let bounds = cloud.project(&Projection::Planar);

        assert_eq!(cloud.coords(), &[10.0, 20.0, 30.0, 5.0]);
        assert_eq!(bounds.min_x, 10.0);
        assert_eq!(bounds.max_x, 30.0);
        assert_eq!(bounds.min_y, 5.0);
        assert_eq!(bounds.max_y, 20.0);
        assert_eq!(bounds.min_depth, -1.0);
        assert_eq!(bounds.max_depth, -4.0);
    }
}
