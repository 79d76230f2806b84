/// Planar and elevation bounds of a terrain point cloud
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Bounds of a projected cloud.
///
/// Depths are negative downward, so `min_depth` is the shallowest sample
/// (numerically largest) and `max_depth` the deepest (numerically smallest).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_depth: f64,
    pub max_depth: f64,
}

impl Default for TerrainBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_depth: f64::NEG_INFINITY,
            max_depth: f64::INFINITY,
        }
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.update(point.x, point.y, point.depth);
        }
        bounds
    }

    /// Update bounds with a new point
    pub fn update(&mut self, x: f64, y: f64, depth: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_depth = self.min_depth.max(depth);
        self.max_depth = self.max_depth.min(depth);
    }

    /// Merge bounds computed on separate chunks.
    pub fn merge(mut self, other: Self) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_depth = self.min_depth.max(other.min_depth);
        self.max_depth = self.max_depth.min(other.max_depth);
        self
    }

    /// Planar extent (width along x, height along y) in metres
    pub fn extent(&self) -> (f64, f64) {
        ((self.max_x - self.min_x).abs(), (self.max_y - self.min_y).abs())
    }

    /// Signed elevation range, `max_depth - min_depth` (≤ 0 for real data)
    pub fn depth_range(&self) -> f64 {
        self.max_depth - self.min_depth
    }

    pub fn is_finite(&self) -> bool {
        [
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
            self.min_depth,
            self.max_depth,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
