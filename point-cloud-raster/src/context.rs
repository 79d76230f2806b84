/// Raster configuration shared by every pipeline stage
use crate::bounds::TerrainBounds;
use crate::error::{RasterError, Result};
use crate::projection::Projection;
use constants::render_settings::{
    DEFAULT_COLOR, DEFAULT_NB_COLORS, DEFAULT_SUN_DIRECTION, MIN_TRIANGLE_AREA,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Index into the sampled colour map
pub type ColorIndex = u32;

/// User tunable rendering settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Sentinel stored in pixels no triangle has claimed
    pub default_color: ColorIndex,
    /// Number of colour map samples
    pub nb_colors: ColorIndex,
    /// Direction of the directional light
    pub sun_direction: DVec3,
    /// Planar area (m²) under which a triangle is treated as degenerate
    pub min_triangle_area: f64,
    pub projection: Projection,
    /// Rasterize triangles on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            nb_colors: DEFAULT_NB_COLORS,
            sun_direction: DVec3::from_array(DEFAULT_SUN_DIRECTION),
            min_triangle_area: MIN_TRIANGLE_AREA,
            projection: Projection::default(),
            parallel: false,
        }
    }
}

impl RenderSettings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Immutable grid and elevation configuration read by the core stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterContext {
    pub width: usize,
    pub height: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Shallowest depth (numerically largest)
    pub min_depth: f64,
    /// Deepest depth (numerically smallest)
    pub max_depth: f64,
    /// Physical pixel width in metres
    pub lg_pix: f64,
    /// Physical pixel height in metres
    pub h_pix: f64,
    pub default_color: ColorIndex,
    pub nb_colors: ColorIndex,
    pub sun_dir: DVec3,
    pub min_triangle_area: f64,
}

impl RasterContext {
    /// Build the context for a `width` x `height` grid covering `bounds`,
    /// deriving the physical pixel size.
    pub fn new(
        width: usize,
        height: usize,
        bounds: &TerrainBounds,
        settings: &RenderSettings,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidContext(format!(
                "grid must be at least 1x1, got {width}x{height}"
            )));
        }
        if !bounds.is_finite() {
            return Err(RasterError::InvalidContext(
                "bounds are not finite, the point cloud is empty or corrupt".into(),
            ));
        }
        if settings.nb_colors == 0 || settings.nb_colors >= ColorIndex::MAX {
            return Err(RasterError::InvalidContext(format!(
                "nb_colors must be in 1..{}, got {}",
                ColorIndex::MAX,
                settings.nb_colors
            )));
        }
        if settings.default_color <= settings.nb_colors {
            return Err(RasterError::InvalidContext(format!(
                "default_color {} collides with palette indices 0..={}",
                settings.default_color, settings.nb_colors
            )));
        }
        if !settings.sun_direction.is_finite() || settings.sun_direction.length_squared() == 0.0 {
            return Err(RasterError::InvalidContext(
                "sun direction must be a finite non-zero vector".into(),
            ));
        }

        Ok(Self {
            width,
            height,
            min_x: bounds.min_x,
            max_x: bounds.max_x,
            min_y: bounds.min_y,
            max_y: bounds.max_y,
            min_depth: bounds.min_depth,
            max_depth: bounds.max_depth,
            lg_pix: (bounds.max_x - bounds.min_x) / width as f64,
            h_pix: (bounds.max_y - bounds.min_y) / height as f64,
            default_color: settings.default_color,
            nb_colors: settings.nb_colors,
            sun_dir: settings.sun_direction,
            min_triangle_area: settings.min_triangle_area,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn bounds(&self) -> TerrainBounds {
        TerrainBounds {
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
        }
    }
}
