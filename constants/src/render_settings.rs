/// Colour index left in pixels that no triangle has claimed.
/// Chosen outside the range the depth quantizer can produce.
pub const DEFAULT_COLOR: u32 = u32::MAX;

/// Number of samples taken from the colour map (palette resolution)
pub const DEFAULT_NB_COLORS: u32 = 100_000;

/// Direction of the sun light, pointing from the west
pub const DEFAULT_SUN_DIRECTION: [f64; 3] = [-1.0, 0.0, 0.0];

/// Illumination of a pixel that received no shading
pub const FULL_ILLUMINATION: f64 = 1.0;

/// Faces turned toward the light are darkened within [LIT_MIN, LIT_MIN + LIT_RANGE]
pub const LIT_MIN: f64 = 0.8;
pub const LIT_RANGE: f64 = 0.2;

/// Faces turned away from the light are darkened within [SHADOW_MIN, SHADOW_MIN + SHADOW_RANGE]
pub const SHADOW_MIN: f64 = 0.5;
pub const SHADOW_RANGE: f64 = 0.3;

/// Triangles with a planar area below this (m²) are skipped before depth interpolation
pub const MIN_TRIANGLE_AREA: f64 = 1e-9;
