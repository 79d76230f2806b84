/// Shared constants for terrain rasterization
pub mod coordinate_system;
pub mod palette;
pub mod render_settings;
