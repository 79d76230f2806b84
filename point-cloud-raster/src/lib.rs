//! Bathymetric survey rasterization: Delaunay mesh, boundary filtering,
//! per-pixel depth interpolation and hill shading into a colour-mapped image.
pub mod boundary_filter;
pub mod bounds;
pub mod colormap;
pub mod context;
pub mod converter;
pub mod error;
pub mod image_export;
pub mod metadata;
pub mod pixel_index;
pub mod point;
pub mod projection;
pub mod quantizer;
pub mod rasterizer;
pub mod reader;
pub mod triangle;
pub mod triangulation;

pub use boundary_filter::{EdgeStatistics, FilterOutcome, filter_triangles};
pub use bounds::TerrainBounds;
pub use colormap::Colormap;
pub use context::{ColorIndex, RasterContext, RenderSettings};
pub use converter::{ConvertOptions, DEFAULT_OUTPUT, RasterConverter};
pub use error::{RasterError, Result};
pub use metadata::RenderSummary;
pub use pixel_index::{PixelCoord, compute_coords_x, compute_coords_y, pixel_of_point};
pub use point::{Point, PointCloud};
pub use projection::{LambertParams, Projection};
pub use quantizer::convert_to_color;
pub use rasterizer::{MeshRaster, PixelBuffer, RasterReport, Rasterizer, render_mesh};
pub use triangle::{Triangle, remap_illumination};
pub use triangulation::triangulate;
