/// Error type shared by every stage of the raster pipeline
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LAS/LAZ error: {0}")]
    Las(#[from] las::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("at least 3 distinct points are needed to triangulate, found {found}")]
    NotEnoughPoints { found: usize },

    #[error("invalid raster context: {0}")]
    InvalidContext(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("no triangle covered any pixel centre, the raster is empty")]
    NothingRasterized,
}

pub type Result<T> = std::result::Result<T, RasterError>;
