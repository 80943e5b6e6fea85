//! Error types for geometry construction and hole layout

use gf_cad::CadError;
use thiserror::Error;

/// Geometry construction errors
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Hole layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("CAD kernel error: {0}")]
    Kernel(#[from] CadError),
}

/// Result type for geometry construction
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Hole layout errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No room for a {diameter}mm hole across {width}mm")]
    NoRoom { width: f64, diameter: f64 },

    #[error("Wall of {wall:.3}mm is below the {minimum}mm minimum across {width}mm")]
    WallTooThin { width: f64, wall: f64, minimum: f64 },
}

/// Result type for hole layout
pub type LayoutResult<T> = Result<T, LayoutError>;
