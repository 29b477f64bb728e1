//! Error types for the rendering pipeline

use crate::math::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot normalize zero-length vector ({0:?})")]
    DegenerateVector(Vec3),

    #[error("Shading ramp must contain at least one character")]
    EmptyRamp,

    #[error("Display sink error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
