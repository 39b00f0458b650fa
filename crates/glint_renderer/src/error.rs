//! Errors raised while building materials, geometry, cameras and render settings.

use crate::{Color, MaterialId};
use glint_math::{DegenerateVectorError, Vec3};
use thiserror::Error;

/// A scene or render parameter that would make the output meaningless.
///
/// Everything is validated once at construction time; nothing on the
/// per-ray path returns this.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("degenerate geometry: {0}")]
    Degenerate(#[from] DegenerateVectorError),

    #[error("albedo must be finite and non-negative, got {0}")]
    InvalidAlbedo(Color),

    #[error("fuzz must be finite, got {0}")]
    InvalidFuzz(f32),

    #[error("refractive index must be finite and positive, got {0}")]
    InvalidRefractiveIndex(f32),

    #[error("sphere center must be finite, got {0}")]
    InvalidCenter(Vec3),

    #[error("sphere radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("material {0} is not registered in the scene")]
    UnknownMaterial(MaterialId),

    #[error("vertical field of view must be between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    #[error("aperture must be finite and non-negative, got {0}")]
    InvalidAperture(f32),

    #[error("focus distance must be finite and positive, got {0}")]
    InvalidFocusDistance(f32),

    #[error("image resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,
}

/// Result type for construction-time validation.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Reject colors that would poison the radiance estimate.
pub(crate) fn check_albedo(albedo: Color) -> ConfigResult<Color> {
    if albedo.is_finite() && albedo.min_element() >= 0.0 {
        Ok(albedo)
    } else {
        Err(ConfigurationError::InvalidAlbedo(albedo))
    }
}
