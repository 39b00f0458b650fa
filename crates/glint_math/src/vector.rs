//! Degenerate-safe helpers on top of glam's `Vec3`.

use crate::Vec3;
use thiserror::Error;

/// Below this squared length a vector is treated as having no direction.
const NEAR_ZERO_SQUARED: f32 = 1e-16;

/// A vector with zero (or non-finite) length was asked for its direction.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("cannot normalize degenerate vector ({}, {}, {})", .0.x, .0.y, .0.z)]
pub struct DegenerateVectorError(pub Vec3);

/// Extra vector operations used by the renderer.
pub trait Vec3Ext: Sized {
    /// Unit vector in the same direction, or an error for zero/non-finite input.
    fn unit(self) -> Result<Vec3, DegenerateVectorError>;

    /// True when every component is so small the vector has no usable direction.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn unit(self) -> Result<Vec3, DegenerateVectorError> {
        self.try_normalize().ok_or(DegenerateVectorError(self))
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.length_squared() < NEAR_ZERO_SQUARED
    }
}
