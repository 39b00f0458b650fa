//! Uniform sampling helpers driven by a caller-owned random stream.

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Upper bound on rejection-sampling draws before giving up.
///
/// A healthy generator accepts within a couple of draws; the cap only matters
/// for degenerate streams (e.g. a constant generator in tests).
const MAX_REJECTION_ATTEMPTS: usize = 64;

/// Draw a uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Sample a point strictly inside the unit sphere.
///
/// Falls back to the center if the stream never produces an accepted point.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    Vec3::ZERO
}

/// Sample a point strictly inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
    Vec3::ZERO
}
