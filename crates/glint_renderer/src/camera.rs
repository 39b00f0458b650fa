//! Camera for ray generation.

use crate::{
    error::{ConfigResult, ConfigurationError},
    random_in_unit_disk,
};
use glint_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Where the camera sits and how its lens is shaped.
///
/// Settings are cheap to edit; [`CameraSettings::build`] validates them and
/// produces the immutable [`Camera`] used during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    // Camera positioning
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,       // Vertical field of view in degrees
    pub aperture: f32,   // Lens diameter, 0 = pinhole
    pub focus_dist: f32, // Distance from camera to plane of perfect focus
}

impl CameraSettings {
    /// Pinhole camera at the origin looking down -Z.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set thin-lens settings.
    pub fn with_lens(mut self, aperture: f32, focus_dist: f32) -> Self {
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Build the camera for an image with the given width/height ratio.
    pub fn build(&self, aspect_ratio: f32) -> ConfigResult<Camera> {
        if !(self.vfov.is_finite() && self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigurationError::InvalidFieldOfView(self.vfov));
        }
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(ConfigurationError::InvalidAspectRatio(aspect_ratio));
        }
        if !(self.aperture.is_finite() && self.aperture >= 0.0) {
            return Err(ConfigurationError::InvalidAperture(self.aperture));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(ConfigurationError::InvalidFocusDistance(self.focus_dist));
        }

        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        // Orthonormal view basis
        let w = (self.look_from - self.look_at).unit()?;
        let u = self.vup.cross(w).unit()?;
        let v = w.cross(u);

        let focus = self.focus_dist;
        let origin = self.look_from;
        let lower_left = origin - half_width * focus * u - half_height * focus * v - focus * w;

        Ok(Camera {
            origin,
            lower_left,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Camera with an explicit image-plane frame and no lens.
    ///
    /// The plane spans `lower_left + s*horizontal + t*vertical` for s,t in [0,1].
    pub fn from_frame(origin: Vec3, lower_left: Vec3, horizontal: Vec3, vertical: Vec3) -> Self {
        let u = horizontal.normalize_or_zero();
        let v = vertical.normalize_or_zero();
        Self {
            origin,
            lower_left,
            horizontal,
            vertical,
            u,
            v,
            w: u.cross(v),
            lens_radius: 0.0,
        }
    }

    /// Pinhole ray through image-plane coordinates (s: left to right, t: bottom to top).
    #[inline]
    pub fn generate_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin, target - self.origin)
    }

    /// Ray through (s, t) from a random point on the lens.
    ///
    /// Points off the focal plane blur in proportion to their distance from it.
    /// With a zero aperture this is exactly [`Camera::generate_ray`] and the
    /// stream is left untouched.
    pub fn generate_ray_with_lens(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        if self.lens_radius <= 0.0 {
            return self.generate_ray(s, t);
        }

        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = rd.x * self.u + rd.y * self.v;
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        -self.w
    }
}
