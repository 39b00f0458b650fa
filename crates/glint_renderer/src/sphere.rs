//! Sphere primitive for ray tracing.

use crate::{
    error::{ConfigResult, ConfigurationError},
    hittable::{HitRecord, Hittable},
    MaterialId,
};
use glint_math::{Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// The radius must be finite and strictly positive.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> ConfigResult<Self> {
        if !center.is_finite() {
            return Err(ConfigurationError::InvalidCenter(center));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigurationError::InvalidRadius(radius));
        }

        Ok(Self {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root first; nothing behind the ray origin is reported.
        let bounds = ray_t.forward();
        let mut root = (h - sqrtd) / a;
        if !bounds.contains(root) {
            root = (h + sqrtd) / a;
            if !bounds.contains(root) {
                return None;
            }
        }

        let position = ray.at(root);
        let normal = ((position - self.center) / self.radius).normalize_or_zero();

        Some(HitRecord {
            t: root,
            position,
            normal,
            material: self.material,
        })
    }
}
