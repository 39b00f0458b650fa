//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes built from spheres with diffuse,
//! metallic and dielectric materials.

mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
mod sampling;
mod scene;
mod sphere;

pub use camera::{Camera, CameraSettings};
pub use error::{ConfigResult, ConfigurationError};
pub use hittable::{HitRecord, Hittable, Shape, ShapeList};
pub use material::{
    reflect, refract, schlick, Color, Dielectric, Lambertian, Material, Metal, Scatter,
    ScatterResult,
};
pub use renderer::{
    color_to_rgb, linear_to_gamma, quantize, ray_color, render, render_pixel, render_with_rng,
    sky_gradient, Framebuffer, RenderSettings, DEFAULT_MAX_DEPTH, T_MIN,
};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere};
pub use scene::{MaterialId, Scene};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{DegenerateVectorError, Interval, Ray, Vec3, Vec3Ext};
