//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a configurable depth limit
//! - Sky gradient environment light
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and clamped 8-bit quantization
//! - Row-parallel rendering with one deterministic random stream per row

use std::time::Instant;

use crate::{
    error::{ConfigResult, ConfigurationError},
    gen_f32, Camera, Color, Hittable, Scatter, Scene,
};
use glint_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Smallest accepted hit distance, keeps scattered rays off their own surface.
pub const T_MIN: f32 = 0.001;

/// Bounce limit used unless the settings say otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 50;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for the per-row random streams
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            samples_per_pixel: 128,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: 42,
        }
    }
}

impl RenderSettings {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Check that the settings describe a renderable image.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigurationError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigurationError::ZeroSamples);
        }
        Ok(())
    }
}

/// Compute the radiance carried back along a camera ray.
///
/// Each hit multiplies the path throughput by the material attenuation. The
/// path ends black when a material absorbs it or when a hit happens after
/// `max_depth` bounces, and ends lit by the sky when it escapes. A path whose
/// value is not finite contributes black.
pub fn ray_color(ray: &Ray, world: &Scene, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut depth = 0;

    let radiance = loop {
        let Some(rec) = world.hit(&ray, Interval::from_min(T_MIN)) else {
            break throughput * sky_gradient(&ray);
        };

        if depth >= max_depth {
            break Color::ZERO;
        }

        match world.material(rec.material).scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
                depth += 1;
            }
            None => break Color::ZERO,
        }
    };

    if radiance.is_finite() {
        radiance
    } else {
        log::trace!("dropping non-finite sample {radiance} after {depth} bounces");
        Color::ZERO
    }
}

/// Compute sky gradient background.
///
/// Straight down is white, straight up is sky blue, linear in between.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Range of representable channel values.
const BYTE_RANGE: Interval = Interval::new(0.0, 255.0);

/// Map a gamma-corrected channel to a byte, clamping out-of-range values.
#[inline]
pub fn quantize(value: f32) -> u8 {
    // NaN survives the clamp and casts to 0.
    BYTE_RANGE.clamp((255.99 * value).floor()) as u8
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        quantize(linear_to_gamma(color.x)),
        quantize(linear_to_gamma(color.y)),
        quantize(linear_to_gamma(color.z)),
    ]
}

/// Render a single pixel with multi-sampling.
///
/// `i` counts columns from the left, `j` counts rows from the bottom.
/// Returns the average linear color before gamma correction.
pub fn render_pixel(
    camera: &Camera,
    world: &Scene,
    i: u32,
    j: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        let s = (i as f32 + gen_f32(rng)) / settings.width as f32;
        let t = (j as f32 + gen_f32(rng)) / settings.height as f32;
        let ray = camera.generate_ray_with_lens(s, t, rng);
        pixel_color += ray_color(&ray, world, settings.max_depth, rng);
    }

    // Average the samples
    pixel_color / settings.samples_per_pixel as f32
}

/// Quantized render output, stored top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Framebuffer {
    fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), pixel_count(width, height));
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the pixel at (x, y), with y = 0 the top row.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    /// All pixels, row-major, top row first.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Flat RGB byte stream, row-major, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Owned copy of [`Framebuffer::as_bytes`].
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Render one image row. `j` counts from the bottom of the image.
fn render_row(
    camera: &Camera,
    world: &Scene,
    j: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Vec<[u8; 3]> {
    (0..settings.width)
        .map(|i| color_to_rgb(render_pixel(camera, world, i, j, settings, &mut *rng)))
        .collect()
}

/// Seed for the stream that renders row `j`.
fn row_seed(seed: u64, j: u32) -> u64 {
    seed ^ (u64::from(j) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render the scene sequentially from a single caller-provided stream.
///
/// Rows are traced top to bottom, pixels left to right.
pub fn render_with_rng(
    camera: &Camera,
    world: &Scene,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> ConfigResult<Framebuffer> {
    settings.validate()?;
    let start = Instant::now();

    let mut pixels = Vec::with_capacity(pixel_count(settings.width, settings.height));
    for j in (0..settings.height).rev() {
        pixels.extend(render_row(camera, world, j, settings, rng));
    }

    log::info!(
        "Rendered {}x{} sequentially in {:?}",
        settings.width,
        settings.height,
        start.elapsed()
    );
    Ok(Framebuffer::from_pixels(settings.width, settings.height, pixels))
}

/// Render the scene with rows spread across the rayon thread pool.
///
/// Each row draws from its own stream seeded by `settings.seed` and the row
/// index, so the image is the same for any thread count.
pub fn render(
    camera: &Camera,
    world: &Scene,
    settings: &RenderSettings,
) -> ConfigResult<Framebuffer> {
    settings.validate()?;
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} shapes",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.max_depth,
        world.len()
    );

    let rows: Vec<Vec<[u8; 3]>> = (0..settings.height)
        .into_par_iter()
        .map(|row| {
            let j = settings.height - 1 - row;
            let mut rng = StdRng::seed_from_u64(row_seed(settings.seed, j));
            let pixels = render_row(camera, world, j, settings, &mut rng);
            log::debug!("Finished row {row}");
            pixels
        })
        .collect();

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(Framebuffer::from_pixels(
        settings.width,
        settings.height,
        rows.into_iter().flatten().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, Dielectric, Lambertian, Metal, Sphere, Vec3};
    use rand::rngs::mock::StepRng;

    fn single_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let grey = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5)).unwrap());
        scene.add(Sphere::new(Vec3::ZERO, 0.5, grey).unwrap()).unwrap();
        scene
    }

    #[test]
    fn test_sky_gradient() {
        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        let level = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));

        assert_eq!(down, Color::ONE);
        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new();
        let mut rng = StepRng::new(0, 0);
        for direction in [Vec3::Y, Vec3::NEG_Y, Vec3::new(0.3, -0.2, -1.0)] {
            let ray = Ray::new(Vec3::ZERO, direction);
            assert_eq!(ray_color(&ray, &scene, DEFAULT_MAX_DEPTH, &mut rng), sky_gradient(&ray));
        }
    }

    #[test]
    fn test_zero_depth_hit_is_black() {
        let scene = single_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(ray_color(&ray, &scene, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_single_bounce_attenuates_sky() {
        // With a constant-zero stream the diffuse bounce goes straight along the normal.
        let scene = single_sphere_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let color = ray_color(&ray, &scene, DEFAULT_MAX_DEPTH, &mut StepRng::new(0, 0));

        let bounce = Ray::new(Vec3::new(0.0, 0.0, 0.5), Vec3::Z);
        assert!((color - 0.5 * sky_gradient(&bounce)).length() < 1e-5);
    }

    #[test]
    fn test_absorbing_metal_is_black() {
        let mut scene = Scene::new();
        // Mirror seen from inside: every reflection heads into the surface.
        let mirror = scene.add_material(Metal::new(Color::ONE, 0.0).unwrap());
        scene.add(Sphere::new(Vec3::ZERO, 10.0, mirror).unwrap()).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(ray_color(&ray, &scene, DEFAULT_MAX_DEPTH, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_glass_is_colorless() {
        // A ray through the center of a glass ball with the "refract" draw
        // exits unbent and sees exactly the sky behind it.
        let mut scene = Scene::new();
        let glass = scene.add_material(Dielectric::new(1.5).unwrap());
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, glass).unwrap()).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = StepRng::new(u64::from(u32::MAX), 0);
        let color = ray_color(&ray, &scene, DEFAULT_MAX_DEPTH, &mut rng);
        assert!((color - sky_gradient(&ray)).length() < 1e-5);
    }

    #[test]
    fn test_overflowing_path_is_black() {
        // Two diffuse spheres side by side. With a constant-zero stream every
        // bounce leaves along the normal, so the path hits the left sphere,
        // then the right one, then escapes to the sky.
        let two_bounce_scene = |albedo: f32| {
            let mut scene = Scene::new();
            let diffuse = scene.add_material(Lambertian::new(Color::splat(albedo)).unwrap());
            scene.add(Sphere::new(Vec3::ZERO, 1.0, diffuse).unwrap()).unwrap();
            scene.add(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, diffuse).unwrap()).unwrap();
            scene
        };
        let first_normal = Vec3::new(1.0, 0.2, 0.0).normalize();
        let ray = Ray::new(Vec3::new(first_normal.x, 10.0, 0.0), Vec3::NEG_Y);

        let dim = ray_color(&ray, &two_bounce_scene(0.5), 4, &mut StepRng::new(0, 0));
        assert!(dim.is_finite() && dim.min_element() > 0.0, "{dim}");
        assert!(dim.max_element() <= 0.25 + 1e-6, "{dim}");

        // 1e30 squared overflows f32, so the escaped sample would be infinite.
        let hot = ray_color(&ray, &two_bounce_scene(1e30), 4, &mut StepRng::new(0, 0));
        assert_eq!(hot, Color::ZERO);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(1.7), 255);
        assert_eq!(quantize(-0.3), 0);
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(color_to_rgb(Color::new(4.0, 0.25, 0.0)), [255, 127, 0]);
    }

    #[test]
    fn test_settings_validation() {
        assert!(RenderSettings::default().validate().is_ok());
        assert_eq!(
            RenderSettings::default().with_resolution(0, 10).validate(),
            Err(ConfigurationError::InvalidResolution { width: 0, height: 10 })
        );
        assert_eq!(
            RenderSettings::default().with_quality(0, 50).validate(),
            Err(ConfigurationError::ZeroSamples)
        );
    }

    #[test]
    fn test_end_to_end_deterministic() {
        let scene = single_sphere_scene();
        let settings = RenderSettings::default()
            .with_resolution(5, 5)
            .with_quality(1, DEFAULT_MAX_DEPTH);
        let camera = CameraSettings::new()
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_fov(40.0)
            .build(settings.aspect_ratio())
            .unwrap();

        let image = render_with_rng(&camera, &scene, &settings, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(image.as_bytes().len(), 5 * 5 * 3);

        // Zero jitter: output pixel (x, y) samples s = x/5, t = (4 - y)/5.
        let background = |x: u32, y: u32| {
            let ray = camera.generate_ray(x as f32 / 5.0, (4 - y) as f32 / 5.0);
            color_to_rgb(sky_gradient(&ray))
        };

        for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            assert_eq!(image.get(x, y), Some(background(x, y)), "corner ({x}, {y})");
        }

        let center = image.get(2, 2).unwrap();
        let sky = background(2, 2);
        assert!(center.iter().zip(sky.iter()).all(|(c, s)| c < s), "{center:?} vs {sky:?}");
    }

    #[test]
    fn test_parallel_render_is_reproducible() {
        let scene = single_sphere_scene();
        let settings = RenderSettings::default()
            .with_resolution(12, 8)
            .with_quality(4, 10)
            .with_seed(7);
        let camera = CameraSettings::new()
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_fov(30.0)
            .build(settings.aspect_ratio())
            .unwrap();

        let first = render(&camera, &scene, &settings).unwrap();
        let second = render(&camera, &scene, &settings).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_rgb8().len(), 12 * 8 * 3);
        assert_eq!(first.get(11, 7), Some(first.pixels()[12 * 8 - 1]));
        assert_eq!(first.get(12, 0), None);
        assert_eq!(first.get(0, 8), None);

        let reseeded = render(&camera, &scene, &settings.clone().with_seed(8)).unwrap();
        assert_ne!(first, reseeded);
    }

    #[test]
    fn test_render_rejects_bad_settings() {
        let scene = single_sphere_scene();
        let camera = CameraSettings::new().build(1.0).unwrap();
        let settings = RenderSettings::default().with_resolution(0, 0);
        assert!(render(&camera, &scene, &settings).is_err());
    }
}
