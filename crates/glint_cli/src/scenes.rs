//! Built-in scene descriptions.

use glint_renderer::{
    Camera, CameraSettings, Color, ConfigResult, Dielectric, Lambertian, Metal, Scene, Sphere,
    Vec3,
};
use rand::{Rng, RngCore};

use crate::config::ScenePreset;

/// How a preset wants to be viewed.
#[derive(Debug, Clone, Copy)]
pub enum PresetCamera {
    /// A fixed image-plane frame, independent of the output aspect ratio.
    Frame(Camera),
    /// Regular camera settings, built once the aspect ratio is known.
    Lens(CameraSettings),
}

/// A scene together with its default camera.
pub struct Preset {
    pub scene: Scene,
    pub camera: PresetCamera,
}

impl ScenePreset {
    /// Build the scene. Only the random presets draw from `rng`.
    pub fn build(self, rng: &mut dyn RngCore) -> ConfigResult<Preset> {
        match self {
            ScenePreset::FourSpheres => four_spheres(),
            ScenePreset::RandomCover => random_cover(rng),
        }
    }
}

/// Diffuse, fuzzy metal and glass spheres on a large ground sphere.
pub fn four_spheres() -> ConfigResult<Preset> {
    let mut scene = Scene::new();

    let red = scene.add_material(Lambertian::new(Color::new(0.8, 0.3, 0.3))?);
    let ground = scene.add_material(Lambertian::new(Color::new(0.8, 0.8, 0.0))?);
    let brass = scene.add_material(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0)?);
    let glass = scene.add_material(Dielectric::new(1.5)?);

    scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, red)?)?;
    scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)?)?;
    scene.add(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, brass)?)?;
    scene.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass)?)?;

    let camera = Camera::from_frame(
        Vec3::ZERO,
        Vec3::new(-2.0, -1.0, -1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    );

    Ok(Preset {
        scene,
        camera: PresetCamera::Frame(camera),
    })
}

/// Ground, three large feature spheres and a grid of small random spheres.
pub fn random_cover(rng: &mut dyn RngCore) -> ConfigResult<Preset> {
    let mut scene = Scene::new();

    // Ground
    let ground = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5))?);
    scene.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)?)?;

    // One glass material shared by every glass sphere
    let glass = scene.add_material(Dielectric::new(1.5)?);

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                scene.add_material(Lambertian::new(albedo)?)
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                scene.add_material(Metal::new(albedo, fuzz)?)
            } else {
                glass
            };

            scene.add(Sphere::new(center, 0.2, material)?)?;
        }
    }

    // Three main spheres
    let brown = scene.add_material(Lambertian::new(Color::new(0.4, 0.2, 0.1))?);
    let mirror = scene.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)?);
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)?)?;
    scene.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown)?)?;
    scene.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror)?)?;

    log::debug!("Created {} objects with {} materials", scene.len(), scene.material_count());

    let camera = CameraSettings::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_fov(20.0)
        .with_lens(0.1, 10.0);

    Ok(Preset {
        scene,
        camera: PresetCamera::Lens(camera),
    })
}
