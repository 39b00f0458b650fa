mod config;
mod output;
mod scenes;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use crate::config::Opt;
use crate::scenes::PresetCamera;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let opt = Opt::from_args();
    log::info!("Starting Glint ({} scene)", opt.scene);

    if let Some(threads) = opt.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let (settings, camera_override) = config::resolve(&opt)?;

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let preset = opt
        .scene
        .build(&mut rng)
        .with_context(|| format!("failed to build scene {}", opt.scene))?;

    let camera = match (camera_override, preset.camera) {
        (Some(camera_settings), _) | (None, PresetCamera::Lens(camera_settings)) => {
            camera_settings
                .build(settings.aspect_ratio())
                .context("invalid camera settings")?
        }
        (None, PresetCamera::Frame(camera)) => camera,
    };
    log::info!(
        "Camera at {} looking along {}, lens radius {}",
        camera.origin(),
        camera.forward(),
        camera.lens_radius()
    );

    let image = glint_renderer::render(&camera, &preset.scene, &settings)
        .context("invalid render settings")?;

    output::write_image(&opt.output, &image)?;
    log::info!("Wrote {}", opt.output.display());

    Ok(())
}
