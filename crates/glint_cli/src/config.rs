//! Command-line flags and the optional JSON settings file.
//!
//! Precedence: flags, then the file, then built-in defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use glint_renderer::{CameraSettings, RenderSettings};
use serde::Deserialize;
use structopt::StructOpt;

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    /// Three spheres on a large ground sphere: diffuse, fuzzy metal, glass.
    FourSpheres,
    /// Field of small random spheres around three large ones.
    RandomCover,
}

impl ScenePreset {
    pub const NAMES: &'static [&'static str] = &["four-spheres", "random-cover"];
}

impl FromStr for ScenePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "four-spheres" => Ok(ScenePreset::FourSpheres),
            "random-cover" => Ok(ScenePreset::RandomCover),
            other => Err(format!(
                "unknown scene '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScenePreset::FourSpheres => "four-spheres",
            ScenePreset::RandomCover => "random-cover",
        })
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "glint", about = "Path trace a scene of spheres into an image file")]
pub struct Opt {
    /// Output image; `.ppm` writes plain-text PPM, anything else goes through the image encoder
    #[structopt(short, long, parse(from_os_str), default_value = "out.png")]
    pub output: PathBuf,

    /// JSON file with optional "render" and "camera" sections
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Scene to render
    #[structopt(long, default_value = "four-spheres", possible_values = ScenePreset::NAMES)]
    pub scene: ScenePreset,

    /// Image width in pixels
    #[structopt(short, long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[structopt(short = "H", long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[structopt(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounces per path
    #[structopt(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[structopt(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[structopt(short = "j", long)]
    pub threads: Option<usize>,
}

/// Layout of the JSON settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub render: RenderSettings,
    /// Replaces the scene preset's camera when present.
    pub camera: Option<CameraSettings>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}

/// Merge defaults, the settings file and command-line flags.
pub fn resolve(opt: &Opt) -> Result<(RenderSettings, Option<CameraSettings>)> {
    let file = match &opt.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    Ok((apply_overrides(file.render, opt), file.camera))
}

fn apply_overrides(mut settings: RenderSettings, opt: &Opt) -> RenderSettings {
    if let Some(width) = opt.width {
        settings.width = width;
    }
    if let Some(height) = opt.height {
        settings.height = height;
    }
    if let Some(samples) = opt.samples {
        settings.samples_per_pixel = samples;
    }
    if let Some(max_depth) = opt.max_depth {
        settings.max_depth = max_depth;
    }
    if let Some(seed) = opt.seed {
        settings = settings.with_seed(seed);
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_renderer::{Vec3, DEFAULT_MAX_DEPTH};

    #[test]
    fn test_scene_preset_parse() {
        assert_eq!("four-spheres".parse::<ScenePreset>(), Ok(ScenePreset::FourSpheres));
        assert_eq!("random-cover".parse::<ScenePreset>(), Ok(ScenePreset::RandomCover));
        assert!("cornell".parse::<ScenePreset>().is_err());
        assert_eq!(ScenePreset::RandomCover.to_string(), "random-cover");
    }

    #[test]
    fn test_flags_override_file() {
        let args = ["glint", "--width", "64", "--seed", "9", "--scene", "random-cover"];
        let opt = Opt::from_iter(args);
        assert_eq!(opt.scene, ScenePreset::RandomCover);

        let file: SettingsFile = serde_json::from_str(
            r#"{ "render": { "width": 800, "height": 100, "samples_per_pixel": 3 } }"#,
        )
        .unwrap();
        let settings = apply_overrides(file.render, &opt);

        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, 100);
        assert_eq!(settings.samples_per_pixel, 3);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.seed, 9);
    }

    #[test]
    fn test_settings_file_camera_section() {
        let file: SettingsFile = serde_json::from_str(
            r#"{
                "camera": {
                    "look_from": [13.0, 2.0, 3.0],
                    "look_at": [0.0, 0.0, 0.0],
                    "aperture": 0.1
                }
            }"#,
        )
        .unwrap();
        let camera = file.camera.unwrap();

        assert_eq!(camera.look_from, Vec3::new(13.0, 2.0, 3.0));
        assert_eq!(camera.aperture, 0.1);
        assert_eq!(camera.vfov, CameraSettings::default().vfov);
        assert_eq!(file.render, RenderSettings::default());
    }

    #[test]
    fn test_settings_file_rejects_typos() {
        assert!(serde_json::from_str::<SettingsFile>(r#"{ "rendr": {} }"#).is_err());
    }

    #[test]
    fn test_missing_settings_file() {
        let err = SettingsFile::load(Path::new("/nonexistent/glint.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
    }
}
