//! Writing rendered framebuffers to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use glint_renderer::Framebuffer;

/// Save the image, choosing the format from the file extension.
///
/// `.ppm` is written as plain-text PPM; everything else goes to the `image`
/// encoder (PNG in the default build).
pub fn write_image(path: &Path, image: &Framebuffer) -> Result<()> {
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(&mut writer, image)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        let buffer = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
            .context("pixel buffer does not match the image size")?;
        buffer
            .save(path)
            .with_context(|| format!("failed to encode {}", path.display()))?;
    }

    Ok(())
}

/// Write a plain-text (P3) PPM, one pixel per line, top row first.
pub fn write_ppm<W: Write>(writer: &mut W, image: &Framebuffer) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in image.pixels() {
        writeln!(writer, "{r} {g} {b}")?;
    }

    Ok(())
}
