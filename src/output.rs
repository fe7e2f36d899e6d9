//! PNG output and file path generation

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA surface to a PNG file.
///
/// Transparent cells come through as alpha-zero pixels, so sprites
/// with unmapped symbols export with real transparency. Parent
/// directories are created if missing.
pub fn save_png(surface: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    surface.save(path)?;
    Ok(())
}

/// Output path for a named sprite: `{dir}/{name}.png`, defaulting to
/// the current directory.
pub fn sprite_path(dir: Option<&Path>, name: &str) -> PathBuf {
    dir.unwrap_or(Path::new(".")).join(format!("{name}.png"))
}
