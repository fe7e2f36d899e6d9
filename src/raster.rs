//! Deterministic rasterization of indexed sprite grids to image buffers

use crate::models::{to_rgba, Palette, SpriteDef};
use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Transparent pixel used for symbols without a palette entry.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for rasterization failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Grid has no rows, empty rows, or rows of unequal length
    #[error("malformed sprite: {0}")]
    MalformedSprite(String),
    /// Scale factor below the minimum of 1
    #[error("invalid scale {0}, must be at least 1")]
    InvalidScale(u32),
}

/// Rasterize a sprite grid through a palette into an RGBA buffer.
///
/// The output is `(width * scale, height * scale)` pixels. Each grid
/// cell becomes an axis-aligned `scale x scale` block filled with its
/// palette color - nearest-neighbor semantics, no interpolation, so
/// pixel-art edges stay crisp. A symbol with no palette entry leaves
/// its block at alpha-zero (transparent by design).
///
/// Rasterization is pure: the same (sprite, palette, scale) triple
/// always produces bit-identical output.
///
/// # Examples
///
/// ```
/// use spritemill::models::{Palette, SpriteDef};
/// use spritemill::raster::rasterize;
/// use std::collections::HashMap;
///
/// let def = SpriteDef::new(["01", "10"]).unwrap();
/// let palette = Palette::new(
///     "demo",
///     HashMap::from([('0', [255, 0, 0]), ('1', [0, 255, 0])]),
/// );
///
/// let surface = rasterize(&def, &palette, 1).unwrap();
/// assert_eq!(surface.dimensions(), (2, 2));
/// assert_eq!(*surface.get_pixel(0, 0), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(*surface.get_pixel(1, 0), image::Rgba([0, 255, 0, 255]));
/// ```
pub fn rasterize(sprite: &SpriteDef, palette: &Palette, scale: u32) -> Result<RgbaImage, RasterError> {
    if scale < 1 {
        return Err(RasterError::InvalidScale(scale));
    }

    let mut surface = RgbaImage::from_pixel(
        sprite.width() * scale,
        sprite.height() * scale,
        TRANSPARENT,
    );

    for (y, row) in sprite.rows().enumerate() {
        for (x, &symbol) in row.iter().enumerate() {
            let Some(color) = palette.color(symbol) else {
                // Unmapped symbol: block stays transparent
                continue;
            };
            let rgba = to_rgba(color);
            let base_x = x as u32 * scale;
            let base_y = y as u32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    surface.put_pixel(base_x + dx, base_y + dy, rgba);
                }
            }
        }
    }

    Ok(surface)
}

/// Re-rasterize a sprite under a different palette.
///
/// A palette swap is never a transform on an existing surface: mapping
/// pixels back to symbols is ambiguous once two symbols share a color.
/// Going back to the symbolic grid keeps every swap exact.
pub fn reskin(sprite: &SpriteDef, new_palette: &Palette, scale: u32) -> Result<RgbaImage, RasterError> {
    rasterize(sprite, new_palette, scale)
}
