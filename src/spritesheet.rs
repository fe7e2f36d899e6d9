//! Spritesheet composition - packs frames into one horizontal strip

use crate::raster::TRANSPARENT;
use image::RgbaImage;
use thiserror::Error;

/// Error type for spritesheet composition failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Composition called with zero frames
    #[error("cannot compose a spritesheet from zero frames")]
    EmptyFrameSet,
}

/// Pack frames left to right into a single surface.
///
/// Output width is the sum of the frame widths and output height the
/// maximum frame height. Each frame lands at the cumulative x-offset
/// of the frames before it, top-aligned at y = 0; the gap below a
/// shorter frame stays transparent. Sprites legitimately differ in
/// height across animation poses, so mixed heights are policy here,
/// not an error.
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use spritemill::spritesheet::compose;
///
/// let frame = RgbaImage::from_pixel(64, 64, image::Rgba([255, 0, 0, 255]));
/// let sheet = compose(&[frame.clone(), frame.clone(), frame]).unwrap();
/// assert_eq!(sheet.dimensions(), (192, 64));
/// ```
pub fn compose(frames: &[RgbaImage]) -> Result<RgbaImage, SheetError> {
    if frames.is_empty() {
        return Err(SheetError::EmptyFrameSet);
    }

    let sheet_width: u32 = frames.iter().map(|f| f.width()).sum();
    let sheet_height = frames.iter().map(|f| f.height()).max().unwrap_or(0);
    let mut sheet = RgbaImage::from_pixel(sheet_width, sheet_height, TRANSPARENT);

    let mut offset_x = 0;
    for frame in frames {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                sheet.put_pixel(offset_x + x, y, *frame.get_pixel(x, y));
            }
        }
        offset_x += frame.width();
    }

    Ok(sheet)
}
