//! Animated GIF export for frame sequences

use crate::output::OutputError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Encode frames as a looping animated GIF at `rate_hz` frames per
/// second.
///
/// The per-frame delay is `1000 / rate_hz` milliseconds, floored to
/// the GIF minimum of 10 ms. An empty frame slice writes nothing and
/// returns Ok.
pub fn save_gif(frames: &[RgbaImage], rate_hz: f64, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;

    // GIF delays are in centiseconds; round the frame duration to the
    // nearest and keep at least one
    let delay_ms = ((1000.0 / rate_hz / 10.0).round() as u32).max(1) * 10;

    for surface in frames {
        let delay = image::Delay::from_numer_denom_ms(delay_ms, 1);
        let frame = Frame::from_parts(surface.clone(), 0, 0, delay);
        encoder.encode_frame(frame)?;
    }

    Ok(())
}
