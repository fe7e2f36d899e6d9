//! Fixed-rate frame cycling for animated sprites

use crate::models::{Palette, SpriteDef};
use crate::raster::{rasterize, RasterError};
use image::RgbaImage;
use thiserror::Error;

/// Error type for animation construction failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    /// Animation constructed with an empty frame list
    #[error("animation has no frames")]
    NoFrames,
    /// Frame rate is zero, negative, or not finite
    #[error("invalid frame rate {0} Hz, must be positive and finite")]
    InvalidFrameRate(f64),
}

/// One animation frame: a rasterized surface tagged with the symbolic
/// definition and scale it came from.
///
/// Keeping the source grid alongside the pixels is what makes palette
/// swaps exact: [`AnimatedSprite::set_palette`] regenerates each
/// surface from its grid instead of recoloring pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    def: SpriteDef,
    scale: u32,
    surface: RgbaImage,
}

impl Frame {
    /// Rasterize a sprite definition into a frame.
    pub fn rasterize(def: &SpriteDef, palette: &Palette, scale: u32) -> Result<Self, RasterError> {
        let surface = rasterize(def, palette, scale)?;
        Ok(Self {
            def: def.clone(),
            scale,
            surface,
        })
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn definition(&self) -> &SpriteDef {
        &self.def
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

/// A looping frame cycler driven by accumulated delta time.
///
/// The sprite owns its frames and playback state; the only mutations
/// are [`advance`](Self::advance) and
/// [`set_palette`](Self::set_palette), called by the sprite's
/// exclusive owner. Looping is unconditional - single-shot playback is
/// the caller's concern (stop calling `advance`).
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    frames: Vec<Frame>,
    frame_duration: f64,
    current: usize,
    accumulator: f64,
}

impl AnimatedSprite {
    /// Create an animation over `frames` playing at `rate_hz` frames
    /// per second.
    ///
    /// Fails with [`AnimationError::NoFrames`] on an empty frame list
    /// and [`AnimationError::InvalidFrameRate`] unless
    /// `rate_hz` is finite and positive.
    pub fn new(frames: Vec<Frame>, rate_hz: f64) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::NoFrames);
        }
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(AnimationError::InvalidFrameRate(rate_hz));
        }
        Ok(Self {
            frames,
            frame_duration: 1.0 / rate_hz,
            current: 0,
            accumulator: 0.0,
        })
    }

    /// Advance playback by `dt` seconds (negative dt is treated as 0).
    ///
    /// Accumulated time is drained one frame duration at a time, so a
    /// dt spanning several frame durations (a stall, a long blocking
    /// call in the host loop) advances exactly the right number of
    /// frames instead of at most one. Afterwards the accumulator is
    /// back below one frame duration.
    pub fn advance(&mut self, dt: f64) {
        self.accumulator += dt.max(0.0);
        while self.accumulator >= self.frame_duration {
            self.accumulator -= self.frame_duration;
            self.current = (self.current + 1) % self.frames.len();
        }
    }

    /// The frame at the current playback position. Pure read.
    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    /// Index of the current frame, in `[0, frame_count)`.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Seconds accumulated toward the next frame step. Always in
    /// `[0, 1/rate)` after `advance` returns.
    pub fn accumulated_time(&self) -> f64 {
        self.accumulator
    }

    /// Seconds each frame stays current.
    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    /// Swap every frame to a new palette.
    ///
    /// Each surface is re-rasterized from its tagged definition at its
    /// tagged scale; old surfaces are dropped. Playback position and
    /// accumulated time are untouched.
    pub fn set_palette(&mut self, palette: &Palette) -> Result<(), RasterError> {
        for frame in &mut self.frames {
            frame.surface = rasterize(&frame.def, palette, frame.scale)?;
        }
        Ok(())
    }
}
