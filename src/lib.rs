//! Spritemill - indexed pixel-art rasterization and animation
//!
//! This library provides functionality to:
//! - Model indexed pixel art as symbol grids keyed to color palettes
//! - Rasterize grids deterministically to RGBA surfaces at integer scales
//! - Cycle frames at a fixed rate under variable delta time
//! - Pack frame sequences into horizontal spritesheets
//! - Export surfaces as PNG and animations as looping GIF

pub mod animation;
pub mod cli;
pub mod gif;
pub mod models;
pub mod output;
pub mod parser;
pub mod raster;
pub mod spritesheet;
