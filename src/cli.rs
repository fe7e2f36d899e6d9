//! Command-line interface implementation

use clap::{Parser, Subcommand};
use image::RgbaImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::gif::save_gif;
use crate::models::{AnimationEntry, Document, Palette, Warning};
use crate::output::{save_png, sprite_path};
use crate::parser::parse_stream;
use crate::raster::rasterize;
use crate::spritesheet::compose;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Spritemill - render indexed pixel art definitions to PNG, spritesheets, and GIF
#[derive(Parser)]
#[command(name = "smill")]
#[command(about = "Spritemill - render indexed pixel art definitions to PNG, spritesheets, and GIF")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render sprites from a JSONL document to PNG files
    Render {
        /// Input JSONL file containing palette and sprite definitions
        input: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Only render the sprite with this name
        #[arg(short, long)]
        sprite: Option<String>,

        /// Render with this palette instead of each sprite's own (palette swap)
        #[arg(short, long)]
        palette: Option<String>,

        /// Integer magnification, 1 pixel per grid cell at 1
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Pack an animation's frames into one horizontal spritesheet PNG
    Sheet {
        /// Input JSONL file
        input: PathBuf,

        /// Animation name (may be omitted when the document has exactly one)
        #[arg(short, long)]
        animation: Option<String>,

        /// Output file (default: {animation}_sheet.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render with this palette instead of each sprite's own
        #[arg(short, long)]
        palette: Option<String>,

        /// Integer magnification
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Encode an animation as a looping GIF
    Gif {
        /// Input JSONL file
        input: PathBuf,

        /// Animation name (may be omitted when the document has exactly one)
        #[arg(short, long)]
        animation: Option<String>,

        /// Output file (default: {animation}.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render with this palette instead of each sprite's own
        #[arg(short, long)]
        palette: Option<String>,

        /// Integer magnification
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            out_dir,
            sprite,
            palette,
            scale,
            strict,
        } => run_render(
            &input,
            out_dir.as_deref(),
            sprite.as_deref(),
            palette.as_deref(),
            scale,
            strict,
        ),
        Commands::Sheet {
            input,
            animation,
            output,
            palette,
            scale,
            strict,
        } => run_sheet(
            &input,
            animation.as_deref(),
            output.as_deref(),
            palette.as_deref(),
            scale,
            strict,
        ),
        Commands::Gif {
            input,
            animation,
            output,
            palette,
            scale,
            strict,
        } => run_gif(
            &input,
            animation.as_deref(),
            output.as_deref(),
            palette.as_deref(),
            scale,
            strict,
        ),
    }
}

/// Parse the input file into a document, reporting warnings on stderr.
///
/// Returns the exit code to bail with when the file cannot be opened
/// or strict mode turned warnings into errors.
fn load_document(input: &Path, strict: bool) -> Result<Document, ExitCode> {
    let file = match File::open(input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open input file '{}': {}", input.display(), e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    let parse_result = parse_stream(BufReader::new(file));
    let (document, doc_warnings) = Document::from_objects(parse_result.objects);

    let warnings: Vec<Warning> = parse_result
        .warnings
        .into_iter()
        .chain(doc_warnings)
        .collect();
    for warning in &warnings {
        if warning.line > 0 {
            eprintln!("Warning: line {}: {}", warning.line, warning.message);
        } else {
            eprintln!("Warning: {}", warning.message);
        }
    }
    if strict && !warnings.is_empty() {
        eprintln!("Error: {} warning(s) in strict mode", warnings.len());
        return Err(ExitCode::from(EXIT_ERROR));
    }

    Ok(document)
}

/// Resolve the palette a sprite renders with: the `--palette` override
/// when given, otherwise the palette the sprite names.
fn resolve_palette<'a>(
    document: &'a Document,
    sprite_palette: &str,
    override_name: Option<&str>,
) -> Result<&'a Palette, String> {
    let name = override_name.unwrap_or(sprite_palette);
    document
        .palette(name)
        .ok_or_else(|| format!("unknown palette '{name}'"))
}

/// Pick the animation to operate on: by name, or the document's only
/// one when no name is given.
fn pick_animation<'a>(
    document: &'a Document,
    name: Option<&str>,
) -> Result<&'a AnimationEntry, String> {
    match name {
        Some(name) => document
            .animation(name)
            .ok_or_else(|| format!("unknown animation '{name}'")),
        None => match document.animations() {
            [only] => Ok(only),
            [] => Err("document has no animations".to_string()),
            many => Err(format!(
                "document has {} animations, pick one with --animation",
                many.len()
            )),
        },
    }
}

/// Rasterize every frame of an animation in playback order.
fn rasterize_frames(
    document: &Document,
    animation: &AnimationEntry,
    palette_override: Option<&str>,
    scale: u32,
) -> Result<Vec<RgbaImage>, String> {
    let mut frames = Vec::with_capacity(animation.frames.len());
    for frame_name in &animation.frames {
        let sprite = document.sprite(frame_name).ok_or_else(|| {
            format!(
                "animation '{}' references unknown sprite '{}'",
                animation.name, frame_name
            )
        })?;
        let palette = resolve_palette(document, &sprite.palette, palette_override)?;
        let surface = rasterize(&sprite.grid, palette, scale).map_err(|e| e.to_string())?;
        frames.push(surface);
    }
    Ok(frames)
}

/// Execute the render command
fn run_render(
    input: &Path,
    out_dir: Option<&Path>,
    sprite_filter: Option<&str>,
    palette_override: Option<&str>,
    scale: u32,
    strict: bool,
) -> ExitCode {
    let document = match load_document(input, strict) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let sprites: Vec<_> = document
        .sprites()
        .iter()
        .filter(|s| sprite_filter.is_none_or(|name| s.name == name))
        .collect();
    if sprites.is_empty() {
        match sprite_filter {
            Some(name) => eprintln!("Error: no sprite named '{name}' in document"),
            None => eprintln!("Error: document has no sprites"),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    for sprite in sprites {
        let palette = match resolve_palette(&document, &sprite.palette, palette_override) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: sprite '{}': {}", sprite.name, e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        let surface = match rasterize(&sprite.grid, palette, scale) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: sprite '{}': {}", sprite.name, e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        let path = sprite_path(out_dir, &sprite.name);
        if let Err(e) = save_png(&surface, &path) {
            eprintln!("Error: cannot save '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the sheet command
fn run_sheet(
    input: &Path,
    animation_name: Option<&str>,
    output: Option<&Path>,
    palette_override: Option<&str>,
    scale: u32,
    strict: bool,
) -> ExitCode {
    let document = match load_document(input, strict) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let result = pick_animation(&document, animation_name).and_then(|animation| {
        let frames = rasterize_frames(&document, animation, palette_override, scale)?;
        let sheet = compose(&frames).map_err(|e| e.to_string())?;
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{}_sheet.png", animation.name)));
        save_png(&sheet, &path).map_err(|e| e.to_string())?;
        Ok(path)
    });

    match result {
        Ok(path) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the gif command
fn run_gif(
    input: &Path,
    animation_name: Option<&str>,
    output: Option<&Path>,
    palette_override: Option<&str>,
    scale: u32,
    strict: bool,
) -> ExitCode {
    let document = match load_document(input, strict) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let result = pick_animation(&document, animation_name).and_then(|animation| {
        if animation.rate_hz <= 0.0 || !animation.rate_hz.is_finite() {
            return Err(format!(
                "animation '{}' has invalid frame rate {} Hz",
                animation.name, animation.rate_hz
            ));
        }
        let frames = rasterize_frames(&document, animation, palette_override, scale)?;
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{}.gif", animation.name)));
        save_gif(&frames, animation.rate_hz, &path).map_err(|e| e.to_string())?;
        Ok(path)
    });

    match result {
        Ok(path) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
