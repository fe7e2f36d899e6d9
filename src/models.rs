//! Data models for spritemill objects (palettes, sprites, animations)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::raster::RasterError;

/// An RGB color triple, one component per channel in [0, 255].
pub type Color = [u8; 3];

/// Convert a color triple to an opaque RGBA pixel.
pub fn to_rgba(color: Color) -> image::Rgba<u8> {
    image::Rgba([color[0], color[1], color[2], 255])
}

/// A named palette mapping single-character symbols to colors.
///
/// Transparency is expressed by absence: a symbol that appears in a
/// sprite grid but has no entry in the palette rasterizes to an unset
/// (alpha-zero) block. That is a first-class palette semantic, not a
/// lookup failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub colors: HashMap<char, Color>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: HashMap<char, Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Look up the color for a symbol. `None` means transparent.
    pub fn color(&self, symbol: char) -> Option<Color> {
        self.colors.get(&symbol).copied()
    }
}

/// An indexed pixel-art image: equal-length rows of palette symbols,
/// first row at the top.
///
/// The grid is validated at construction (including serde
/// deserialization, which goes through [`SpriteDef::new`]): at least
/// one row, all rows the same non-zero length. A constructed
/// `SpriteDef` is immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SpriteDef {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl SpriteDef {
    /// Build a sprite definition from symbol rows.
    ///
    /// Fails with [`RasterError::MalformedSprite`] if the grid is empty
    /// or any row differs in length from the first.
    pub fn new<I, S>(rows: I) -> Result<Self, RasterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();

        let width = match rows.first() {
            Some(first) => first.len(),
            None => return Err(RasterError::MalformedSprite("grid has no rows".to_string())),
        };
        if width == 0 {
            return Err(RasterError::MalformedSprite("rows are empty".to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(RasterError::MalformedSprite(format!(
                    "row {} has {} symbols, expected {}",
                    i + 1,
                    row.len(),
                    width
                )));
            }
        }

        Ok(Self { rows, width })
    }

    /// Width in grid cells. Always >= 1.
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    /// Height in grid cells. Always >= 1.
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Symbol at grid cell (x, y), or `None` outside the grid.
    pub fn symbol(&self, x: u32, y: u32) -> Option<char> {
        self.rows.get(y as usize)?.get(x as usize).copied()
    }
}

impl TryFrom<Vec<String>> for SpriteDef {
    type Error = RasterError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        SpriteDef::new(rows)
    }
}

impl From<SpriteDef> for Vec<String> {
    fn from(def: SpriteDef) -> Self {
        def.rows.iter().map(|row| row.iter().collect()).collect()
    }
}

/// A named sprite in a document: its grid plus the palette it
/// references by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpriteEntry {
    pub name: String,
    pub palette: String,
    pub grid: SpriteDef,
}

fn default_rate_hz() -> f64 {
    8.0
}

/// A named animation in a document: an ordered list of sprite names
/// and a playback rate in frames per second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationEntry {
    pub name: String,
    pub frames: Vec<String>,
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
}

/// A spritemill document object - palette, sprite, or animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MillObject {
    Palette(Palette),
    Sprite(SpriteEntry),
    Animation(AnimationEntry),
}

/// A warning message from parsing or resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// A parsed document with palettes, sprites, and animations indexed by
/// name. This replaces any notion of process-wide sprite or palette
/// registries: a `Document` is plain caller-owned data.
#[derive(Debug, Clone, Default)]
pub struct Document {
    palettes: HashMap<String, Palette>,
    sprites: Vec<SpriteEntry>,
    animations: Vec<AnimationEntry>,
}

impl Document {
    /// Collect parsed objects into a document. A duplicate palette,
    /// sprite, or animation name keeps the later definition and
    /// produces a warning.
    pub fn from_objects(objects: Vec<MillObject>) -> (Self, Vec<Warning>) {
        let mut doc = Document::default();
        let mut warnings = Vec::new();

        for object in objects {
            match object {
                MillObject::Palette(palette) => {
                    if doc.palettes.contains_key(&palette.name) {
                        warnings.push(Warning {
                            message: format!(
                                "duplicate palette '{}', keeping later one",
                                palette.name
                            ),
                            line: 0,
                        });
                    }
                    doc.palettes.insert(palette.name.clone(), palette);
                }
                MillObject::Sprite(sprite) => {
                    if let Some(existing) = doc.sprites.iter_mut().find(|s| s.name == sprite.name)
                    {
                        warnings.push(Warning {
                            message: format!(
                                "duplicate sprite '{}', keeping later one",
                                sprite.name
                            ),
                            line: 0,
                        });
                        *existing = sprite;
                    } else {
                        doc.sprites.push(sprite);
                    }
                }
                MillObject::Animation(anim) => {
                    if let Some(existing) = doc.animations.iter_mut().find(|a| a.name == anim.name)
                    {
                        warnings.push(Warning {
                            message: format!(
                                "duplicate animation '{}', keeping later one",
                                anim.name
                            ),
                            line: 0,
                        });
                        *existing = anim;
                    } else {
                        doc.animations.push(anim);
                    }
                }
            }
        }

        (doc, warnings)
    }

    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn sprite(&self, name: &str) -> Option<&SpriteEntry> {
        self.sprites.iter().find(|s| s.name == name)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationEntry> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Sprites in document order.
    pub fn sprites(&self) -> &[SpriteEntry] {
        &self.sprites
    }

    /// Animations in document order.
    pub fn animations(&self) -> &[AnimationEntry] {
        &self.animations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_def_dimensions() {
        let def = SpriteDef::new(["01", "10", "11"]).unwrap();
        assert_eq!(def.width(), 2);
        assert_eq!(def.height(), 3);
    }

    #[test]
    fn test_sprite_def_symbol_lookup() {
        let def = SpriteDef::new(["ab", "cd"]).unwrap();
        assert_eq!(def.symbol(0, 0), Some('a'));
        assert_eq!(def.symbol(1, 1), Some('d'));
        assert_eq!(def.symbol(2, 0), None);
        assert_eq!(def.symbol(0, 2), None);
    }

    #[test]
    fn test_sprite_def_empty_grid_rejected() {
        let err = SpriteDef::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RasterError::MalformedSprite(_)));
    }

    #[test]
    fn test_sprite_def_empty_rows_rejected() {
        let err = SpriteDef::new(["", ""]).unwrap_err();
        assert!(matches!(err, RasterError::MalformedSprite(_)));
    }

    #[test]
    fn test_sprite_def_ragged_rows_rejected() {
        let err = SpriteDef::new(["0110", "011"]).unwrap_err();
        match err {
            RasterError::MalformedSprite(msg) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("expected 4"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sprite_def_serde_round_trip() {
        let def = SpriteDef::new(["01", "10"]).unwrap();
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(json, r#"["01","10"]"#);
        let back: SpriteDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_sprite_def_serde_rejects_ragged() {
        let result: Result<SpriteDef, _> = serde_json::from_str(r#"["01","1"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_palette_lookup_and_transparency() {
        let palette = Palette::new("mono", HashMap::from([('x', [255, 0, 0])]));
        assert_eq!(palette.color('x'), Some([255, 0, 0]));
        // Absent symbol means transparent, not an error
        assert_eq!(palette.color('?'), None);
    }

    #[test]
    fn test_mill_object_palette_from_json() {
        let json = r#"{"type": "palette", "name": "nes", "colors": {"1": [240, 172, 63]}}"#;
        let object: MillObject = serde_json::from_str(json).unwrap();
        match object {
            MillObject::Palette(p) => {
                assert_eq!(p.name, "nes");
                assert_eq!(p.color('1'), Some([240, 172, 63]));
            }
            other => panic!("expected palette, got {other:?}"),
        }
    }

    #[test]
    fn test_mill_object_animation_default_rate() {
        let json = r#"{"type": "animation", "name": "walk", "frames": ["a", "b"]}"#;
        let object: MillObject = serde_json::from_str(json).unwrap();
        match object {
            MillObject::Animation(a) => {
                assert_eq!(a.rate_hz, 8.0);
                assert_eq!(a.frames, vec!["a", "b"]);
            }
            other => panic!("expected animation, got {other:?}"),
        }
    }

    #[test]
    fn test_document_lookup_by_name() {
        let objects = vec![
            MillObject::Palette(Palette::new("mono", HashMap::from([('x', [0, 0, 0])]))),
            MillObject::Sprite(SpriteEntry {
                name: "dot".to_string(),
                palette: "mono".to_string(),
                grid: SpriteDef::new(["x"]).unwrap(),
            }),
        ];
        let (doc, warnings) = Document::from_objects(objects);
        assert!(warnings.is_empty());
        assert!(doc.palette("mono").is_some());
        assert!(doc.sprite("dot").is_some());
        assert!(doc.sprite("missing").is_none());
        assert!(doc.animation("missing").is_none());
    }

    #[test]
    fn test_document_duplicate_sprite_warns_and_keeps_later() {
        let make = |rows: &[&str]| SpriteEntry {
            name: "dot".to_string(),
            palette: "mono".to_string(),
            grid: SpriteDef::new(rows.to_vec()).unwrap(),
        };
        let (doc, warnings) = Document::from_objects(vec![
            MillObject::Sprite(make(&["x"])),
            MillObject::Sprite(make(&["xx"])),
        ]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("duplicate sprite 'dot'"));
        assert_eq!(doc.sprite("dot").unwrap().grid.width(), 2);
    }
}
