//! Line-oriented JSON5 parsing for spritemill documents
//!
//! A document is a stream of objects, one per line (JSONL). JSON5
//! niceties apply within a line: unquoted keys, trailing commas, and
//! `//` comments. Whole-line comments and blank lines are skipped.

use crate::models::{MillObject, Warning};
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Result of parsing a document stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub objects: Vec<MillObject>,
    pub warnings: Vec<Warning>,
}

/// Parse a single line into a [`MillObject`].
pub fn parse_line(line: &str, line_number: usize) -> Result<MillObject, ParseError> {
    json5::from_str(line).map_err(|e| ParseError {
        message: e.to_string(),
        line: line_number,
    })
}

/// Parse a document stream leniently.
///
/// Each non-blank, non-comment line must hold one object. A line that
/// fails to parse becomes a [`Warning`] and parsing continues with the
/// next line - object boundaries are lines, so one bad line never
/// poisons the rest of the stream.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    let mut result = ParseResult::default();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                result.warnings.push(Warning {
                    message: format!("read error: {e}"),
                    line: line_number,
                });
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        match parse_line(trimmed, line_number) {
            Ok(object) => result.objects.push(object),
            Err(e) => result.warnings.push(Warning {
                message: e.message,
                line: e.line,
            }),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MillObject;
    use serial_test::serial;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_palette() {
        let line = r#"{"type": "palette", "name": "mono", "colors": {"x": [255, 255, 255]}}"#;
        let object = parse_line(line, 1).unwrap();
        match object {
            MillObject::Palette(p) => {
                assert_eq!(p.name, "mono");
                assert_eq!(p.color('x'), Some([255, 255, 255]));
            }
            other => panic!("expected palette, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_sprite() {
        let line = r#"{"type": "sprite", "name": "dot", "palette": "mono", "grid": ["x"]}"#;
        let object = parse_line(line, 1).unwrap();
        match object {
            MillObject::Sprite(s) => {
                assert_eq!(s.name, "dot");
                assert_eq!(s.palette, "mono");
                assert_eq!(s.grid.width(), 1);
            }
            other => panic!("expected sprite, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_invalid_json() {
        let err = parse_line("{not valid", 5).unwrap_err();
        assert_eq!(err.line, 5);
    }

    #[test]
    fn test_parse_line_missing_type() {
        assert!(parse_line(r#"{"name": "test", "grid": ["x"]}"#, 1).is_err());
    }

    #[test]
    fn test_parse_line_ragged_grid_is_an_error() {
        // Grid validation happens during deserialization
        let line = r#"{"type": "sprite", "name": "bad", "palette": "p", "grid": ["xx", "x"]}"#;
        assert!(parse_line(line, 1).is_err());
    }

    #[test]
    fn test_parse_line_json5_features() {
        let line = r#"{type: "palette", name: "mono", colors: {"x": [1, 2, 3],},}"#;
        let object = parse_line(line, 1).unwrap();
        assert!(matches!(object, MillObject::Palette(_)));
    }

    #[test]
    fn test_parse_stream_simple() {
        let input = r#"{"type": "palette", "name": "mono", "colors": {"x": [255, 255, 255]}}
{"type": "sprite", "name": "dot", "palette": "mono", "grid": ["x"]}"#;
        let result = parse_stream(Cursor::new(input));
        assert_eq!(result.objects.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_stream_skips_blank_and_comment_lines() {
        let input = "// sprites below\n\n{\"type\": \"palette\", \"name\": \"p\", \"colors\": {}}\n\n";
        let result = parse_stream(Cursor::new(input));
        assert_eq!(result.objects.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_stream_bad_line_warns_and_continues() {
        let input = r#"{"type": "palette", "name": "p", "colors": {}}
{broken
{"type": "sprite", "name": "dot", "palette": "p", "grid": ["x"]}"#;
        let result = parse_stream(Cursor::new(input));
        assert_eq!(result.objects.len(), 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_parse_stream_animation() {
        let input =
            r#"{"type": "animation", "name": "walk", "frames": ["a", "b"], "rate_hz": 12}"#;
        let result = parse_stream(Cursor::new(input));
        assert_eq!(result.objects.len(), 1);
        match &result.objects[0] {
            MillObject::Animation(a) => {
                assert_eq!(a.name, "walk");
                assert_eq!(a.rate_hz, 12.0);
            }
            other => panic!("expected animation, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_parse_valid_fixtures() {
        use std::fs;
        use std::path::Path;

        let fixtures_dir = Path::new("tests/fixtures/valid");
        if !fixtures_dir.exists() {
            return; // Skip if fixtures not available
        }

        for entry in fs::read_dir(fixtures_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().is_some_and(|e| e == "jsonl") {
                let file = fs::File::open(&path).unwrap();
                let result = parse_stream(BufReader::new(file));
                assert!(!result.objects.is_empty(), "expected objects in {path:?}");
                assert!(
                    result.warnings.is_empty(),
                    "unexpected warnings in {path:?}: {:?}",
                    result.warnings
                );
            }
        }
    }

    #[test]
    #[serial]
    fn test_parse_invalid_fixtures() {
        use std::fs;
        use std::path::Path;

        let fixtures_dir = Path::new("tests/fixtures/invalid");
        if !fixtures_dir.exists() {
            return; // Skip if fixtures not available
        }

        for entry in fs::read_dir(fixtures_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().is_some_and(|e| e == "jsonl") {
                let file = fs::File::open(&path).unwrap();
                let result = parse_stream(BufReader::new(file));
                assert!(
                    !result.warnings.is_empty(),
                    "expected warnings in {path:?}"
                );
            }
        }
    }
}
