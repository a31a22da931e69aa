use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::color::ValueKind;
use crate::pipeline::palette::Palette;

/// A scheme value that could not be read as a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {value:?} ({kind} value, expected hex digits)")]
pub struct MalformedColorError {
    pub value: String,
    pub kind: ValueKind,
}

impl MalformedColorError {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
            kind: ValueKind::classify(value),
        }
    }
}

/// Every way converting a single scheme file can fail.
#[derive(Debug, Error)]
pub enum SwatchError {
    #[error("key {key:?}: {source}")]
    MalformedColor {
        key: String,
        #[source]
        source: MalformedColorError,
    },

    #[error("no base colors to draw")]
    EmptyPalette,

    #[error("expected {expected} colors, actual color count is {actual}: {palette}")]
    PaletteSizeMismatch {
        expected: usize,
        actual: usize,
        palette: Palette,
    },

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse scheme {}: {source}", .path.display())]
    SchemeSyntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "unsupported image format {name:?} (lossless formats: png, bmp, tiff, tga, ppm, qoi, webp)"
    )]
    UnsupportedFormat { name: String },

    #[error("invalid input pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T, E = SwatchError> = std::result::Result<T, E>;
