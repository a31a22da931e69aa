use std::fmt;

use crate::color::{decode_hex_color, Color};
use crate::error::{Result, SwatchError};
use crate::scheme::Scheme;

/// Only keys containing this marker name a color slot.
pub const SLOT_MARKER: &str = "base";

/// Canonical number of slots in a base16 scheme.
pub const BASE16_SLOT_COUNT: usize = 16;

/// A decoded `baseXX` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSlot {
    pub key: String,
    pub raw_value: String,
    pub rgb: Color,
}

/// Color slots in the order they appear in the scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    slots: Vec<ColorSlot>,
}

impl Palette {
    pub fn new(slots: Vec<ColorSlot>) -> Self {
        Self { slots }
    }

    /// Build a palette straight from colors, naming them `base00`, `base01`, ...
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let slots = colors
            .into_iter()
            .enumerate()
            .map(|(i, rgb)| ColorSlot {
                key: format!("base{i:02X}"),
                raw_value: format!("{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b),
                rgb,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorSlot> {
        self.slots.iter()
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.slots.iter().map(|slot| slot.rgb)
    }

    pub fn get(&self, index: usize) -> Option<&ColorSlot> {
        self.slots.get(index)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", slot.key, slot.rgb)?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ColorSlot;
    type IntoIter = std::slice::Iter<'a, ColorSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// What to do with a `base` entry whose value is not a hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Stop building and return the error.
    #[default]
    Fail,
    /// Log the entry and leave it out of the palette.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOptions {
    /// Required number of slots; 0 disables the check.
    pub expected_count: usize,
    pub on_malformed: MalformedPolicy,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            expected_count: BASE16_SLOT_COUNT,
            on_malformed: MalformedPolicy::Fail,
        }
    }
}

/// Select and decode the color slots of `scheme`, preserving their order.
///
/// Keys without `base` in them are metadata (`scheme`, `author`, ...) and are
/// skipped silently whatever their value.
pub fn build_palette(scheme: &Scheme, options: &PaletteOptions) -> Result<Palette> {
    let mut slots = Vec::new();

    for (key, value) in scheme.iter() {
        if !key.contains(SLOT_MARKER) {
            tracing::debug!(key, "skipping non-color key");
            continue;
        }

        let rgb = match decode_hex_color(value) {
            Ok(rgb) => rgb,
            Err(source) => {
                tracing::error!(key, value, kind = %source.kind, "invalid color");
                match options.on_malformed {
                    MalformedPolicy::Fail => {
                        return Err(SwatchError::MalformedColor {
                            key: key.to_owned(),
                            source,
                        })
                    }
                    MalformedPolicy::Skip => continue,
                }
            }
        };

        tracing::debug!(key, value, r = rgb.r, g = rgb.g, b = rgb.b, "decoded {rgb}");
        slots.push(ColorSlot {
            key: key.to_owned(),
            raw_value: value.to_owned(),
            rgb,
        });
    }

    let palette = Palette::new(slots);
    tracing::info!(count = palette.len(), "collected colors");

    if options.expected_count != 0 && palette.len() != options.expected_count {
        return Err(SwatchError::PaletteSizeMismatch {
            expected: options.expected_count,
            actual: palette.len(),
            palette,
        });
    }

    Ok(palette)
}
