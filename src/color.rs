use std::fmt;

use crate::error::MalformedColorError;

const CHANNEL_MASK: u32 = 0x00FF_FFFF;

/// An sRGB color with 8-bit channels, as stored in a base16 scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Split the low 24 bits of `value` into red (16-23), green (8-15) and
    /// blue (0-7).
    pub fn from_u24(value: u32) -> Self {
        let value = value & CHANNEL_MASK;
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(p: image::Rgb<u8>) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// What an undecodable scheme token looks like. Reported alongside the raw
/// text so a bad value can be diagnosed without re-running the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Empty,
    Null,
    Boolean,
    Float,
    Text,
}

impl ValueKind {
    /// Classify a raw scalar the way a type-inferring YAML loader would.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ValueKind::Empty;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "~" | "null" => ValueKind::Null,
            "y" | "n" | "yes" | "no" | "true" | "false" | "on" | "off" => ValueKind::Boolean,
            s if s.parse::<f64>().is_ok() => ValueKind::Float,
            _ => ValueKind::Text,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Empty => "empty",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Decode a hex color such as `151515`, `0x151515` or `1`.
///
/// Any number of hex digits is accepted; only the low 24 bits are kept, so
/// short values behave as if zero-padded (`"1"` decodes like `"000001"`).
pub fn decode_hex_color(value: &str) -> Result<Color, MalformedColorError> {
    let malformed = || MalformedColorError::new(value);

    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(malformed());
    }

    let mut acc: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(16).ok_or_else(malformed)?;
        acc = ((acc << 4) | digit) & CHANNEL_MASK;
    }

    let color = Color::from_u24(acc);
    tracing::trace!(value, %color, "decoded hex color");
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_black_and_white() {
        assert_eq!(decode_hex_color("000000").unwrap(), Color::new(0, 0, 0));
        assert_eq!(decode_hex_color("ffffff").unwrap(), Color::WHITE);
    }

    #[test]
    fn channels_come_from_byte_positions() {
        let color = decode_hex_color("ab1234").unwrap();
        assert_eq!(color, Color::new(0xab, 0x12, 0x34));
    }

    #[test]
    fn uppercase_digits() {
        assert_eq!(decode_hex_color("F5F5F5").unwrap(), Color::new(245, 245, 245));
    }

    #[test]
    fn short_value_is_zero_padded() {
        assert_eq!(decode_hex_color("1").unwrap(), Color::new(0, 0, 1));
        assert_eq!(
            decode_hex_color("601").unwrap(),
            decode_hex_color("000601").unwrap()
        );
    }

    #[test]
    fn zero_is_black_not_empty() {
        assert_eq!(decode_hex_color("0").unwrap(), Color::new(0, 0, 0));
    }

    #[test]
    fn radix_prefix_is_accepted() {
        assert_eq!(decode_hex_color("0x151515").unwrap(), Color::new(0x15, 0x15, 0x15));
        assert_eq!(decode_hex_color("0X0000ff").unwrap(), Color::new(0, 0, 255));
    }

    #[test]
    fn wide_values_keep_low_24_bits() {
        assert_eq!(
            decode_hex_color("ffabcdef").unwrap(),
            Color::new(0xab, 0xcd, 0xef)
        );
        assert_eq!(
            decode_hex_color("123456789abcdef0123456").unwrap(),
            Color::new(0x12, 0x34, 0x56)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(decode_hex_color(" 202020 ").unwrap(), Color::new(32, 32, 32));
    }

    #[test]
    fn non_hex_is_malformed() {
        let err = decode_hex_color("zz0000").unwrap_err();
        assert_eq!(err.value, "zz0000");
        assert_eq!(err.kind, ValueKind::Text);
    }

    #[test]
    fn boolean_token_is_reported_as_boolean() {
        let err = decode_hex_color("no").unwrap_err();
        assert_eq!(err.kind, ValueKind::Boolean);
        assert!(err.to_string().contains("boolean"), "{err}");
    }

    #[test]
    fn empty_and_bare_prefix_are_malformed() {
        assert_eq!(decode_hex_color("").unwrap_err().kind, ValueKind::Empty);
        assert!(decode_hex_color("0x").is_err());
        assert!(decode_hex_color("#151515").is_err());
        assert!(decode_hex_color("-1").is_err());
    }

    #[test]
    fn sign_and_digit_separators_are_malformed() {
        for value in ["+ff", "ff_ff_ff", "_ff"] {
            let err = decode_hex_color(value).unwrap_err();
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(ValueKind::classify("~"), ValueKind::Null);
        assert_eq!(ValueKind::classify("Yes"), ValueKind::Boolean);
        assert_eq!(ValueKind::classify("1.5"), ValueKind::Float);
        assert_eq!(ValueKind::classify("blue"), ValueKind::Text);
        assert_eq!(ValueKind::classify("   "), ValueKind::Empty);
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
        assert_eq!(color.to_hex(), "#abcdef");
    }
}
