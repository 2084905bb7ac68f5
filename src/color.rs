//! Hex colors for the version banner.
//!
//! Colors are written as `RRGGBB` or `AARRGGBB`. The leading byte of the
//! eight digit form is a *transparency*: `ff` is fully transparent and `00`
//! fully opaque, the opposite of the usual alpha convention. Existing build
//! scripts depend on this, so it is kept as is even though it most likely
//! started as a quirk of the platform color API it was first written for.

use std::fmt;
use std::str::FromStr;

use palette::Srgba;
use serde::{Deserialize, Serialize};

/// A banner color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BannerColor(Srgba<u8>);

/// Error returned for malformed color strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}' is not a 6 or 8 digit hex color")]
pub struct ParseColorError(pub String);

impl BannerColor {
    /// 50% gray at 50% opacity.
    pub const DEFAULT_BACKGROUND: Self = Self(Srgba::new(0x7f, 0x7f, 0x7f, 0x80));

    /// Opaque white.
    pub const DEFAULT_FOREGROUND: Self = Self(Srgba::new(0xff, 0xff, 0xff, 0xff));

    /// Creates a color from components with a conventional alpha (`255` opaque).
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    /// Parses `RRGGBB` or `AARRGGBB` where `AA` is the transparency.
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let valid = matches!(input.len(), 6 | 8) && input.bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            return Err(ParseColorError(input.to_string()));
        }
        let value =
            u32::from_str_radix(input, 16).map_err(|_| ParseColorError(input.to_string()))?;

        let transparency = ((value >> 24) & 0xff) as u8;
        Ok(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
            0xff - transparency,
        ))
    }

    /// Returns `[r, g, b, a]` with conventional alpha.
    pub fn rgba(&self) -> [u8; 4] {
        [self.0.red, self.0.green, self.0.blue, self.0.alpha]
    }

    /// Opacity in the 0.0-1.0 range.
    pub fn opacity(&self) -> f32 {
        f32::from(self.0.alpha) / 255.0
    }

    /// `#rrggbb` for use in SVG paint attributes.
    pub fn svg_paint(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

impl FromStr for BannerColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BannerColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BannerColor> for String {
    fn from(color: BannerColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BannerColor {
    /// Writes the color back in the transparency-first notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.rgba();
        if a == 0xff {
            write!(f, "{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "{:02x}{r:02x}{g:02x}{b:02x}", 0xff - a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digits_are_opaque() {
        let color = BannerColor::parse("ff8000").unwrap();
        assert_eq!(color.rgba(), [0xff, 0x80, 0x00, 0xff]);
    }

    #[test]
    fn leading_byte_is_transparency() {
        assert_eq!(BannerColor::parse("ff000000").unwrap().rgba()[3], 0x00);
        assert_eq!(BannerColor::parse("00000000").unwrap().rgba()[3], 0xff);
        assert_eq!(
            BannerColor::parse("7f7f7f7f").unwrap(),
            BannerColor::DEFAULT_BACKGROUND
        );
    }

    #[test]
    fn rejects_bad_input() {
        for input in ["", "fff", "12345", "1234567", "gggggg", "+12345", "123456789"] {
            assert!(BannerColor::parse(input).is_err(), "{input} should fail");
        }
    }

    #[test]
    fn display_uses_transparency_notation() {
        assert_eq!(BannerColor::DEFAULT_BACKGROUND.to_string(), "7f7f7f7f");
        assert_eq!(BannerColor::DEFAULT_FOREGROUND.to_string(), "ffffff");
    }

    #[test]
    fn deserializes_from_json_string() {
        let color: BannerColor = serde_json::from_str("\"80ff0000\"").unwrap();
        assert_eq!(color.rgba(), [0xff, 0x00, 0x00, 0x7f]);
        assert!(serde_json::from_str::<BannerColor>("\"red\"").is_err());
    }

    #[test]
    fn svg_paint_drops_alpha() {
        assert_eq!(BannerColor::parse("40102030").unwrap().svg_paint(), "#102030");
    }
}
