//! Hex formatting and parsing of colors.

use crate::{Color, InvalidInput};
use std::{fmt::Display, str::FromStr};

impl Color {
    /// Returns this color as a string of the form `#RRGGBB` with uppercase hex digits.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = InvalidInput;

    /// Parses a color of the form `#RRGGBB`. Hex digits may be upper or lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidInput::Hex(s.to_owned());

        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let packed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Self::from_u32(packed))
    }
}

/// Formats each color as a `#RRGGBB` string with uppercase hex digits, preserving order.
///
/// # Examples
/// ```
/// # use colorbuddy::{format, Color};
/// assert_eq!(format([Color::new(255, 87, 51)]), ["#FF5733"]);
/// assert_eq!(format([Color::new(0, 0, 0)]), ["#000000"]);
/// ```
pub fn format(colors: impl IntoIterator<Item = Color>) -> Vec<String> {
    colors.into_iter().map(Color::to_hex).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::test_colors;

    #[test]
    fn known_values() {
        assert_eq!(format([Color::new(255, 87, 51)]), ["#FF5733"]);
        assert_eq!(format([Color::BLACK]), ["#000000"]);
        assert_eq!(format([Color::new(1, 10, 171)]), ["#010AAB"]);
        assert!(format(Vec::new()).is_empty());
    }

    #[test]
    fn reformatting_parsed_output_is_stable() {
        let hex = format(test_colors(512));
        let reparsed = hex
            .iter()
            .map(|s| s.parse::<Color>())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(format(reparsed), hex);
    }

    #[test]
    fn parse_accepts_lowercase() {
        assert_eq!("#ff5733".parse(), Ok(Color::new(255, 87, 51)));
    }

    #[test]
    fn parse_rejects_malformed() {
        for s in ["", "#", "FF5733", "#FF573", "#FF57333", "#GG5733", "#+F5733", "#FF 733"] {
            assert_eq!(s.parse::<Color>(), Err(InvalidInput::Hex(s.to_owned())), "{s}");
        }
    }
}
