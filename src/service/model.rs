//! The JSON bodies of service responses.

use crate::{names, Color};
use serde::{Deserialize, Serialize};

/// A color of a [`PaletteResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    /// The color as `#RRGGBB`.
    pub hex: String,
    /// A descriptive name for the color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ColorEntry {
    /// Creates an entry for the given color, optionally with its descriptive name.
    #[must_use]
    pub fn new(color: Color, named: bool) -> Self {
        Self {
            hex: color.to_hex(),
            name: named.then(|| names::describe(color)),
        }
    }
}

/// The body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteResponse {
    /// The palette colors, in order.
    pub palette: Vec<ColorEntry>,
    /// A human readable status message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaletteResponse {
    /// Creates a response from the given colors.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = Color>, named: bool, message: &str) -> Self {
        Self {
            palette: colors.into_iter().map(|c| ColorEntry::new(c, named)).collect(),
            message: Some(message.to_owned()),
        }
    }

    /// The colors of the palette paired with their names, skipping any entry with a malformed hex code.
    pub fn named_colors(&self) -> impl Iterator<Item = (Color, Option<&str>)> + '_ {
        self.palette
            .iter()
            .filter_map(|entry| Some((entry.hex.parse::<Color>().ok()?, entry.name.as_deref())))
    }
}

/// The body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human readable description of the error.
    pub detail: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn name_is_omitted_when_absent() {
        let response = PaletteResponse::new([Color::new(255, 87, 51)], false, "Palette generated.");
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r##"{"palette":[{"hex":"#FF5733"}],"message":"Palette generated."}"##
        );
    }

    #[test]
    fn named_entries() {
        let response = PaletteResponse::new([Color::new(255, 0, 0), Color::BLACK], true, "ok");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["palette"][0]["name"], "Vibrant Red");
        assert_eq!(json["palette"][1]["hex"], "#000000");

        let colors = response.named_colors().collect::<Vec<_>>();
        assert_eq!(colors, [(Color::new(255, 0, 0), Some("Vibrant Red")), (Color::BLACK, Some("Deep Muted Black"))]);
    }
}
