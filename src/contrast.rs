//! WCAG 2.1 contrast between colors.

use crate::Color;
use std::fmt::Display;

/// The WCAG 2.1 conformance level reached by a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "service", derive(serde::Serialize))]
pub enum ContrastLevel {
    /// Below 3:1.
    Fail,
    /// At least 3:1, enough for large text only.
    AaLarge,
    /// At least 4.5:1.
    Aa,
    /// At least 7:1.
    Aaa,
}

impl ContrastLevel {
    /// Returns the level reached by the given contrast ratio.
    #[must_use]
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio >= 7.0 {
            Self::Aaa
        } else if ratio >= 4.5 {
            Self::Aa
        } else if ratio >= 3.0 {
            Self::AaLarge
        } else {
            Self::Fail
        }
    }
}

impl Display for ContrastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fail => "Fail",
            Self::AaLarge => "AA (Large Text)",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        })
    }
}

/// The contrast between two colors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "service", derive(serde::Serialize))]
pub struct ContrastInfo {
    /// The contrast ratio, in `[1, 21]`.
    pub ratio: f32,
    /// The highest level reached.
    pub level: ContrastLevel,
    /// Whether the ratio is enough for normal text at level AA.
    pub accessible_small: bool,
    /// Whether the ratio is enough for large text at level AA.
    pub accessible_large: bool,
}

impl ContrastInfo {
    /// Computes the contrast between the two colors.
    #[must_use]
    pub fn new(a: Color, b: Color) -> Self {
        let ratio = contrast_ratio(a, b);
        Self {
            ratio,
            level: ContrastLevel::from_ratio(ratio),
            accessible_small: ratio >= 4.5,
            accessible_large: ratio >= 3.0,
        }
    }
}

/// Returns the WCAG relative luminance of the given color, in `[0, 1]`.
#[must_use]
pub fn relative_luminance(color: Color) -> f32 {
    let linear = color.into_f32().into_linear();
    0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
}

/// Returns the WCAG contrast ratio between the two colors, in `[1, 21]`.
///
/// The ratio is symmetric in its arguments.
///
/// # Examples
/// ```
/// # use colorbuddy::{contrast::contrast_ratio, Color};
/// assert!((contrast_ratio(Color::BLACK, Color::WHITE) - 21.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f32 {
    let (a, b) = (relative_luminance(a), relative_luminance(b));
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Returns black or white, whichever is readable as text on the given background.
///
/// White is preferred whenever it reaches a contrast of at least 3:1.
#[must_use]
pub fn readable_text_color(background: Color) -> Color {
    if contrast_ratio(background, Color::WHITE) >= 3.0 {
        Color::WHITE
    } else {
        Color::BLACK
    }
}
