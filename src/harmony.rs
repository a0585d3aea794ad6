//! Heuristic analysis of how the colors in a palette relate to each other.
//!
//! Colors are converted to HSL with the hue in whole degrees and the saturation and lightness
//! in whole percentages. The harmony is then classified from the spread of the hues,
//! and the temperature from how many hues fall on the warm side of the color wheel.

use crate::Color;
use palette::{FromColor, Hsl};
use std::fmt::Display;

/// The relationship between the hues of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "service", derive(serde::Serialize))]
pub enum Harmony {
    /// Fewer than two colors.
    SingleColor,
    /// The hues span less than 30 degrees.
    Monochromatic,
    /// The hues span less than 60 degrees.
    Analogous,
    /// The hues span between 150 and 210 degrees (exclusive).
    Complementary,
    /// Any other spread of hues.
    Complex,
}

impl Harmony {
    /// Classifies a spread of hues given in degrees.
    fn from_hue_range(range: i32) -> Self {
        if range < 30 {
            Self::Monochromatic
        } else if range < 60 {
            Self::Analogous
        } else if range > 150 && range < 210 {
            Self::Complementary
        } else {
            Self::Complex
        }
    }

    /// The base sentence of a [`HarmonyReport::description`].
    fn summary(self) -> &'static str {
        match self {
            Self::SingleColor => "Only one color present",
            Self::Monochromatic => "Colors share the same hue with variations in lightness and saturation",
            Self::Analogous => "Colors are adjacent on the color wheel, creating harmony",
            Self::Complementary => "Colors are opposite on the color wheel, creating contrast",
            Self::Complex => "A diverse mix of colors creating visual interest",
        }
    }
}

impl Display for Harmony {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SingleColor => "Single Color",
            Self::Monochromatic => "Monochromatic",
            Self::Analogous => "Analogous",
            Self::Complementary => "Complementary",
            Self::Complex => "Complex",
        })
    }
}

/// The overall color temperature of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "service", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Temperature {
    /// Mostly reds, oranges, yellows, and magentas.
    Warm,
    /// Mostly greens, cyans, blues, and purples.
    Cool,
    /// About as many warm colors as cool colors.
    Neutral,
    /// Leaning to one side, but not clearly.
    Mixed,
}

impl Temperature {
    /// Classifies a palette by how many of its colors have warm or cool hues.
    ///
    /// One side must outnumber the other by half again to decide the temperature.
    fn from_counts(warm: usize, cool: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (w, c) = (warm as f64, cool as f64);
        if w > c * 1.5 {
            Self::Warm
        } else if c > w * 1.5 {
            Self::Cool
        } else if warm.abs_diff(cool) <= 1 {
            Self::Neutral
        } else {
            Self::Mixed
        }
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        })
    }
}

/// The result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "service", derive(serde::Serialize))]
pub struct HarmonyReport {
    /// The harmony type.
    pub harmony: Harmony,
    /// The color temperature.
    pub temperature: Temperature,
    /// A sentence describing the palette.
    pub description: String,
}

/// Hue in degrees, saturation and lightness in percent, all rounded.
#[allow(clippy::cast_possible_truncation)]
fn rounded_hsl(color: Color) -> (i32, i32, i32) {
    let hsl = Hsl::from_color(color.into_f32());
    (
        hsl.hue.into_positive_degrees().round() as i32,
        (hsl.saturation * 100.0).round() as i32,
        (hsl.lightness * 100.0).round() as i32,
    )
}

/// The difference between the largest and smallest value.
fn spread(values: impl Iterator<Item = i32>) -> i32 {
    let (min, max) = values.fold((i32::MAX, i32::MIN), |(min, max), v| (min.min(v), max.max(v)));
    max - min
}

/// Reds, oranges, yellows, and magentas (hue in degrees).
fn is_warm(hue: i32) -> bool {
    hue <= 60 || hue >= 300
}

/// Describes the harmony and temperature of the given colors.
///
/// # Examples
/// ```
/// # use colorbuddy::{harmony::{analyze, Harmony, Temperature}, Color};
/// let report = analyze(&[Color::new(255, 0, 0), Color::new(0, 255, 255)]);
/// assert_eq!(report.harmony, Harmony::Complementary);
/// assert_eq!(report.temperature, Temperature::Neutral);
/// ```
#[must_use]
pub fn analyze(colors: &[Color]) -> HarmonyReport {
    if colors.len() < 2 {
        return HarmonyReport {
            harmony: Harmony::SingleColor,
            temperature: Temperature::Neutral,
            description: Harmony::SingleColor.summary().to_owned(),
        };
    }

    let hsl = colors.iter().copied().map(rounded_hsl).collect::<Vec<_>>();

    let warm = hsl.iter().filter(|&&(h, _, _)| is_warm(h)).count();
    let temperature = Temperature::from_counts(warm, hsl.len() - warm);

    let hue_range = spread(hsl.iter().map(|&(h, _, _)| h));
    let lightness_range = spread(hsl.iter().map(|&(_, _, l)| l));
    #[allow(clippy::cast_precision_loss)]
    let avg_saturation = f64::from(hsl.iter().map(|&(_, s, _)| s).sum::<i32>()) / hsl.len() as f64;

    let harmony = Harmony::from_hue_range(hue_range);
    let mut description = harmony.summary().to_owned();

    if avg_saturation > 70.0 {
        description.push_str(" with vibrant saturation");
    } else if avg_saturation < 30.0 {
        description.push_str(" with muted tones");
    }

    if lightness_range > 60 {
        description.push_str(" and high contrast");
    } else if lightness_range < 20 {
        description.push_str(" with similar brightness");
    }

    HarmonyReport { harmony, temperature, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_color() {
        let report = analyze(&[Color::new(10, 200, 30)]);
        assert_eq!(report.harmony, Harmony::SingleColor);
        assert_eq!(report.temperature, Temperature::Neutral);
        assert_eq!(report.description, "Only one color present");
        assert_eq!(analyze(&[]).harmony, Harmony::SingleColor);
    }

    #[test]
    fn monochromatic_blues() {
        let report = analyze(&[
            Color::new(0, 0, 255),
            Color::new(0, 0, 128),
            Color::new(100, 100, 255),
        ]);
        assert_eq!(report.harmony, Harmony::Monochromatic);
        assert_eq!(report.temperature, Temperature::Cool);
        assert_eq!(
            report.description,
            "Colors share the same hue with variations in lightness and saturation with vibrant saturation"
        );
    }

    #[test]
    fn analogous_warm() {
        // hues 0, 30, and 45
        let report = analyze(&[
            Color::new(255, 0, 0),
            Color::new(255, 128, 0),
            Color::new(255, 191, 0),
        ]);
        assert_eq!(report.harmony, Harmony::Analogous);
        assert_eq!(report.temperature, Temperature::Warm);
        assert!(report.description.ends_with("with vibrant saturation with similar brightness"));
    }

    #[test]
    fn high_contrast_muted() {
        let report = analyze(&[Color::new(20, 20, 25), Color::new(240, 240, 230)]);
        assert!(report.description.ends_with("with muted tones and high contrast"));
    }

    #[test]
    fn temperature_counts() {
        assert_eq!(Temperature::from_counts(4, 1), Temperature::Warm);
        assert_eq!(Temperature::from_counts(1, 4), Temperature::Cool);
        assert_eq!(Temperature::from_counts(2, 2), Temperature::Neutral);
        assert_eq!(Temperature::from_counts(3, 2), Temperature::Neutral);
        assert_eq!(Temperature::from_counts(5, 4), Temperature::Neutral);
        assert_eq!(Temperature::from_counts(6, 4), Temperature::Mixed);
    }
}
