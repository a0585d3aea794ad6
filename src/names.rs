//! Human readable names for colors.
//!
//! Names are coarse on purpose: an exact name is given only for the primary,
//! secondary, and neutral colors, and every other color is named after its hue family.

use crate::Color;
use palette::{FromColor, Hsl};

/// Colors that have an exact name.
const NAMED: [(Color, &str); 9] = [
    (Color::new(255, 0, 0), "Red"),
    (Color::new(0, 255, 0), "Green"),
    (Color::new(0, 0, 255), "Blue"),
    (Color::new(255, 255, 0), "Yellow"),
    (Color::new(255, 0, 255), "Magenta"),
    (Color::new(0, 255, 255), "Cyan"),
    (Color::BLACK, "Black"),
    (Color::WHITE, "White"),
    (Color::new(128, 128, 128), "Gray"),
];

/// Returns a short name for the given color.
///
/// # Examples
/// ```
/// # use colorbuddy::{names::basic_name, Color};
/// assert_eq!(basic_name(Color::new(0, 0, 255)), "Blue");
/// assert_eq!(basic_name(Color::new(20, 22, 25)), "Dark Gray");
/// assert_eq!(basic_name(Color::new(255, 87, 51)), "Red-Orange");
/// ```
#[must_use]
pub fn basic_name(color: Color) -> &'static str {
    if let Some(&(_, name)) = NAMED.iter().find(|&&(c, _)| c == color) {
        return name;
    }

    let Color { red: r, green: g, blue: b } = color;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max - min < 30 {
        return if max < 85 {
            "Dark Gray"
        } else if max < 170 {
            "Gray"
        } else {
            "Light Gray"
        };
    }

    if r == max {
        if g >= b {
            "Red-Orange"
        } else {
            "Red-Pink"
        }
    } else if g == max {
        if r >= b {
            "Yellow-Green"
        } else {
            "Green"
        }
    } else if r >= g {
        "Purple"
    } else {
        "Blue"
    }
}

/// Returns a descriptive name for the given color,
/// qualifying [`basic_name`] by its lightness and saturation.
///
/// # Examples
/// ```
/// # use colorbuddy::{names::describe, Color};
/// assert_eq!(describe(Color::new(255, 0, 0)), "Vibrant Red");
/// assert_eq!(describe(Color::new(10, 40, 15)), "Deep Green");
/// assert_eq!(describe(Color::WHITE), "Light Muted White");
/// ```
#[must_use]
pub fn describe(color: Color) -> String {
    let hsl = Hsl::from_color(color.into_f32());

    let mut name = String::new();
    if hsl.lightness < 0.3 {
        name.push_str("Deep ");
    } else if hsl.lightness > 0.8 {
        name.push_str("Light ");
    } else if hsl.lightness > 0.6 {
        name.push_str("Pale ");
    }

    if hsl.saturation < 0.3 {
        name.push_str("Muted ");
    } else if hsl.saturation > 0.8 {
        name.push_str("Vibrant ");
    }

    name.push_str(basic_name(color));
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names() {
        for (color, name) in NAMED {
            assert_eq!(basic_name(color), name);
        }
    }

    #[test]
    fn grayscale_buckets() {
        assert_eq!(basic_name(Color::new(40, 50, 60)), "Dark Gray");
        assert_eq!(basic_name(Color::new(100, 110, 120)), "Gray");
        assert_eq!(basic_name(Color::new(200, 210, 220)), "Light Gray");
    }

    #[test]
    fn hue_families() {
        assert_eq!(basic_name(Color::new(200, 50, 120)), "Red-Pink");
        assert_eq!(basic_name(Color::new(120, 200, 50)), "Yellow-Green");
        assert_eq!(basic_name(Color::new(50, 200, 120)), "Green");
        assert_eq!(basic_name(Color::new(120, 50, 200)), "Purple");
        assert_eq!(basic_name(Color::new(50, 120, 200)), "Blue");
    }

    #[test]
    fn descriptors() {
        assert_eq!(describe(Color::BLACK), "Deep Muted Black");
        assert_eq!(describe(Color::new(60, 90, 200)), "Blue");
        assert_eq!(describe(Color::new(200, 220, 255)), "Light Vibrant Blue");
        assert_eq!(describe(Color::new(160, 200, 175)), "Pale Muted Green");
    }
}
