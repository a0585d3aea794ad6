//! Code snippets for using a palette in a stylesheet or a Tailwind CSS config.
//!
//! Each color may carry a name, which is emitted as a trailing comment.
//! Colors are numbered from 1 in the order they are given.

use crate::Color;

/// Returns a `:root` rule declaring a `--brand-color-N` custom property for each color.
///
/// # Examples
/// ```
/// # use colorbuddy::{export::css_variables, Color};
/// let css = css_variables([(Color::new(255, 87, 51), Some("Red-Orange")), (Color::BLACK, None)]);
/// assert_eq!(
///     css,
///     ":root {\n  --brand-color-1: #FF5733; /* Red-Orange */\n  --brand-color-2: #000000;\n}"
/// );
/// ```
#[must_use]
pub fn css_variables<'a>(colors: impl IntoIterator<Item = (Color, Option<&'a str>)>) -> String {
    let variables = lines(colors, |i, color, name| {
        let comment = name.map(|name| format!(" /* {name} */")).unwrap_or_default();
        format!("  --brand-color-{i}: {color};{comment}")
    });

    format!(":root {{\n{variables}\n}}")
}

/// Returns a `tailwind.config.js` that extends the theme with a `brand-N` color for each color.
#[must_use]
pub fn tailwind_config<'a>(colors: impl IntoIterator<Item = (Color, Option<&'a str>)>) -> String {
    let colors = lines(colors, |i, color, name| {
        let comment = name.map(|name| format!(" // {name}")).unwrap_or_default();
        format!("        'brand-{i}': '{color}',{comment}")
    });

    format!(
        "// tailwind.config.js
module.exports = {{
  theme: {{
    extend: {{
      colors: {{
{colors}
      }},
    }},
  }},
}};"
    )
}

/// Formats each color on its own line, numbering from 1.
fn lines<'a>(
    colors: impl IntoIterator<Item = (Color, Option<&'a str>)>,
    mut line: impl FnMut(usize, Color, Option<&'a str>) -> String,
) -> String {
    colors
        .into_iter()
        .enumerate()
        .map(|(i, (color, name))| line(i + 1, color, name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_palette() {
        assert_eq!(css_variables(Vec::<(Color, Option<&str>)>::new()), ":root {\n\n}");
    }

    #[test]
    fn tailwind_entries() {
        let config = tailwind_config([
            (Color::new(0x1A, 0x2B, 0x3C), Some("Deep Blue")),
            (Color::WHITE, None),
        ]);

        assert!(config.starts_with("// tailwind.config.js\nmodule.exports = {\n"));
        assert!(config.contains("\n        'brand-1': '#1A2B3C', // Deep Blue\n"));
        assert!(config.contains("\n        'brand-2': '#FFFFFF',\n"));
        assert!(config.ends_with("  },\n};"));
    }
}
