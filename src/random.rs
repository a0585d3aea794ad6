//! Random palette generation.
//!
//! Every channel of every color is drawn independently and uniformly from `[0, 255]`,
//! so generated palettes may contain duplicate colors.
//! Generation is reproducible when a seed is given.

use crate::{Color, PaletteSize};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// A builder struct to generate a random palette.
///
/// A prompt describing a theme may be attached, but it does not currently
/// change the generated colors in any way.
///
/// # Examples
/// ```
/// # use colorbuddy::{PaletteSize, RandomPalette};
/// let size = PaletteSize::try_from(5u8).unwrap();
/// let a = RandomPalette::new(size).seed(42).generate();
/// let b = RandomPalette::new(size).seed(42).prompt("serene beach sunset").generate();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomPalette<'a> {
    /// The number of colors to generate.
    k: PaletteSize,
    /// The seed value for the random number generator.
    seed: Option<u64>,
    /// A theme hint reserved for themed generation.
    prompt: Option<&'a str>,
}

impl<'a> RandomPalette<'a> {
    /// Creates a new [`RandomPalette`] that generates `k` colors without a seed.
    #[must_use]
    pub const fn new(k: PaletteSize) -> Self {
        Self { k, seed: None, prompt: None }
    }

    /// Sets the seed value for the random number generator.
    ///
    /// Without a seed, the generator is seeded from the operating system.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the theme prompt.
    ///
    /// The prompt is accepted for future themed generation, but is currently ignored.
    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// The prompt that was given, if any.
    #[must_use]
    pub fn theme(&self) -> Option<&'a str> {
        self.prompt
    }

    /// Generates the colors.
    #[must_use]
    pub fn generate(&self) -> Vec<Color> {
        let mut rng = match self.seed {
            Some(seed) => Xoroshiro128PlusPlus::seed_from_u64(seed),
            None => Xoroshiro128PlusPlus::from_entropy(),
        };

        (0..self.k.into_inner())
            .map(|_| Color::from_components(rng.gen()))
            .collect()
    }
}

/// Generates `k` uniformly random colors, reproducibly if `seed` is given.
///
/// # Examples
/// ```
/// # use colorbuddy::{generate, PaletteSize};
/// let k = PaletteSize::try_from(5u8).unwrap();
/// assert_eq!(generate(k, Some(42)), generate(k, Some(42)));
/// ```
#[must_use]
pub fn generate(k: PaletteSize, seed: Option<u64>) -> Vec<Color> {
    let palette = RandomPalette::new(k);
    match seed {
        Some(seed) => palette.seed(seed).generate(),
        None => palette.generate(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_reproducible() {
        let k = PaletteSize::try_from(5u8).unwrap();
        let a = generate(k, Some(42));
        assert_eq!(a.len(), 5);
        assert_eq!(a, generate(k, Some(42)));
        assert_ne!(a, generate(k, Some(43)));
    }

    #[test]
    fn length_matches_size() {
        for k in 1..=20u8 {
            let k = PaletteSize::try_from(k).unwrap();
            assert_eq!(generate(k, None).len(), usize::from(k));
        }
    }

    #[test]
    fn prompt_does_not_change_output() {
        let k = PaletteSize::MAX;
        let plain = RandomPalette::new(k).seed(7);
        let themed = plain.clone().prompt("autumn forest");

        assert_eq!(themed.theme(), Some("autumn forest"));
        assert_eq!(plain.generate(), themed.generate());
    }

    #[test]
    fn channels_cover_full_range() {
        let colors = (0..64)
            .flat_map(|seed| generate(PaletteSize::MAX, Some(seed)))
            .collect::<Vec<_>>();

        let reds = colors.iter().map(|c| c.red);
        assert!(reds.clone().min().unwrap() < 16);
        assert!(reds.max().unwrap() > 239);
    }
}
