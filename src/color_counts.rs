//! Contains the code for pixel deduplication.

use crate::{Color, InvalidInput, Palette, PixelImage, Swatch};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The unique colors of an image's samples and the number of times each occurred.
///
/// Colors are sorted in ascending order and every count is nonzero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCounts {
    /// The unique colors.
    colors: Vec<Color>,
    /// The number of samples for each color in `colors`.
    counts: Vec<u32>,
    /// The sum of `counts`.
    total_count: u32,
}

impl ColorCounts {
    /// Run-length encodes already sorted packed colors.
    fn from_sorted(packed: &[u32]) -> Self {
        let mut colors = Vec::new();
        let mut counts: Vec<u32> = Vec::new();

        let mut prev = None;
        for &color in packed {
            if prev == Some(color) {
                if let Some(count) = counts.last_mut() {
                    *count += 1;
                }
            } else {
                colors.push(Color::from_u32(color));
                counts.push(1);
                prev = Some(color);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let total_count = packed.len() as u32;

        Self { colors, counts, total_count }
    }

    /// Deduplicates the samples of the given image.
    #[must_use]
    pub fn new(image: &PixelImage) -> Self {
        let mut packed = image.samples().map(Color::to_u32).collect::<Vec<_>>();
        packed.sort_unstable();
        Self::from_sorted(&packed)
    }

    /// Deduplicates the samples of the given image in parallel.
    #[cfg(feature = "threads")]
    #[must_use]
    pub fn new_par(image: &PixelImage) -> Self {
        let mut packed = image.samples().map(Color::to_u32).collect::<Vec<_>>();
        packed.par_sort_unstable();
        Self::from_sorted(&packed)
    }

    /// Creates a [`ColorCounts`] directly from colors and their counts.
    ///
    /// Duplicate colors are merged and zero counts are dropped.
    ///
    /// # Errors
    /// Returns [`InvalidInput::CountOverflow`] if the counts sum to more than `u32::MAX`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Color, u32)>) -> Result<Self, InvalidInput> {
        let mut pairs = pairs
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .collect::<Vec<_>>();
        pairs.sort_unstable_by_key(|&(color, _)| color);

        let mut colors: Vec<Color> = Vec::with_capacity(pairs.len());
        let mut counts: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut total_count = 0u32;
        for (color, n) in pairs {
            total_count = total_count.checked_add(n).ok_or(InvalidInput::CountOverflow)?;
            match (colors.last(), counts.last_mut()) {
                (Some(&last), Some(count)) if last == color => *count += n,
                _ => {
                    colors.push(color);
                    counts.push(n);
                }
            }
        }

        Ok(Self { colors, counts, total_count })
    }

    /// The unique colors in ascending order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The number of samples of each color returned by `colors`.
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The total number of samples before deduplication.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// The number of unique colors as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_colors(&self) -> u32 {
        self.colors.len() as u32
    }

    /// The number of unique colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether or not there are no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates over each unique color and its count.
    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.colors.iter().copied().zip(self.counts.iter().copied())
    }

    /// The palette consisting of every unique color, used when there are no more
    /// unique colors than the requested palette size.
    pub(crate) fn trivial_palette(&self) -> Palette {
        Palette::from_swatches(
            self.iter()
                .map(|(color, population)| Swatch { color, population })
                .collect(),
        )
    }
}
