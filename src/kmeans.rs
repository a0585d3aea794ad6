//! Color clustering using k-means.
//!
//! This is used to refine the clusters found by Wu's method (see the [`wu`](crate::wu) module).
//! Online (MacQueen's) k-means draws samples from the unique colors with probability
//! proportional to their counts, moving the nearest centroid towards each sample.
//! A final pass then assigns every unique color to its nearest centroid and
//! uses the mean of each cluster as its representative color.
//!
//! The random number generator is seeded explicitly, so the output is deterministic for a given seed.

// The k-means implementation here is based upon the following paper:
//
// Thompson, S., Celebi, M.E. & Buck, K.H. Fast color quantization using MacQueen’s k-means algorithm.
// Journal of Real-Time Image Processing, vol. 17, 1609–1624, 2020.
// https://doi.org/10.1007/s11554-019-00914-6
//
// Accessed from https://faculty.uca.edu/ecelebi/documents/JRTIP_2020a.pdf

use crate::{wu::Stats, Color, ColorCounts, InvalidInput, Palette, MAX_COLORS};
use rand::{prelude::Distribution, SeedableRng};
use rand_distr::weighted_alias::WeightedAliasIndex;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// The initial centroids for k-means, holding at most [`MAX_COLORS`] colors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Centroids(Vec<Color>);

impl Centroids {
    /// Consumes the [`Centroids`], returning the inner colors.
    #[must_use]
    pub fn into_inner(self) -> Vec<Color> {
        self.0
    }

    /// Creates a new [`Centroids`] by truncating the given colors to [`MAX_COLORS`].
    #[must_use]
    pub fn from_truncated(mut centroids: Vec<Color>) -> Self {
        centroids.truncate(MAX_COLORS.into());
        Self(centroids)
    }

    /// The number of centroids.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_colors(&self) -> u8 {
        self.0.len() as u8
    }
}

impl From<Centroids> for Vec<Color> {
    fn from(value: Centroids) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<Color>> for Centroids {
    type Error = InvalidInput;

    #[allow(clippy::cast_possible_truncation)]
    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        if colors.len() <= usize::from(MAX_COLORS) {
            Ok(Self(colors))
        } else {
            Err(InvalidInput::PaletteSize(colors.len().min(u32::MAX as usize) as u32))
        }
    }
}

/// Converts a color to `f32` components.
#[inline]
fn to_f32(color: Color) -> [f32; 3] {
    color.into_components().map(f32::from)
}

/// Returns the index of the centroid nearest to `query`, preferring the lower index on ties.
#[inline]
fn nearest(centroids: &[[f32; 3]], query: [f32; 3]) -> usize {
    let mut min_index = 0;
    let mut min_distance = f32::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = (0..3)
            .map(|c| {
                let diff = query[c] - centroid[c];
                diff * diff
            })
            .sum::<f32>();

        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    min_index
}

/// The state of the k-means algorithm.
struct State<'a> {
    /// The unique colors and their counts.
    color_counts: &'a ColorCounts,
    /// The current centroids.
    centroids: Vec<[f32; 3]>,
    /// The number of samples assigned to each centroid so far.
    counts: Vec<u32>,
}

impl<'a> State<'a> {
    /// Creates a new [`State`] with the given initial centroids.
    fn new(color_counts: &'a ColorCounts, centroids: Centroids) -> Self {
        let centroids = centroids
            .into_inner()
            .into_iter()
            .map(to_f32)
            .collect::<Vec<_>>();

        Self {
            color_counts,
            counts: vec![0; centroids.len()],
            centroids,
        }
    }

    /// Moves the nearest centroid towards the given sample.
    #[inline]
    fn add_sample(&mut self, color: [f32; 3]) {
        let Self { centroids, counts, .. } = self;

        let i = nearest(centroids, color);

        let count = counts[i] + 1;
        #[allow(clippy::cast_possible_truncation)]
        let rate = (1.0 / f64::from(count).sqrt()) as f32; // learning rate of 0.5 => count^(-0.5)

        let center = &mut centroids[i];
        for c in 0..3 {
            center[c] += rate * (color[c] - center[c]);
        }

        counts[i] = count;
    }

    /// Runs online k-means over `samples` colors drawn from the given distribution.
    fn online_kmeans_inner(
        &mut self,
        samples: u32,
        seed: u64,
        distribution: &impl Distribution<usize>,
    ) {
        /// The number of samples drawn at a time.
        const BATCH: u32 = 256;

        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
        let colors = self.color_counts.colors();

        let mut batch = Vec::with_capacity(BATCH as usize);

        for _ in 0..(samples / BATCH) {
            batch.extend((0..BATCH).map(|_| to_f32(colors[distribution.sample(rng)])));

            for &color in &batch {
                self.add_sample(color);
            }

            batch.clear();
        }

        batch.extend((0..(samples % BATCH)).map(|_| to_f32(colors[distribution.sample(rng)])));

        for color in batch {
            self.add_sample(color);
        }
    }

    /// Runs online k-means, sampling colors with probability proportional to their counts.
    fn online_kmeans(&mut self, samples: u32, seed: u64) {
        // construction fails only for empty or all-zero weights, which ColorCounts rules out
        let weights = self.color_counts.counts().iter().copied().map(u64::from).collect();
        if let Ok(distribution) = WeightedAliasIndex::new(weights) {
            self.online_kmeans_inner(samples, seed, &distribution);
        }
    }

    /// Assigns each unique color to its nearest centroid and returns the mean of each cluster.
    ///
    /// Empty clusters are dropped, and clusters whose means coincide are merged.
    fn into_palette(self) -> Palette {
        let Self { color_counts, centroids, .. } = self;

        let mut stats = vec![Stats::default(); centroids.len()];
        for (color, n) in color_counts.iter() {
            stats[nearest(&centroids, to_f32(color))] += Stats::of(color, n);
        }

        let clusters = stats
            .into_iter()
            .filter(|s| s.count > 0)
            .map(|s| (s.mean(), s.population()));

        // the populations sum to `color_counts.total_count()`, so this never overflows
        ColorCounts::from_pairs(clusters)
            .map(|counts| counts.trivial_palette())
            .unwrap_or_default()
    }
}

/// Computes a color palette from the given `color_counts` using online k-means.
///
/// `num_samples` colors are drawn and the palette has at most as many colors as `initial_centroids`.
/// If there are no more unique colors than centroids,
/// then the palette will contain every unique color with its exact count.
#[must_use]
pub fn palette(
    color_counts: &ColorCounts,
    num_samples: u32,
    initial_centroids: Centroids,
    seed: u64,
) -> Palette {
    if color_counts.is_empty() || initial_centroids.num_colors() == 0 {
        Palette::default()
    } else if color_counts.num_colors() <= u32::from(initial_centroids.num_colors()) {
        color_counts.trivial_palette()
    } else {
        let mut state = State::new(color_counts, initial_centroids);
        state.online_kmeans(num_samples, seed);
        state.into_palette()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, wu, PaletteSize};

    fn test_counts() -> ColorCounts {
        let colors = test_colors(2048);
        ColorCounts::from_pairs(colors.iter().zip(0..).map(|(&c, i)| (c, i % 5 + 1))).unwrap()
    }

    #[test]
    fn same_seed_same_palette() {
        let counts = test_counts();
        let initial = Centroids::from_truncated(wu::palette(&counts, PaletteSize::MAX).into_colors());

        let a = palette(&counts, 4096, initial.clone(), 7);
        let b = palette(&counts, 4096, initial, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn populations_cover_every_sample() {
        let counts = test_counts();
        let initial = Centroids::from_truncated(wu::palette(&counts, 8u8.try_into().unwrap()).into_colors());

        let result = palette(&counts, 1000, initial, 0);
        assert!(result.len() <= 8);
        assert_eq!(result.total_population(), u64::from(counts.total_count()));
    }

    #[test]
    fn not_enough_colors() {
        let counts = ColorCounts::from_pairs([(Color::BLACK, 2), (Color::WHITE, 1)]).unwrap();
        let initial = Centroids::from_truncated(vec![Color::BLACK, Color::WHITE, Color::new(9, 9, 9)]);

        let result = palette(&counts, 100, initial, 0);
        assert_eq!(result.colors().collect::<Vec<_>>(), [Color::BLACK, Color::WHITE]);
    }

    #[test]
    fn empty_clusters_are_dropped() {
        let pairs = (0..10u8).flat_map(|d| [(Color::new(d, d, d), 4), (Color::new(255 - d, 255 - d, 255 - d), 3)]);
        let counts = ColorCounts::from_pairs(pairs).unwrap();
        let initial = Centroids::from_truncated(vec![Color::BLACK, Color::WHITE, Color::new(255, 0, 255)]);

        let result = palette(&counts, 2000, initial, 3);
        assert_eq!(result.len(), 2);
        assert!(result.colors().all(|c| c != Color::new(255, 0, 255)));
        assert_eq!(result.total_population(), u64::from(counts.total_count()));
    }

    #[test]
    fn nearest_prefers_lower_index() {
        let centroids = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert_eq!(nearest(&centroids, [1.0, 0.0, 0.0]), 0);
        assert_eq!(nearest(&centroids, [1.5, 0.0, 0.0]), 1);
    }

    #[test]
    fn too_many_centroids() {
        assert!(Centroids::try_from(vec![Color::BLACK; 21]).is_err());
        assert_eq!(Centroids::from_truncated(vec![Color::BLACK; 30]).num_colors(), 20);
    }
}
