//! Wu's color quantizer (Greedy Orthogonal Bipartitioning).
//!
//! This clustering method recursively splits the box of colors with the greatest variance
//! along the channel and position that results in the greatest decrease in variance.
//! It should give much better results than median cut
//! while having nearly the same computational cost.
//!
//! Unlike the classic formulation, which works over a coarse histogram of the RGB cube,
//! the boxes here are cut directly over the unique colors of the image.
//! This means that any box containing at least two unique colors can always be cut,
//! so an image with at least `k` unique colors always yields exactly `k` clusters.
//! All error terms are computed with exact integer arithmetic,
//! so the output depends only on the input.

// Referenced code: https://www.ece.mcmaster.ca/~xwu/cq.c
// and relevant paper (free access):
// Xiaolin Wu, Color quantization by dynamic programming and principal analysis,
// ACM Transactions on Graphics, vol. 11, no. 4, 348–372, 1992.
// https://doi.org/10.1145/146443.146475

use crate::{Color, ColorCounts, Palette, PaletteSize, Swatch};
use ordered_float::OrderedFloat;
use std::{
    array,
    collections::BinaryHeap,
    ops::{Add, AddAssign, Range, Sub},
};

/// The number of color channels.
const N: usize = 3;

/// Statistics for a set of colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Stats {
    /// The number of pixels assigned to the set.
    pub(crate) count: u64,
    /// The channel-wise sum of the colors.
    pub(crate) components: [u64; N],
    /// The sum of the squared channels of the colors.
    pub(crate) sum_squared: u64,
}

impl Add for Stats {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            count: self.count + rhs.count,
            components: array::from_fn(|i| self.components[i] + rhs.components[i]),
            sum_squared: self.sum_squared + rhs.sum_squared,
        }
    }
}

impl Sub for Stats {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            count: self.count - rhs.count,
            components: array::from_fn(|i| self.components[i] - rhs.components[i]),
            sum_squared: self.sum_squared - rhs.sum_squared,
        }
    }
}

impl AddAssign for Stats {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.count += rhs.count;
        for i in 0..N {
            self.components[i] += rhs.components[i];
        }
        self.sum_squared += rhs.sum_squared;
    }
}

impl Stats {
    /// The statistics for `n` pixels of the given color.
    #[inline]
    pub(crate) fn of(color: Color, n: u32) -> Self {
        let n = u64::from(n);
        let components = color.into_components().map(u64::from);
        let square = components.iter().map(|c| c * c).sum::<u64>();
        Self {
            count: n,
            components: components.map(|c| c * n),
            sum_squared: square * n,
        }
    }

    /// The sum of the squares of the channel sums.
    #[inline]
    fn components_squared(&self) -> u128 {
        self.components
            .iter()
            .map(|&c| u128::from(c) * u128::from(c))
            .sum()
    }

    /// The sum of squared distances from the mean, multiplied by `count`.
    ///
    /// This is exact, so it is zero if and only if every color in the set is the same.
    fn scaled_error(&self) -> u128 {
        u128::from(self.count) * u128::from(self.sum_squared) - self.components_squared()
    }

    /// The sum of squared distances from the mean.
    #[allow(clippy::cast_precision_loss)]
    fn variance(&self) -> f64 {
        let error = self.scaled_error();
        if error == 0 {
            0.0
        } else {
            error as f64 / self.count as f64
        }
    }

    /// The squared length of the channel sums divided by `count`.
    ///
    /// Maximizing this over the two halves of a cut minimizes the total variance.
    #[allow(clippy::cast_precision_loss)]
    fn mean_squared(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.components_squared() as f64 / self.count as f64
        }
    }

    /// The average color, rounded to the nearest integer per channel.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn mean(&self) -> Color {
        debug_assert!(self.count > 0);
        let n = self.count;
        Color::from_components(self.components.map(|c| ((c + n / 2) / n) as u8))
    }

    /// The number of pixels as a `u32`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn population(&self) -> u32 {
        self.count as u32
    }
}

/// The struct holding the data for Wu's color quantization method.
struct Wu {
    /// The unique colors and their counts.
    ///
    /// Each box is a contiguous range of this buffer,
    /// and cutting a box reorders the entries within its range.
    entries: Vec<(Color, u32)>,
}

/// A box of colors and its variance.
struct CubeVar(Range<usize>, f64);

impl PartialOrd for CubeVar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CubeVar {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        OrderedFloat(self.1).cmp(&OrderedFloat(other.1))
    }
}

impl Eq for CubeVar {}

impl PartialEq for CubeVar {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl Wu {
    /// Creates a new [`Wu`] over the given unique colors.
    fn new(color_counts: &ColorCounts) -> Self {
        Self { entries: color_counts.iter().collect() }
    }

    /// Returns the summed statistics of the given box.
    fn stats(&self, cube: Range<usize>) -> Stats {
        let mut stats = Stats::default();
        for &(color, n) in &self.entries[cube] {
            stats += Stats::of(color, n);
        }
        stats
    }

    /// Sorts the colors of the given box along the given channel.
    fn sort_along(&mut self, cube: Range<usize>, dim: usize) {
        self.entries[cube].sort_unstable_by_key(|&(color, _)| (color.into_components()[dim], color));
    }

    /// Finds the position to cut the given box along the given channel in order to minimize variance.
    ///
    /// Returns the index of the first color in the upper half and the score of the cut,
    /// where a higher score is a lower total variance.
    fn maximize(&mut self, cube: Range<usize>, dim: usize, sum: Stats) -> Option<(usize, f64)> {
        self.sort_along(cube.clone(), dim);
        let entries = &self.entries[cube.clone()];

        let mut best: Option<(usize, f64)> = None;
        let mut lower = Stats::default();
        for (i, pair) in entries.windows(2).enumerate() {
            let (color, n) = pair[0];
            lower += Stats::of(color, n);

            // only cut between distinct channel values, so the halves are separated by a plane
            if color.into_components()[dim] == pair[1].0.into_components()[dim] {
                continue;
            }

            let upper = sum - lower;
            let score = lower.mean_squared() + upper.mean_squared();
            if best.map_or(true, |(_, v)| score > v) {
                best = Some((cube.start + i + 1, score));
            }
        }

        best
    }

    /// Attempts to cut the given box, returning the two halves.
    fn cut(&mut self, cube: Range<usize>) -> Option<(Range<usize>, Range<usize>)> {
        let sum = self.stats(cube.clone());

        let mut best: Option<(usize, usize, f64)> = None;
        for dim in 0..N {
            if let Some((mid, score)) = self.maximize(cube.clone(), dim, sum) {
                if best.map_or(true, |(_, _, v)| score > v) {
                    best = Some((dim, mid, score));
                }
            }
        }

        let (dim, mid, _) = best?;
        self.sort_along(cube.clone(), dim);
        Some((cube.start..mid, mid..cube.end))
    }

    /// Returns the disjoint boxes resulting from Wu's color quantization method.
    fn cubes(&mut self, k: PaletteSize) -> Vec<Range<usize>> {
        let k = usize::from(k);

        let mut queue = BinaryHeap::with_capacity(k);
        let all = 0..self.entries.len();
        queue.push(CubeVar(all.clone(), self.stats(all).variance()));

        while queue.len() < k {
            let Some(CubeVar(cube, variance)) = queue.pop() else {
                break;
            };

            if variance <= 0.0 {
                // all boxes hold a single color and cannot be cut further
                queue.push(CubeVar(cube, 0.0));
                break;
            }

            if let Some((lower, upper)) = self.cut(cube.clone()) {
                let lower_var = self.stats(lower.clone()).variance();
                let upper_var = self.stats(upper.clone()).variance();
                queue.push(CubeVar(lower, lower_var));
                queue.push(CubeVar(upper, upper_var));
            } else {
                queue.push(CubeVar(cube, 0.0));
            }
        }

        queue.into_iter().map(|x| x.0).collect()
    }

    /// Computes the color palette.
    fn palette(mut self, k: PaletteSize) -> Palette {
        let swatches = self
            .cubes(k)
            .into_iter()
            .map(|cube| {
                let stats = self.stats(cube);
                Swatch { color: stats.mean(), population: stats.population() }
            })
            .collect();

        Palette::from_swatches(swatches)
    }
}

/// Computes a color palette from the given `color_counts` with at most `palette_size` entries.
///
/// If there are no more unique colors than `palette_size`,
/// then the palette will contain every unique color with its exact count.
/// Otherwise, the palette will contain exactly `palette_size` unique colors.
/// The returned palette is empty only if `color_counts` is empty.
#[must_use]
pub fn palette(color_counts: &ColorCounts, palette_size: PaletteSize) -> Palette {
    if color_counts.is_empty() {
        Palette::default()
    } else if color_counts.len() <= usize::from(palette_size) {
        color_counts.trivial_palette()
    } else {
        Wu::new(color_counts).palette(palette_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use std::collections::HashSet;

    fn size(k: u8) -> PaletteSize {
        PaletteSize::try_from(k).unwrap()
    }

    fn assert_unique(palette: &Palette) {
        let unique = palette.colors().collect::<HashSet<_>>();
        assert_eq!(unique.len(), palette.len());
    }

    #[test]
    fn empty_input() {
        let counts = ColorCounts::default();
        assert_eq!(palette(&counts, PaletteSize::MAX), Palette::default());
    }

    #[test]
    fn not_enough_colors() {
        let colors = test_colors(12);
        let counts = ColorCounts::from_pairs(colors.iter().map(|&c| (c, 3))).unwrap();
        let result = palette(&counts, PaletteSize::MAX);

        assert_eq!(result.len(), 12);
        assert!(result.iter().all(|s| s.population == 3));
        assert_unique(&result);
    }

    #[test]
    fn exact_palette_size() {
        let colors = test_colors(1024);
        let counts = ColorCounts::from_pairs(colors.iter().zip(1..).map(|(&c, n)| (c, n % 7 + 1))).unwrap();

        for k in 1..=20 {
            let result = palette(&counts, size(k));
            assert_eq!(result.len(), usize::from(k));
            assert_unique(&result);
            assert_eq!(result.total_population(), u64::from(counts.total_count()));
            for pair in result.windows(2) {
                assert!(pair[0].population >= pair[1].population);
            }
        }
    }

    #[test]
    fn nearly_identical_colors_are_still_cut() {
        let counts = ColorCounts::from_pairs((0..8).map(|i| (Color::new(100, 100, 100 + i), 1))).unwrap();
        let result = palette(&counts, size(5));
        assert_eq!(result.len(), 5);
        assert_unique(&result);
    }

    #[test]
    fn separated_groups_are_found() {
        let groups = [Color::new(250, 10, 10), Color::new(10, 250, 10), Color::new(10, 10, 250)];
        let pairs = groups.iter().enumerate().flat_map(|(g, &base)| {
            (0..4u8).map(move |d| {
                let [r, gr, b] = base.into_components();
                (Color::new(r - d, gr - d, b - d), 10 * (g as u32 + 1))
            })
        });
        let counts = ColorCounts::from_pairs(pairs).unwrap();
        let result = palette(&counts, size(3));

        let populations = result.iter().map(|s| s.population).collect::<Vec<_>>();
        assert_eq!(populations, [120, 80, 40]);
        assert_eq!(result[0].color, Color::new(9, 9, 249));
        assert_eq!(result[1].color, Color::new(9, 249, 9));
        assert_eq!(result[2].color, Color::new(249, 9, 9));
    }

    #[test]
    fn deterministic() {
        let colors = test_colors(4096);
        let counts = ColorCounts::from_pairs(colors.iter().map(|&c| (c, 1))).unwrap();
        assert_eq!(palette(&counts, size(16)), palette(&counts, size(16)));
    }
}
