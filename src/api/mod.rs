//! Contains the types and functions for the high level pipeline builder API.

mod palette_pipeline;

pub use palette_pipeline::PalettePipeline;

use crate::{Palette, PaletteError, PaletteSize, PixelImage};
#[cfg(feature = "kmeans")]
use crate::ColorCounts;

/// A builder struct to specify the parameters for k-means.
///
/// # Examples
/// ```
/// # use colorbuddy::KmeansOptions;
/// let options = KmeansOptions::new()
///     .sampling_factor(0.25)
///     .seed(42);
/// ```
#[cfg(feature = "kmeans")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmeansOptions {
    /// The proportion of the unique colors to sample.
    sampling_factor: f32,
    /// The seed value for the random number generator.
    seed: u64,
}

#[cfg(feature = "kmeans")]
impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "kmeans")]
impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { sampling_factor: 0.5, seed: 0 }
    }

    /// Sets the sampling factor which controls what percentage of the unique colors to sample.
    ///
    /// The default is `0.5`, that is, to sample half of the unique colors.
    #[must_use]
    pub fn sampling_factor(mut self, sampling_factor: f32) -> Self {
        self.sampling_factor = sampling_factor;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the number of samples to run based off the sampling factor.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn num_samples(&self, color_counts: &ColorCounts) -> u32 {
        (f64::from(self.sampling_factor.max(0.0)) * f64::from(color_counts.num_colors())) as u32
    }
}

/// The set of supported color quantization methods.
///
/// If the `kmeans` feature is enabled, then support will be added for that method.
/// Otherwise, only Wu's color quantization method is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum QuantizeMethod {
    /// Wu's color quantizer (Greedy Orthogonal Bipartitioning).
    ///
    /// This method is quick, deterministic, and gives good results.
    ///
    /// See the [`wu`](crate::wu) module for more details.
    #[default]
    Wu,
    /// Wu's color quantizer followed by k-means refinement.
    ///
    /// This method is slower than Wu's color quantizer but can give more accurate cluster colors.
    /// If refinement would collapse clusters together, Wu's palette is returned instead.
    ///
    /// See the [`kmeans`](crate::kmeans) module for more details.
    #[cfg(feature = "kmeans")]
    Kmeans(KmeansOptions),
}

/// Extracts a palette of up to `k` dominant colors from the given image.
///
/// This is shorthand for [`PalettePipeline`] with the default [`QuantizeMethod`].
///
/// # Errors
/// Returns [`PaletteError::InvalidInput`] if `k` is outside of `[1, 20]`
/// and [`PaletteError::ExtractionFailed`] if the image has no samples.
///
/// # Examples
/// ```
/// # use colorbuddy::{extract, Color, PixelImage};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let image = PixelImage::new(3, 1, vec![Color::WHITE, Color::BLACK, Color::WHITE])?;
/// let palette = extract(&image, 2)?;
/// assert_eq!(palette.colors().collect::<Vec<_>>(), [Color::WHITE, Color::BLACK]);
/// # Ok(())
/// # }
/// ```
pub fn extract(image: &PixelImage, k: u32) -> Result<Palette, PaletteError> {
    let k = PaletteSize::try_from(k)?;
    PalettePipeline::new(image).palette_size(k).palette()
}

/// Extracts a palette of up to `k` dominant colors from a raw buffer of RGB bytes.
///
/// # Errors
/// Returns [`PaletteError::InvalidInput`] if the dimensions are invalid for the buffer
/// (including a zero area) or if `k` is outside of `[1, 20]`.
pub fn extract_rgb8(width: u32, height: u32, rgb: &[u8], k: u32) -> Result<Palette, PaletteError> {
    let image = PixelImage::from_rgb8(width, height, rgb)?;
    extract(&image, k)
}
