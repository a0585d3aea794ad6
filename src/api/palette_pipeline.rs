//! The builder for palette extraction.

use crate::{wu, ColorCounts, Palette, PaletteError, PaletteSize, PixelImage, QuantizeMethod};

#[cfg(feature = "kmeans")]
use crate::kmeans::{self, Centroids};

/// A builder struct to extract a color palette from an image.
///
/// # Examples
/// ```
/// # use colorbuddy::{Color, PalettePipeline, PaletteSize, PixelImage, QuantizeMethod, KmeansOptions};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pixels = (0..=255).map(|v| Color::new(v, 255 - v, 128)).collect();
/// let image = PixelImage::new(16, 16, pixels)?;
///
/// let palette = PalettePipeline::new(&image)
///     .palette_size(PaletteSize::try_from(4u8)?)
///     .quantize_method(QuantizeMethod::Kmeans(KmeansOptions::new().seed(42)))
///     .palette()?;
///
/// assert_eq!(palette.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The image to extract colors from.
    pub(crate) image: &'a PixelImage,
    /// The number of colors to extract.
    pub(crate) k: PaletteSize,
    /// The clustering method.
    pub(crate) quantize_method: QuantizeMethod,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default options.
    #[must_use]
    pub fn new(image: &'a PixelImage) -> Self {
        Self {
            image,
            k: PaletteSize::default(),
            quantize_method: QuantizeMethod::default(),
        }
    }

    /// Sets the (maximum) number of colors in the palette.
    ///
    /// The default is [`PaletteSize::DEFAULT`].
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Sets the clustering method.
    ///
    /// The default is [`QuantizeMethod::Wu`].
    #[must_use]
    pub fn quantize_method(mut self, quantize_method: QuantizeMethod) -> Self {
        self.quantize_method = quantize_method;
        self
    }

    /// Computes the palette.
    ///
    /// # Errors
    /// Returns [`PaletteError::ExtractionFailed`] if the image has no samples.
    pub fn palette(self) -> Result<Palette, PaletteError> {
        let color_counts = ColorCounts::new(self.image);
        palette(&color_counts, self.k, self.quantize_method)
    }

    /// Computes the palette, deduplicating pixels in parallel.
    ///
    /// The result is the same as [`PalettePipeline::palette`].
    ///
    /// # Errors
    /// Returns [`PaletteError::ExtractionFailed`] if the image has no samples.
    #[cfg(feature = "threads")]
    pub fn palette_par(self) -> Result<Palette, PaletteError> {
        let color_counts = ColorCounts::new_par(self.image);
        palette(&color_counts, self.k, self.quantize_method)
    }
}

/// Computes the palette for the given unique colors with the given method.
fn palette(
    color_counts: &ColorCounts,
    k: PaletteSize,
    method: QuantizeMethod,
) -> Result<Palette, PaletteError> {
    if color_counts.is_empty() {
        return Err(PaletteError::ExtractionFailed);
    }

    let palette = match method {
        QuantizeMethod::Wu => wu::palette(color_counts, k),
        #[cfg(feature = "kmeans")]
        QuantizeMethod::Kmeans(options) => {
            let initial = wu::palette(color_counts, k);
            let refined = kmeans::palette(
                color_counts,
                options.num_samples(color_counts),
                Centroids::from_truncated(initial.clone().into_colors()),
                options.seed,
            );

            refined_or_initial(initial, refined)
        }
    };

    Ok(palette)
}

/// Keeps the k-means palette unless clusters collapsed and it lost colors.
#[cfg(feature = "kmeans")]
fn refined_or_initial(initial: Palette, refined: Palette) -> Palette {
    if refined.len() < initial.len() {
        initial
    } else {
        refined
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Color};

    fn gradient_image() -> PixelImage {
        let pixels = (0..64 * 64)
            .map(|i: u32| {
                let (x, y) = (i % 64, i / 64);
                #[allow(clippy::cast_possible_truncation)]
                {
                    Color::new((x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8)
                }
            })
            .collect();
        PixelImage::new(64, 64, pixels).unwrap()
    }

    #[test]
    fn default_options() {
        let image = gradient_image();
        let palette = PalettePipeline::new(&image).palette().unwrap();
        assert_eq!(palette.len(), usize::from(PaletteSize::DEFAULT));
        assert_eq!(palette.total_population(), 64 * 64);
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_matches_sequential() {
        let image = PixelImage::new(50, 50, test_colors(2500)).unwrap();
        let pipeline = PalettePipeline::new(&image).palette_size(PaletteSize::MAX);
        assert_eq!(pipeline.clone().palette(), pipeline.palette_par());
    }

    #[cfg(feature = "kmeans")]
    #[test]
    fn kmeans_is_deterministic_and_complete() {
        use crate::KmeansOptions;

        let image = gradient_image();
        let k = PaletteSize::try_from(8u8).unwrap();
        let pipeline = PalettePipeline::new(&image)
            .palette_size(k)
            .quantize_method(QuantizeMethod::Kmeans(KmeansOptions::new().seed(42)));

        let a = pipeline.clone().palette().unwrap();
        let b = pipeline.palette().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert_eq!(a.total_population(), 64 * 64);
        for pair in a.windows(2) {
            assert!(pair[0].population >= pair[1].population);
        }
    }

    #[cfg(feature = "kmeans")]
    #[test]
    fn collapsed_kmeans_falls_back_to_wu() {
        let magenta = Color::new(255, 0, 255);
        let counts = ColorCounts::from_pairs(
            (0..10u8).flat_map(|d| [(Color::new(d, d, d), 4), (Color::new(255 - d, 255 - d, 255 - d), 3)]),
        )
        .unwrap();
        let initial = ColorCounts::from_pairs([(Color::BLACK, 40), (Color::WHITE, 30), (magenta, 1)])
            .unwrap()
            .trivial_palette();

        let refined = kmeans::palette(&counts, 2000, Centroids::from_truncated(initial.clone().into_colors()), 0);
        assert_eq!(refined.len(), 2);
        assert_eq!(refined_or_initial(initial.clone(), refined), initial);
    }

    #[cfg(feature = "kmeans")]
    #[test]
    fn complete_kmeans_palette_is_kept() {
        let initial = ColorCounts::from_pairs([(Color::BLACK, 2), (Color::WHITE, 1)])
            .unwrap()
            .trivial_palette();
        let refined = ColorCounts::from_pairs([(Color::new(1, 1, 1), 2), (Color::new(254, 254, 254), 1)])
            .unwrap()
            .trivial_palette();

        assert_eq!(refined_or_initial(initial, refined.clone()), refined);
    }
}
