//! Error types returned by palette extraction and color parsing.

use thiserror::Error;

/// The ways in which the input to palette extraction or color construction can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// The image has a width or height of zero.
    #[error("image has zero area ({width}x{height})")]
    ZeroArea {
        /// The width of the image.
        width: u32,
        /// The height of the image.
        height: u32,
    },
    /// The number of pixels does not match the image dimensions.
    #[error("expected {expected} pixels for the given dimensions but got {actual}")]
    DimensionMismatch {
        /// `width * height`
        expected: u64,
        /// The length of the provided pixel buffer.
        actual: u64,
    },
    /// The image has more than [`MAX_PIXELS`](crate::MAX_PIXELS) pixels.
    #[error("image has more than the maximum of {} pixels", crate::MAX_PIXELS)]
    TooManyPixels,
    /// The total count of a set of colors does not fit in a `u32`.
    #[error("the total color count exceeds {}", u32::MAX)]
    CountOverflow,
    /// The requested number of palette colors is outside of `[MIN_COLORS, MAX_COLORS]`.
    #[error("palette size {0} is outside of the range [{min}, {max}]", min = crate::MIN_COLORS, max = crate::MAX_COLORS)]
    PaletteSize(u32),
    /// A color channel is outside of `[0, 255]`.
    #[error("color channel value {0} is outside of the range [0, 255]")]
    Channel(i32),
    /// A string is not of the form `#RRGGBB`.
    #[error("'{0}' is not a hex color of the form #RRGGBB")]
    Hex(String),
}

/// The error type for palette extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// The image or the requested palette size was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// No colors could be derived from the image, because every pixel was stripped.
    #[error("no colors could be extracted from the image")]
    ExtractionFailed,
}
