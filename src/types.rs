//! Contains various types needed across the crate.

use crate::{InvalidInput, MAX_COLORS, MAX_PIXELS, MIN_COLORS};
use bitvec::vec::BitVec;
use palette::{cast::ComponentsAs, Srgb, Srgba};
use std::{fmt::Display, ops::Deref};
#[cfg(feature = "image")]
use image::{DynamicImage, RgbImage, RgbaImage};

/// An exact 8-bit per channel sRGB color.
///
/// Colors are ordered by their packed numeric value `0xRRGGBB`,
/// which is the same as ordering by `(red, green, blue)`.
///
/// # Examples
/// ```
/// # use colorbuddy::Color;
/// # fn main() -> Result<(), colorbuddy::InvalidInput> {
/// let orange = Color::new(255, 87, 51);
/// assert_eq!(orange, Color::try_from([255, 87, 51])?);
/// assert_eq!(orange, "#FF5733".parse()?);
/// assert!(Color::try_from([256, 0, 0]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    /// The red channel.
    pub red: u8,
    /// The green channel.
    pub green: u8,
    /// The blue channel.
    pub blue: u8,
}

impl Color {
    /// Pure black, `#000000`.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white, `#FFFFFF`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new [`Color`] from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a [`Color`] from the lower 24 bits of `packed`, laid out as `0xRRGGBB`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(packed: u32) -> Self {
        Self::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }

    /// Returns the numeric value of this color laid out as `0xRRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Returns the channels as an array.
    #[must_use]
    pub const fn into_components(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Creates a [`Color`] from an array of channels.
    #[must_use]
    pub const fn from_components([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }

    /// Returns this color with each channel scaled to `[0.0, 1.0]`.
    #[must_use]
    pub fn into_f32(self) -> Srgb<f32> {
        Srgb::<u8>::from(self).into_format()
    }
}

impl From<Srgb<u8>> for Color {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.red, color.green, color.blue)
    }
}

impl TryFrom<[i32; 3]> for Color {
    type Error = InvalidInput;

    fn try_from(channels: [i32; 3]) -> Result<Self, Self::Error> {
        let mut components = [0; 3];
        for (c, v) in components.iter_mut().zip(channels) {
            *c = u8::try_from(v).map_err(|_| InvalidInput::Channel(v))?;
        }
        Ok(Self::from_components(components))
    }
}

/// This type is used to specify the (maximum) number of colors to include in a palette.
///
/// This is a simple new type wrapper around `u8` with the invariant that it must be
/// in the range `[MIN_COLORS, MAX_COLORS]`, that is, `[1, 20]`.
///
/// # Examples
/// ```
/// # use colorbuddy::{PaletteSize, InvalidInput};
/// # fn main() -> Result<(), InvalidInput> {
/// let size = PaletteSize::try_from(8u8)?;
/// let size: PaletteSize = 8u32.try_into()?;
/// assert!(PaletteSize::try_from(0u8).is_err());
/// assert_eq!(PaletteSize::from_clamped(1024), PaletteSize::MAX);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u8);

impl PaletteSize {
    /// The smallest palette size (given by [`MIN_COLORS`]).
    pub const MIN: Self = Self(MIN_COLORS);

    /// The largest palette size (given by [`MAX_COLORS`]).
    pub const MAX: Self = Self(MAX_COLORS);

    /// The default palette size of `6`.
    pub const DEFAULT: Self = Self(6);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Creates a [`PaletteSize`] by clamping the given value to `[MIN_COLORS, MAX_COLORS]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_clamped(value: u32) -> Self {
        if value < MIN_COLORS as u32 {
            Self::MIN
        } else if value > MAX_COLORS as u32 {
            Self::MAX
        } else {
            Self(value as u8)
        }
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PaletteSize> for u8 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl From<PaletteSize> for usize {
    fn from(val: PaletteSize) -> Self {
        val.into_inner().into()
    }
}

impl TryFrom<u32> for PaletteSize {
    type Error = InvalidInput;

    #[allow(clippy::cast_possible_truncation)]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (u32::from(MIN_COLORS)..=u32::from(MAX_COLORS)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidInput::PaletteSize(value))
        }
    }
}

impl TryFrom<u8> for PaletteSize {
    type Error = InvalidInput;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        u32::from(value).try_into()
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// An immutable, rectangular, row-major grid of pixels.
///
/// Pixels may be marked as stripped (e.g., fully transparent pixels from an RGBA image),
/// in which case they are not considered during palette extraction.
/// A [`PixelImage`] always has a nonzero area and at most [`MAX_PIXELS`] pixels.
///
/// # Examples
/// From raw colors:
/// ```
/// # use colorbuddy::{Color, PixelImage};
/// # fn main() -> Result<(), colorbuddy::InvalidInput> {
/// let image = PixelImage::new(2, 1, vec![Color::BLACK, Color::WHITE])?;
/// assert_eq!(image.num_samples(), 2);
/// assert!(PixelImage::new(0, 0, Vec::new()).is_err());
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use colorbuddy::PixelImage;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?;
/// let image = PixelImage::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    /// The number of columns.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Vec<Color>,
    /// Whether each pixel has been stripped.
    stripped: BitVec,
}

impl PixelImage {
    /// Returns the number of pixels for the given dimensions, checking the area invariants.
    fn area(width: u32, height: u32) -> Result<u64, InvalidInput> {
        let area = u64::from(width) * u64::from(height);
        if area == 0 {
            Err(InvalidInput::ZeroArea { width, height })
        } else if area > u64::from(MAX_PIXELS) {
            Err(InvalidInput::TooManyPixels)
        } else {
            Ok(area)
        }
    }

    /// Checks that a buffer of `len` elements with `channels` elements per pixel
    /// fits the given dimensions.
    fn check_len(width: u32, height: u32, len: usize, channels: usize) -> Result<(), InvalidInput> {
        let expected = Self::area(width, height)?;
        if len as u64 == expected * channels as u64 {
            Ok(())
        } else {
            Err(InvalidInput::DimensionMismatch {
                expected,
                actual: (len / channels) as u64,
            })
        }
    }

    /// Creates a new [`PixelImage`] where every pixel is a sample.
    ///
    /// # Errors
    /// Returns an error if the image has zero area, more than [`MAX_PIXELS`] pixels,
    /// or if `pixels.len()` is not equal to `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, InvalidInput> {
        Self::check_len(width, height, pixels.len(), 1)?;
        let stripped = BitVec::repeat(false, pixels.len());
        Ok(Self { width, height, pixels, stripped })
    }

    /// Creates a new [`PixelImage`] from a raw buffer of RGB bytes.
    ///
    /// # Errors
    /// Returns an error if the image has zero area, more than [`MAX_PIXELS`] pixels,
    /// or if `rgb.len()` is not equal to `width * height * 3`.
    pub fn from_rgb8(width: u32, height: u32, rgb: &[u8]) -> Result<Self, InvalidInput> {
        Self::check_len(width, height, rgb.len(), 3)?;
        let colors: &[Srgb<u8>] = rgb.components_as();
        Self::new(width, height, colors.iter().copied().map(Color::from).collect())
    }

    /// Creates a new [`PixelImage`] from a raw buffer of RGBA bytes.
    ///
    /// Fully transparent pixels (an alpha of `0`) are stripped.
    ///
    /// # Errors
    /// Returns an error if the image has zero area, more than [`MAX_PIXELS`] pixels,
    /// or if `rgba.len()` is not equal to `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, InvalidInput> {
        Self::check_len(width, height, rgba.len(), 4)?;
        let colors: &[Srgba<u8>] = rgba.components_as();
        let pixels = colors.iter().map(|c| Color::from(c.color)).collect();
        let stripped = colors.iter().map(|c| c.alpha == 0).collect();
        Ok(Self { width, height, pixels, stripped })
    }

    /// The width of the image.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order, including stripped ones.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Returns the pixel at the given coordinates,
    /// or `None` if the coordinates are out of bounds or the pixel is stripped.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            let i = y as usize * self.width as usize + x as usize;
            (!self.stripped[i]).then_some(self.pixels[i])
        } else {
            None
        }
    }

    /// The pixels that take part in palette extraction, in row-major order.
    pub fn samples(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels
            .iter()
            .zip(self.stripped.iter().by_vals())
            .filter_map(|(&color, stripped)| (!stripped).then_some(color))
    }

    /// The number of pixels that take part in palette extraction.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_samples(&self) -> u32 {
        self.stripped.count_zeros() as u32
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbImage> for PixelImage {
    type Error = InvalidInput;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::from_rgb8(width, height, image.as_raw())
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbaImage> for PixelImage {
    type Error = InvalidInput;

    fn try_from(image: &RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.as_raw())
    }
}

#[cfg(feature = "image")]
impl TryFrom<&DynamicImage> for PixelImage {
    type Error = InvalidInput;

    fn try_from(image: &DynamicImage) -> Result<Self, Self::Error> {
        if image.color().has_alpha() {
            Self::try_from(&image.to_rgba8())
        } else {
            Self::try_from(&image.to_rgb8())
        }
    }
}

/// A palette color together with the number of samples assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swatch {
    /// The representative color of the cluster.
    pub color: Color,
    /// The number of image samples assigned to the cluster.
    pub population: u32,
}

/// The output of palette extraction: an ordered sequence of unique colors.
///
/// Swatches are sorted by descending population.
/// Swatches with equal populations are sorted by ascending color value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette(Vec<Swatch>);

impl Palette {
    /// Creates a [`Palette`] from clusters, sorting them by population.
    pub(crate) fn from_swatches(mut swatches: Vec<Swatch>) -> Self {
        swatches.sort_unstable_by(|a, b| {
            b.population
                .cmp(&a.population)
                .then_with(|| a.color.cmp(&b.color))
        });
        debug_assert!(swatches.windows(2).all(|w| w[0].color != w[1].color));
        Self(swatches)
    }

    /// The colors of the palette, most prevalent first.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.0.iter().map(|s| s.color)
    }

    /// Consumes the palette, returning its colors.
    #[must_use]
    pub fn into_colors(self) -> Vec<Color> {
        self.0.into_iter().map(|s| s.color).collect()
    }

    /// Consumes the palette, returning its swatches.
    #[must_use]
    pub fn into_inner(self) -> Vec<Swatch> {
        self.0
    }

    /// The total population over all swatches.
    #[must_use]
    pub fn total_population(&self) -> u64 {
        self.0.iter().map(|s| u64::from(s.population)).sum()
    }
}

impl Deref for Palette {
    type Target = [Swatch];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Palette {
    type Item = Swatch;
    type IntoIter = std::vec::IntoIter<Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = std::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
