//! The request layer in front of the extractor and the random generator.
//!
//! [`PaletteService`] validates an [`Upload`], decodes it, dispatches to the
//! [`PalettePipeline`], and wraps the result in a [`PaletteResponse`].
//! Failures are [`ServiceError`]s, each carrying the HTTP status code a web front end should reply with
//! and a `{"detail": ...}` body.
//!
//! # Examples
//! ```
//! # use colorbuddy::service::{PaletteService, Settings};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = PaletteService::new(Settings::default());
//! let response = service.random(Some(3), Some("serene beach sunset"), Some(42))?;
//! assert_eq!(response.palette.len(), 3);
//! assert_eq!(response.message.as_deref(), Some("Palette generated."));
//! # Ok(())
//! # }
//! ```

mod config;
mod model;

pub use config::*;
pub use model::*;

use crate::{InvalidInput, PaletteError, PalettePipeline, PaletteSize, PixelImage, RandomPalette, MAX_COLORS};
use log::{debug, error, info, warn};
use thiserror::Error;

/// The message of a successful extraction.
pub const EXTRACTED_MESSAGE: &str = "Palette extracted successfully.";

/// The message of a successful random generation.
pub const GENERATED_MESSAGE: &str = "Palette generated.";

/// An uploaded image file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    /// The client supplied file name.
    pub filename: Option<String>,
    /// The declared MIME type, e.g. `image/png`.
    pub content_type: Option<String>,
    /// The file contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload with the given content type and contents.
    #[must_use]
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: None,
            content_type: Some(content_type.into()),
            bytes,
        }
    }

    /// Sets the file name.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Whether the declared content type is an `image/*` MIME type.
    fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|mime| mime.trim_start().to_ascii_lowercase().starts_with("image/"))
    }
}

/// A rejected or failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No file, or an empty file, was uploaded.
    #[error("No image file was uploaded.")]
    MissingFile,
    /// The upload is not declared as an image.
    #[error("Invalid file type. Please upload an image (PNG, JPG, GIF).")]
    InvalidFileType,
    /// The upload exceeds the size limit.
    #[error("Image file too large. Maximum size is {max_mb}MB.")]
    TooLarge {
        /// The limit, in MiB.
        max_mb: u32,
    },
    /// The requested number of colors is out of bounds.
    #[error("Number of colors must be between 1 and {max}, got {requested}.")]
    InvalidColorCount {
        /// The requested number of colors.
        requested: u32,
        /// The largest allowed number of colors.
        max: u8,
    },
    /// The prompt is too long.
    #[error("Prompt must be at most {max} characters long.")]
    PromptTooLong {
        /// The longest allowed prompt, in characters.
        max: usize,
    },
    /// The upload could not be decoded as an image.
    #[error("An unexpected error occurred while processing the image: {0}")]
    Decode(String),
    /// The decoded image is invalid.
    #[error("{0}")]
    InvalidInput(#[from] InvalidInput),
    /// No colors could be extracted.
    #[error("Could not extract any dominant colors from the image.")]
    ExtractionFailed,
}

impl From<PaletteError> for ServiceError {
    fn from(error: PaletteError) -> Self {
        match error {
            PaletteError::InvalidInput(e) => Self::InvalidInput(e),
            PaletteError::ExtractionFailed => Self::ExtractionFailed,
        }
    }
}

impl ServiceError {
    /// The HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFileType | Self::InvalidInput(_) => 400,
            Self::TooLarge { .. } => 413,
            Self::MissingFile | Self::InvalidColorCount { .. } | Self::PromptTooLong { .. } => 422,
            Self::Decode(_) | Self::ExtractionFailed => 500,
        }
    }

    /// The response body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody { detail: self.to_string() }
    }
}

/// Handles palette requests according to its [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct PaletteService {
    /// The limits and defaults applied to each request.
    settings: Settings,
}

impl PaletteService {
    /// Creates a new service with the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings of this service.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the palette size for `requested` (or the default), bounded by `max` and [`MAX_COLORS`].
    fn palette_size(&self, requested: Option<u32>, max: u8) -> Result<PaletteSize, ServiceError> {
        let max = max.min(MAX_COLORS);
        let requested = requested.unwrap_or(u32::from(self.settings.default_size().into_inner()));
        if !(1..=u32::from(max)).contains(&requested) {
            return Err(ServiceError::InvalidColorCount { requested, max });
        }
        Ok(PaletteSize::try_from(requested)?)
    }

    /// Checks everything about the upload that does not require decoding it.
    fn validate(&self, upload: &Upload, num_colors: Option<u32>) -> Result<PaletteSize, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::MissingFile);
        }

        if !upload.is_image() {
            return Err(ServiceError::InvalidFileType);
        }

        if upload.bytes.len() as u64 > self.settings.max_upload_bytes() {
            return Err(ServiceError::TooLarge { max_mb: self.settings.max_image_upload_size_mb });
        }

        self.palette_size(num_colors, self.settings.max_extract_colors)
    }

    /// Extracts the dominant colors of an uploaded image.
    ///
    /// `num_colors` defaults to [`Settings::default_size`].
    ///
    /// # Errors
    /// Returns the first failed check, in the order missing file, file type, size,
    /// number of colors, decoding, and then extraction.
    pub fn extract(&self, upload: &Upload, num_colors: Option<u32>) -> Result<PaletteResponse, ServiceError> {
        let name = upload.filename.as_deref().unwrap_or("<unnamed>");

        let k = self.validate(upload, num_colors).inspect_err(|e| {
            warn!("rejected upload {name}: {e}");
        })?;

        let image = image::load_from_memory(&upload.bytes).map_err(|e| {
            warn!("failed to decode upload {name}: {e}");
            ServiceError::Decode(e.to_string())
        })?;
        let image = PixelImage::try_from(&image)?;

        let method = self.settings.quantizer();
        debug!(
            "extracting {k} colors from {name} ({}x{}) with {}",
            image.width(),
            image.height(),
            self.settings.quantize_method,
        );

        let pipeline = PalettePipeline::new(&image).palette_size(k).quantize_method(method);
        #[cfg(feature = "threads")]
        let palette = pipeline.palette_par();
        #[cfg(not(feature = "threads"))]
        let palette = pipeline.palette();

        let palette = palette.map_err(|e| {
            error!("extraction failed for {name}: {e}");
            ServiceError::from(e)
        })?;

        Ok(PaletteResponse::new(palette.colors(), self.settings.name_colors, EXTRACTED_MESSAGE))
    }

    /// Generates a random palette.
    ///
    /// `num_colors` defaults to [`Settings::default_size`]. The prompt is logged,
    /// but does not yet influence the colors.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidColorCount`] if `num_colors` is out of bounds
    /// or [`ServiceError::PromptTooLong`] if the prompt is too long.
    pub fn random(
        &self,
        num_colors: Option<u32>,
        prompt: Option<&str>,
        seed: Option<u64>,
    ) -> Result<PaletteResponse, ServiceError> {
        let k = self.palette_size(num_colors, self.settings.max_random_colors)?;

        let mut generator = RandomPalette::new(k);
        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            let max = self.settings.max_prompt_length;
            if prompt.chars().count() > max {
                return Err(ServiceError::PromptTooLong { max });
            }
            info!("received prompt for random palette: {prompt}");
            generator = generator.prompt(prompt);
        }
        if let Some(seed) = seed {
            generator = generator.seed(seed);
        }

        debug!("generating {k} random colors");
        Ok(PaletteResponse::new(generator.generate(), self.settings.name_colors, GENERATED_MESSAGE))
    }
}
