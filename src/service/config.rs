//! Layered service settings.

use crate::{PaletteSize, QuantizeMethod};
#[cfg(feature = "kmeans")]
use crate::KmeansOptions;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

/// The prefix of environment variables that override [`Settings`].
pub const ENV_PREFIX: &str = "COLORBUDDY_";

/// An error encountered while loading [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {}", path.display())]
    Io {
        /// The path of the settings file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid JSON for [`Settings`].
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    Env {
        /// The name of the environment variable.
        key: String,
        /// The value that failed to parse.
        value: String,
    },
    /// The settings are inconsistent with each other or with the supported ranges.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Which clustering method the service extracts palettes with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Wu's color quantizer.
    #[default]
    Wu,
    /// Wu's color quantizer followed by k-means refinement.
    Kmeans,
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wu" => Ok(Self::Wu),
            "kmeans" => Ok(Self::Kmeans),
            _ => Err(()),
        }
    }
}

/// The service settings.
///
/// Settings are layered: the defaults, then an optional JSON file,
/// then `COLORBUDDY_<FIELD>` environment variables (for example `COLORBUDDY_MAX_RANDOM_COLORS`).
/// Fields missing from the JSON file keep their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// The name reported by the service.
    pub project_name: String,
    /// The largest accepted upload, in MiB.
    pub max_image_upload_size_mb: u32,
    /// The number of colors used when a request does not specify one.
    pub default_palette_size: u8,
    /// The largest number of colors an extraction may request.
    pub max_extract_colors: u8,
    /// The largest number of colors a random palette may request.
    pub max_random_colors: u8,
    /// The longest accepted prompt, in characters.
    pub max_prompt_length: usize,
    /// Whether to attach a descriptive name to each color of a response.
    pub name_colors: bool,
    /// The clustering method for extraction.
    pub quantize_method: Method,
    /// The seed for k-means sampling.
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "ColorBuddy API".to_owned(),
            max_image_upload_size_mb: 5,
            default_palette_size: PaletteSize::DEFAULT.into_inner(),
            max_extract_colors: 20,
            max_random_colors: 10,
            max_prompt_length: 100,
            name_colors: true,
            quantize_method: Method::Wu,
            seed: 0,
        }
    }
}

/// Parses an override into `field`, reporting `key` and `value` on failure.
fn set<T: FromStr>(field: &mut T, key: &str, value: &str) -> Result<(), ConfigError> {
    *field = value.trim().parse().map_err(|_| ConfigError::Env {
        key: key.to_owned(),
        value: value.to_owned(),
    })?;
    Ok(())
}

impl Settings {
    /// Reads settings from a JSON file, using defaults for any missing fields.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Applies the `COLORBUDDY_<FIELD>` overrides among the given variables.
    ///
    /// Variables without the prefix or naming no known field are ignored.
    ///
    /// # Errors
    /// Returns [`ConfigError::Env`] if an override cannot be parsed.
    pub fn apply_overrides<K, V>(
        &mut self,
        vars: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match field {
                "PROJECT_NAME" => value.clone_into(&mut self.project_name),
                "MAX_IMAGE_UPLOAD_SIZE_MB" => set(&mut self.max_image_upload_size_mb, key, value)?,
                "DEFAULT_PALETTE_SIZE" => set(&mut self.default_palette_size, key, value)?,
                "MAX_EXTRACT_COLORS" => set(&mut self.max_extract_colors, key, value)?,
                "MAX_RANDOM_COLORS" => set(&mut self.max_random_colors, key, value)?,
                "MAX_PROMPT_LENGTH" => set(&mut self.max_prompt_length, key, value)?,
                "NAME_COLORS" => set(&mut self.name_colors, key, value)?,
                "QUANTIZE_METHOD" => set(&mut self.quantize_method, key, value)?,
                "SEED" => set(&mut self.seed, key, value)?,
                _ => (),
            }
        }

        Ok(())
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if a color bound is outside of `[1, 20]`,
    /// the default palette size exceeds a bound, or the upload limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        /// Checks that `value` is a supported palette size.
        fn in_range(name: &str, value: u8) -> Result<(), ConfigError> {
            PaletteSize::try_from(value)
                .map(drop)
                .map_err(|e| ConfigError::Invalid(format!("{name}: {e}")))
        }

        in_range("max_extract_colors", self.max_extract_colors)?;
        in_range("max_random_colors", self.max_random_colors)?;
        in_range("default_palette_size", self.default_palette_size)?;

        if self.default_palette_size > self.max_extract_colors.min(self.max_random_colors) {
            return Err(ConfigError::Invalid(format!(
                "default_palette_size ({}) exceeds the color limits ({} for extraction, {} for random palettes)",
                self.default_palette_size, self.max_extract_colors, self.max_random_colors,
            )));
        }

        if self.max_image_upload_size_mb == 0 {
            return Err(ConfigError::Invalid("max_image_upload_size_mb must be positive".to_owned()));
        }

        #[cfg(not(feature = "kmeans"))]
        if self.quantize_method == Method::Kmeans {
            return Err(ConfigError::Invalid(
                "quantize_method \"kmeans\" requires the `kmeans` feature".to_owned(),
            ));
        }

        Ok(())
    }

    /// Loads the settings from the defaults, the optional JSON file, and then the environment.
    ///
    /// # Errors
    /// Returns an error if any layer is invalid or the result fails [`Settings::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(std::env::vars())?;
        settings.validate()?;
        Ok(settings)
    }

    /// The largest accepted upload, in bytes.
    #[must_use]
    pub fn max_upload_bytes(&self) -> u64 {
        u64::from(self.max_image_upload_size_mb) * 1024 * 1024
    }

    /// The default palette size, clamped to the supported range.
    #[must_use]
    pub fn default_size(&self) -> PaletteSize {
        PaletteSize::from_clamped(u32::from(self.default_palette_size))
    }

    /// The quantization method to extract palettes with.
    #[must_use]
    pub fn quantizer(&self) -> QuantizeMethod {
        match self.quantize_method {
            Method::Wu => QuantizeMethod::Wu,
            #[cfg(feature = "kmeans")]
            Method::Kmeans => QuantizeMethod::Kmeans(KmeansOptions::new().seed(self.seed)),
            #[cfg(not(feature = "kmeans"))]
            Method::Kmeans => QuantizeMethod::Wu,
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Wu => "wu",
            Self::Kmeans => "kmeans",
        })
    }
}
