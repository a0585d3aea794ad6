//! A library for extracting the dominant color palette of an image and for generating random palettes.
//!
//! Extraction deduplicates the image's pixels and then clusters the unique colors using
//! Wu's greedy orthogonal bipartitioning (see the [`wu`] module). The clusters can optionally be
//! refined through k-means (see the [`kmeans`] module). The resulting [`Palette`] is ordered by
//! descending cluster population, with ties broken by ascending color value, so the output is
//! fully deterministic.
//!
//! # Features
//! `colorbuddy` has several `cargo` features that can be turned off or on:
//! - `image`: enables integration with the [`image`] crate.
//! - `kmeans`: adds k-means as an optional refinement step.
//! - `threads`: exposes a parallel version of unique color counting via [`rayon`].
//! - `service`: the request orchestrator that validates uploads and builds JSON responses.
//! - `cli`: the `colorbuddy` command line front end.
//!
//! # Example
//! ```no_run
//! # use colorbuddy::{PalettePipeline, PixelImage, PaletteSize};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?;
//! let img = PixelImage::try_from(&img)?;
//!
//! let palette = PalettePipeline::new(&img)
//!     .palette_size(PaletteSize::try_from(5u8)?)
//!     .palette()?;
//!
//! for hex in colorbuddy::format(palette.colors()) {
//!     println!("{hex}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod color_counts;
mod error;
mod format;
mod types;

pub mod contrast;
pub mod export;
pub mod harmony;
pub mod names;
pub mod random;
pub mod wu;

#[cfg(feature = "kmeans")]
pub mod kmeans;

#[cfg(feature = "service")]
pub mod service;

pub use api::*;
pub use color_counts::ColorCounts;
pub use error::*;
pub use format::*;
pub use random::{generate, RandomPalette};
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The minimum number of colors that may be requested for a palette.
pub const MIN_COLORS: u8 = 1;

/// The maximum number of colors that may be requested for a palette.
pub const MAX_COLORS: u8 = 20;
