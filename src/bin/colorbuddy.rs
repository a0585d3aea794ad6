#![deny(unsafe_code)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colorbuddy::{
    contrast::{readable_text_color, ContrastInfo},
    export,
    harmony::{self, HarmonyReport},
    service::{Method, PaletteResponse, PaletteService, Settings, Upload},
};
use image::ImageFormat;
use serde::Serialize;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Hex,
    Css,
    Tailwind,
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Hex => "hex",
            Format::Css => "css",
            Format::Tailwind => "tailwind",
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Extract the dominant colors of an image
    Extract {
        input: PathBuf,

        /// Number of colors (defaults to the configured palette size)
        #[arg(short, long)]
        k: Option<u32>,

        /// Refine the palette with k-means
        #[arg(long)]
        kmeans: bool,

        /// Seed for k-means sampling
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, default_value_t = Format::Json)]
        format: Format,

        /// Add a harmony analysis and text contrast for each color
        #[arg(long)]
        report: bool,
    },
    /// Generate a random palette
    Random {
        /// Number of colors (defaults to the configured palette size)
        #[arg(short, long)]
        k: Option<u32>,

        #[arg(long)]
        seed: Option<u64>,

        /// A theme for the palette (currently unused)
        #[arg(long)]
        prompt: Option<String>,

        #[arg(short, long, default_value_t = Format::Json)]
        format: Format,

        /// Add a harmony analysis and text contrast for each color
        #[arg(long)]
        report: bool,
    },
}

/// Extract color palettes from images or generate random ones.
#[derive(Parser)]
#[command(author, version, about)]
struct Options {
    /// JSON settings file; `COLORBUDDY_*` environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Serialize)]
struct TextContrast {
    hex: String,
    text: String,
    #[serde(flatten)]
    contrast: ContrastInfo,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    response: &'a PaletteResponse,
    harmony: HarmonyReport,
    contrast: Vec<TextContrast>,
}

impl<'a> Report<'a> {
    fn new(response: &'a PaletteResponse) -> Self {
        let colors = response.named_colors().map(|(c, _)| c).collect::<Vec<_>>();
        let contrast = colors
            .iter()
            .map(|&color| {
                let text = readable_text_color(color);
                TextContrast {
                    hex: color.to_hex(),
                    text: text.to_hex(),
                    contrast: ContrastInfo::new(color, text),
                }
            })
            .collect();

        Self { response, harmony: harmony::analyze(&colors), contrast }
    }

    fn print_text(&self) {
        println!();
        println!(
            "{} ({}): {}",
            self.harmony.harmony, self.harmony.temperature, self.harmony.description
        );
        for TextContrast { hex, text, contrast } in &self.contrast {
            println!("{hex} text {text} {:.2}:1 {}", contrast.ratio, contrast.level);
        }
    }
}

fn print(response: &PaletteResponse, format: Format, report: bool) -> Result<()> {
    match format {
        Format::Json => {
            let json = if report {
                serde_json::to_string_pretty(&Report::new(response))
            } else {
                serde_json::to_string_pretty(response)
            };
            println!("{}", json.context("failed to serialize the response")?);
            return Ok(());
        }
        Format::Hex => {
            for entry in &response.palette {
                match &entry.name {
                    Some(name) => println!("{} {name}", entry.hex),
                    None => println!("{}", entry.hex),
                }
            }
        }
        Format::Css => println!("{}", export::css_variables(response.named_colors())),
        Format::Tailwind => println!("{}", export::tailwind_config(response.named_colors())),
    }

    if report {
        Report::new(response).print_text();
    }

    Ok(())
}

fn upload(input: &Path) -> Result<Upload> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let content_type = ImageFormat::from_path(input)
        .ok()
        .map(|format| format.to_mime_type().to_owned());

    Ok(Upload {
        filename: input.file_name().map(|name| name.to_string_lossy().into_owned()),
        content_type,
        bytes,
    })
}

fn main() -> Result<()> {
    let Options { config, verbose, command } = Options::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let mut settings = Settings::load(config.as_deref()).context("failed to load settings")?;

    match command {
        Command::Extract { input, k, kmeans, seed, format, report } => {
            if kmeans {
                settings.quantize_method = Method::Kmeans;
            }
            if let Some(seed) = seed {
                settings.seed = seed;
            }

            let upload = upload(&input)?;
            let response = PaletteService::new(settings)
                .extract(&upload, k)
                .with_context(|| format!("failed to extract a palette from {}", input.display()))?;

            print(&response, format, report)
        }
        Command::Random { k, seed, prompt, format, report } => {
            let response = PaletteService::new(settings)
                .random(k, prompt.as_deref(), seed)
                .context("failed to generate a palette")?;

            print(&response, format, report)
        }
    }
}
