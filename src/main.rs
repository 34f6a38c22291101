mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use lifewall::server::{ServerConfig, WallpaperServer};
use lifewall::{Canvas, QuoteConfig, WallpaperConfig, WallpaperRenderer};

/// Dot grid progress wallpapers
#[derive(Parser, Debug)]
#[command(name = "lifewall", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TrueType/OpenType font file (falls back to the built-in font)
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Do not fetch a quote
    #[arg(long, global = true)]
    no_quote: bool,

    /// Quote endpoint URL
    #[arg(long, global = true, default_value = lifewall::quote::DEFAULT_ENDPOINT)]
    quote_endpoint: String,

    /// Quote fetch attempts
    #[arg(long, global = true, default_value_t = 5)]
    max_retries: u32,

    /// Longest accepted quote, in characters
    #[arg(long, global = true, default_value_t = 80)]
    max_length: usize,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render `done` of `total` units to a PNG file
    Linear {
        #[arg(long, default_value_t = 365)]
        total: i64,
        #[arg(long)]
        done: i64,
        #[arg(long, default_value_t = Canvas::PHONE.width)]
        width: u32,
        #[arg(long, default_value_t = Canvas::PHONE.height)]
        height: u32,
        #[arg(short, long, default_value = "life_wallpaper.png")]
        output: PathBuf,
    },
    /// Render a calendar year to a PNG file
    Calendar {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value_t = Canvas::PHONE.width)]
        width: u32,
        #[arg(long, default_value_t = Canvas::PHONE.height)]
        height: u32,
        #[arg(short, long, default_value = "calendar_wallpaper.png")]
        output: PathBuf,
    },
    /// Serve wallpapers over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long, default_value_t = Canvas::HD_PORTRAIT.width)]
        width: u32,
        #[arg(long, default_value_t = Canvas::HD_PORTRAIT.height)]
        height: u32,
    },
}

impl CommonArgs {
    fn wallpaper_config(&self) -> WallpaperConfig {
        WallpaperConfig {
            font_path: self.font.clone(),
            quote: QuoteConfig {
                enabled: !self.no_quote,
                endpoint: self.quote_endpoint.clone(),
                max_retries: self.max_retries,
                max_length: self.max_length,
                ..QuoteConfig::default()
            },
            ..WallpaperConfig::default()
        }
    }
}

fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    std::fs::write(path, png).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {} ({} bytes)", path.display(), png.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.common.verbose);

    let renderer = WallpaperRenderer::new(cli.common.wallpaper_config())
        .context("failed to set up renderer")?;

    match cli.command {
        Command::Linear {
            total,
            done,
            width,
            height,
            output,
        } => {
            let png = renderer.render_linear(total, done, width, height)?;
            write_png(&output, &png)
        }
        Command::Calendar {
            year,
            width,
            height,
            output,
        } => {
            let png = renderer.render_calendar_year(year, width, height)?;
            write_png(&output, &png)
        }
        Command::Serve {
            bind,
            workers,
            width,
            height,
        } => {
            let config = ServerConfig {
                bind,
                workers: workers.unwrap_or_else(num_cpus::get),
                canvas: Canvas::new(width, height),
            };
            let server = WallpaperServer::bind(config)?;
            server.run(Arc::new(renderer))?;
            Ok(())
        }
    }
}
