//! lifewall
//!
//! Renders phone wallpapers that visualise progress through a period as a
//! grid of dots: either a linear "N units, M done" counter or a calendar
//! year laid out as twelve month blocks. An optional short quote is fetched
//! from a remote source and hung above the grid.
//!
//! # Pipeline
//!
//! - **Quote provider** ([`quote`]): one bounded-length quote, retried
//!   within a budget, or nothing
//! - **Measurement** ([`rendering::text`]): word wrap plus font metrics
//! - **Layout** ([`rendering::layout`]): pure dot grid geometry
//! - **Composition** ([`rendering::compose`]): places grid, quote and
//!   labels on the canvas as a [`rendering::paint::CanvasLayout`]
//! - **Raster** ([`rendering::raster`]): pixels and PNG bytes
//!
//! # Example
//!
//! ```no_run
//! use lifewall::{WallpaperConfig, WallpaperRenderer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = WallpaperRenderer::new(WallpaperConfig::default())?;
//! let png = renderer.render_linear(365, 24, 1179, 2556)?;
//! std::fs::write("life_wallpaper.png", png)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;

pub mod calendar;
pub mod error;
pub mod quote;
pub mod rendering;
pub mod server;

pub use calendar::{CalendarProgress, YearKind};
pub use error::{Error, Result};
pub use quote::{Quote, QuotePolicy, QuoteSource};

use quote::NoQuoteSource;
use rendering::compose::{compose_calendar, compose_linear};
use rendering::font::{load_font, FontSet, FontSource};
use rendering::paint::CanvasLayout;
use rendering::raster::rasterize;
use rendering::text::{measure, WrappedTextBlock, CALENDAR_WRAP_WIDTH, LINEAR_WRAP_WIDTH};

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Common phone-portrait resolution; the library default.
    pub const PHONE: Canvas = Canvas {
        width: 1179,
        height: 2556,
    };
    /// Default for the HTTP deployment.
    pub const HD_PORTRAIT: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest accepted side, in pixels.
    pub const MAX_SIDE: u32 = 8192;
    /// Largest accepted area; bounds the RGB buffer to roughly 100 MB.
    pub const MAX_PIXELS: u64 = 32 * 1024 * 1024;

    pub fn validate(self) -> Result<Self> {
        let pixels = u64::from(self.width) * u64::from(self.height);
        if self.width == 0
            || self.height == 0
            || self.width > Self::MAX_SIDE
            || self.height > Self::MAX_SIDE
            || pixels > Self::MAX_PIXELS
        {
            return Err(Error::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::PHONE
    }
}

/// `done` of `total` units elapsed. Always satisfies `done <= total` and
/// `total > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    done: u32,
    total: u32,
}

impl Progress {
    /// Largest accepted `total`; a century of days fits with room to spare.
    pub const MAX_TOTAL: i64 = 100_000;

    pub fn new(done: i64, total: i64) -> Result<Self> {
        let invalid = || Error::InvalidProgress { done, total };
        if total <= 0 || total > Self::MAX_TOTAL || done < 0 || done > total {
            return Err(invalid());
        }
        Ok(Self {
            done: u32::try_from(done).map_err(|_| invalid())?,
            total: u32::try_from(total).map_err(|_| invalid())?,
        })
    }

    pub fn done(&self) -> u32 {
        self.done
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// `floor(done / total * 100)`
    pub fn percent(&self) -> u32 {
        (u64::from(self.done) * 100 / u64::from(self.total)) as u32
    }

    pub fn label(&self) -> String {
        format!("{}% completed", self.percent())
    }
}

/// Quote fetching configuration
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Fetch quotes at all
    pub enabled: bool,
    pub endpoint: String,
    pub max_retries: u32,
    /// Longest accepted quote, in characters
    pub max_length: usize,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        let policy = QuotePolicy::default();
        Self {
            enabled: true,
            endpoint: quote::DEFAULT_ENDPOINT.to_string(),
            max_retries: policy.max_retries,
            max_length: policy.max_length,
            timeout_ms: 5000,
        }
    }
}

impl QuoteConfig {
    pub fn policy(&self) -> QuotePolicy {
        QuotePolicy {
            max_retries: self.max_retries,
            max_length: self.max_length,
        }
    }
}

/// Renderer configuration
///
/// ```
/// let cfg = lifewall::WallpaperConfig::default();
/// assert_eq!(cfg.canvas.width, 1179);
/// assert_eq!(cfg.quote.max_length, 80);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WallpaperConfig {
    /// Size used when a caller does not pick one
    pub canvas: Canvas,
    /// TrueType/OpenType font; the built-in font is used when unset or unusable
    pub font_path: Option<PathBuf>,
    pub quote: QuoteConfig,
}

/// Renders wallpapers. Holds only read-only state, so one instance can serve
/// concurrent requests.
pub struct WallpaperRenderer {
    config: WallpaperConfig,
    fonts: FontSource,
    quotes: Box<dyn QuoteSource>,
}

impl WallpaperRenderer {
    /// Resolve the font once and build the configured quote source.
    pub fn new(config: WallpaperConfig) -> Result<Self> {
        let fonts = load_font(config.font_path.as_deref());
        let quotes = build_quote_source(&config.quote)?;
        Ok(Self::with_parts(config, fonts, quotes))
    }

    pub fn with_parts(config: WallpaperConfig, fonts: FontSource, quotes: Box<dyn QuoteSource>) -> Self {
        Self {
            config,
            fonts,
            quotes,
        }
    }

    fn fetch_block(&self, wrap_width: usize, fonts: &FontSet) -> Option<WrappedTextBlock> {
        if !self.config.quote.enabled {
            return None;
        }
        let quote = quote::fetch_quote(self.quotes.as_ref(), self.config.quote.policy())?;
        Some(measure(&quote, wrap_width, &fonts.quote, &fonts.author))
    }

    /// Fetch a quote and compose the linear wallpaper.
    pub fn layout_linear(&self, progress: Progress, canvas: Canvas) -> CanvasLayout {
        let fonts = FontSet::linear(&self.fonts);
        let block = self.fetch_block(LINEAR_WRAP_WIDTH, &fonts);
        compose_linear(canvas, progress, block.as_ref(), &fonts)
    }

    /// Fetch a quote and compose the calendar wallpaper.
    pub fn layout_calendar(&self, progress: CalendarProgress, canvas: Canvas) -> CanvasLayout {
        let fonts = FontSet::calendar(&self.fonts);
        let block = self.fetch_block(CALENDAR_WRAP_WIDTH, &fonts);
        compose_calendar(canvas, progress, block.as_ref(), &fonts)
    }

    /// Render `done` of `total` as a PNG. Invalid progress or canvas sizes
    /// are rejected before anything is fetched or drawn.
    pub fn render_linear(&self, total: i64, done: i64, width: u32, height: u32) -> Result<Vec<u8>> {
        let progress = Progress::new(done, total)?;
        let canvas = Canvas::new(width, height).validate()?;
        let layout = self.layout_linear(progress, canvas);
        log::debug!(
            "linear {}/{} on {}x{}: {} commands, digest {}",
            progress.done(),
            progress.total(),
            width,
            height,
            layout.commands.len(),
            layout.fingerprint()
        );
        Ok(rasterize(&layout, &self.fonts)?.png_data)
    }

    /// Render a calendar year as a PNG; `None` means the current year.
    pub fn render_calendar_year(&self, year: Option<i32>, width: u32, height: u32) -> Result<Vec<u8>> {
        let today = chrono::Local::now().date_naive();
        self.render_calendar_year_on(year, today, width, height)
    }

    /// As [`render_calendar_year`](Self::render_calendar_year), with an
    /// explicit "today".
    pub fn render_calendar_year_on(
        &self,
        year: Option<i32>,
        today: NaiveDate,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>> {
        let progress = CalendarProgress::resolve(year, today)?;
        let canvas = Canvas::new(width, height).validate()?;
        let layout = self.layout_calendar(progress, canvas);
        log::debug!(
            "calendar {} ({:?}) on {}x{}: digest {}",
            progress.year,
            progress.kind,
            width,
            height,
            layout.fingerprint()
        );
        Ok(rasterize(&layout, &self.fonts)?.png_data)
    }
}

fn build_quote_source(cfg: &QuoteConfig) -> Result<Box<dyn QuoteSource>> {
    if !cfg.enabled {
        return Ok(Box::new(NoQuoteSource));
    }
    #[cfg(feature = "network")]
    let source: Box<dyn QuoteSource> = {
        let http = quote::HttpQuoteSource::new(cfg.endpoint.clone(), cfg.timeout_ms)?;
        log::debug!("fetching quotes from {}", http.endpoint());
        Box::new(http)
    };
    #[cfg(not(feature = "network"))]
    let source: Box<dyn QuoteSource> = {
        log::warn!("built without the `network` feature; quotes are disabled");
        Box::new(NoQuoteSource)
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WallpaperConfig::default();
        assert_eq!(config.canvas, Canvas::PHONE);
        assert!(config.quote.enabled);
        assert_eq!(config.quote.max_retries, 5);
        assert_eq!(config.quote.timeout_ms, 5000);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn progress_rejects_bad_values() {
        assert!(Progress::new(0, 0).is_err());
        assert!(Progress::new(-1, 10).is_err());
        assert!(Progress::new(11, 10).is_err());
        assert!(Progress::new(0, i64::from(u32::MAX) + 1).is_err());
        assert!(Progress::new(10, 10).is_ok());
        assert!(Progress::new(0, Progress::MAX_TOTAL).is_ok());
        assert!(Progress::new(0, Progress::MAX_TOTAL + 1).is_err());
    }

    #[test]
    fn percent_floors() {
        assert_eq!(Progress::new(24, 365).unwrap().percent(), 6);
        assert_eq!(Progress::new(30, 30).unwrap().label(), "100% completed");
        assert_eq!(Progress::new(0, 7).unwrap().percent(), 0);
        assert_eq!(Progress::new(2, 3).unwrap().percent(), 66);
    }

    #[test]
    fn canvas_validation() {
        assert!(Canvas::new(0, 10).validate().is_err());
        assert_eq!(Canvas::new(1, 1).validate().unwrap(), Canvas::new(1, 1));
        assert!(Canvas::new(Canvas::MAX_SIDE + 1, 10).validate().is_err());
        assert!(Canvas::new(Canvas::MAX_SIDE, Canvas::MAX_SIDE).validate().is_err());
        assert!(Canvas::new(4096, 8192).validate().is_ok());
    }

    #[test]
    fn render_linear_fails_fast_on_invalid_progress() {
        let renderer = WallpaperRenderer::with_parts(
            WallpaperConfig::default(),
            FontSource::UseDefault,
            Box::new(NoQuoteSource),
        );
        let err = renderer.render_linear(10, 11, 100, 100).unwrap_err();
        assert!(matches!(err, Error::InvalidProgress { done: 11, total: 10 }));
    }
}
