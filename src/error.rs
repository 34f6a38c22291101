//! Error types for the wallpaper renderer

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a wallpaper
#[derive(Error, Debug)]
pub enum Error {
    /// Progress values violate `0 <= done <= total` or `total > 0`
    #[error("Invalid progress: done={done}, total={total} (need 0 <= done <= total, total > 0)")]
    InvalidProgress { done: i64, total: i64 },

    /// Canvas has a zero dimension or exceeds the size limits
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// Year outside the range chrono can represent
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Font file could not be parsed
    #[error("Font error: {0}")]
    FontError(String),

    /// Failed to rasterize or encode the image
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to set up a network client
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::RenderError(err.to_string())
    }
}
