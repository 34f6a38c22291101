//! Rendering pipeline: measure -> lay out -> compose -> rasterize

pub mod compose;
pub mod font;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

/// An encoded wallpaper image.
#[derive(Debug, Clone)]
pub struct Wallpaper {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}
