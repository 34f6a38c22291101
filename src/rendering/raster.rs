/// Rasterizer: turns a `CanvasLayout` into RGB pixels and PNG bytes

use ab_glyph::Font;

use crate::rendering::font::{builtin_glyph, position_glyphs, FontSource, Typeface, BUILTIN_CHAR_W};
use crate::rendering::paint::{CanvasLayout, PaintCommand, Rgb};
use crate::rendering::Wallpaper;
use crate::{Canvas, Result};

/// An RGB8 pixel buffer with clipped drawing primitives.
pub struct Pixmap {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        for px in buf.chunks_exact_mut(3) {
            px.copy_from_slice(&background);
        }
        Self { width, height, buf }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.buf[idx], self.buf[idx + 1], self.buf[idx + 2]])
    }

    /// Blend `color` over the pixel at `(x, y)` with `coverage` in `0..=1`.
    fn blend(&mut self, x: i32, y: i32, color: Rgb, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let c = coverage.clamp(0.0, 1.0);
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        for (i, channel) in color.iter().enumerate() {
            let bg = self.buf[idx + i] as f32;
            self.buf[idx + i] = (bg + (*channel as f32 - bg) * c).round() as u8;
        }
    }

    fn set(&mut self, x: i32, y: i32, color: Rgb) {
        self.blend(x, y, color, 1.0);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: u32, color: Rgb) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw `text` with the top of its layout box at `(x, y)`.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, face: &Typeface, color: Rgb) {
        match face {
            Typeface::TrueType { font, scale } => {
                for glyph in position_glyphs(font, *scale, text, x as f32, y as f32) {
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
                        outlined.draw(|gx, gy, coverage| {
                            self.blend(ox + gx as i32, oy + gy as i32, color, coverage);
                        });
                    }
                }
            }
            Typeface::Builtin { scale, .. } => {
                let s = *scale as i32;
                for (i, ch) in text.chars().enumerate() {
                    let left = x + i as i32 * BUILTIN_CHAR_W as i32 * s;
                    for (row, bits) in builtin_glyph(ch).iter().enumerate() {
                        for col in 0..5i32 {
                            if bits & (0x10 >> col) != 0 {
                                self.fill_block(left + col * s, y + row as i32 * s, s, color);
                            }
                        }
                    }
                }
            }
        }
    }

    fn fill_block(&mut self, x: i32, y: i32, size: i32, color: Rgb) {
        for dy in 0..size {
            for dx in 0..size {
                self.set(x + dx, y + dy, color);
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.buf)?;
            writer.finish()?;
        }
        Ok(out)
    }
}

/// Paint every command of `layout` in order.
pub fn paint(layout: &CanvasLayout, fonts: &FontSource) -> Pixmap {
    let mut pixmap = Pixmap::new(layout.width, layout.height, layout.background);
    for cmd in &layout.commands {
        match cmd {
            PaintCommand::Circle {
                cx,
                cy,
                radius,
                state,
            } => pixmap.fill_circle(*cx, *cy, *radius, state.color()),
            PaintCommand::Text {
                x,
                y,
                text,
                size_px,
                rgb,
            } => pixmap.draw_text(*x, *y, text, &fonts.typeface(*size_px), *rgb),
        }
    }
    pixmap
}

/// Paint and encode `layout` as a PNG.
pub fn rasterize(layout: &CanvasLayout, fonts: &FontSource) -> Result<Wallpaper> {
    Canvas::new(layout.width, layout.height).validate()?;
    let png_data = paint(layout, fonts).encode_png()?;
    Ok(Wallpaper {
        width: layout.width,
        height: layout.height,
        png_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::{DotState, Palette};

    #[test]
    fn circle_is_clipped_and_filled() {
        let mut p = Pixmap::new(20, 20, Palette::BACKGROUND);
        p.fill_circle(0, 0, 5, Palette::COMPLETE);
        assert_eq!(p.pixel(0, 0), Some(Palette::COMPLETE));
        assert_eq!(p.pixel(5, 0), Some(Palette::COMPLETE));
        assert_eq!(p.pixel(5, 5), Some(Palette::BACKGROUND));
        assert_eq!(p.pixel(20, 0), None);
    }

    #[test]
    fn builtin_text_sets_pixels() {
        let mut p = Pixmap::new(40, 20, Palette::BACKGROUND);
        let face = FontSource::UseDefault.typeface(18.0);
        p.draw_text(0, 0, "I", &face, Palette::TEXT);
        // 'I' top row is 0x0E: columns 1..=3 lit, scale 2
        assert_eq!(p.pixel(2, 0), Some(Palette::TEXT));
        assert_eq!(p.pixel(0, 0), Some(Palette::BACKGROUND));
    }

    #[test]
    fn rasterize_emits_png_signature() {
        let mut layout = CanvasLayout::new(32, 16);
        layout.push(PaintCommand::Circle {
            cx: 8,
            cy: 8,
            radius: 4,
            state: DotState::Complete,
        });
        let w = rasterize(&layout, &FontSource::UseDefault).unwrap();
        assert_eq!((w.width, w.height), (32, 16));
        assert_eq!(&w.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rasterize_rejects_empty_canvas() {
        let layout = CanvasLayout::new(0, 16);
        assert!(rasterize(&layout, &FontSource::UseDefault).is_err());
    }
}
