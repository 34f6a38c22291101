//! Font capability used by measurement and rasterization.
//!
//! A [`FontSource`] is resolved once at startup: either a TrueType face
//! loaded from disk, or the built-in 5x7 bitmap font when no file was given
//! or it failed to load. Layout code only ever sees the [`FontMetric`]
//! trait, so no height or width is assumed from a particular face.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};

use crate::{Error, Result};

/// Rendered bounding box of a run of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

/// Measures rendered text.
pub trait FontMetric {
    fn measure(&self, text: &str) -> TextSize;
}

/// Built-in glyph cell: 5x7 pixels plus one column and two rows of spacing.
pub const BUILTIN_CHAR_W: u32 = 6;
pub const BUILTIN_CHAR_H: u32 = 9;
const BUILTIN_GLYPH_ROWS: u32 = 7;

/// ASCII 32..=126. Each row's low 5 bits are pixels, MSB on the left.
#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 95] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // 32 ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // 33 '!'
    [0x0A,0x0A,0x0A,0x00,0x00,0x00,0x00], // 34 '"'
    [0x0A,0x0A,0x1F,0x0A,0x1F,0x0A,0x0A], // 35 '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // 36 '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // 37 '%'
    [0x0C,0x12,0x14,0x08,0x15,0x12,0x0D], // 38 '&'
    [0x04,0x04,0x08,0x00,0x00,0x00,0x00], // 39 '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // 40 '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // 41 ')'
    [0x00,0x04,0x15,0x0E,0x15,0x04,0x00], // 42 '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // 43 '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // 44 ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // 45 '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // 46 '.'
    [0x00,0x01,0x02,0x04,0x08,0x10,0x00], // 47 '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // 48 '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // 49 '1'
    [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F], // 50 '2'
    [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E], // 51 '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // 52 '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // 53 '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // 54 '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // 55 '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // 56 '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // 57 '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // 58 ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // 59 ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // 60 '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // 61 '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // 62 '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // 63 '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // 64 '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 65 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 66 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 67 'C'
    [0x1C,0x12,0x11,0x11,0x11,0x12,0x1C], // 68 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 69 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 70 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 71 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 72 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 73 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 74 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 75 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 76 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 77 'M'
    [0x11,0x11,0x19,0x15,0x13,0x11,0x11], // 78 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 79 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 80 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 81 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 82 'R'
    [0x0F,0x10,0x10,0x0E,0x01,0x01,0x1E], // 83 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 84 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 85 'U'
    [0x11,0x11,0x11,0x11,0x11,0x0A,0x04], // 86 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 87 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 88 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 89 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 90 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // 91 '['
    [0x00,0x10,0x08,0x04,0x02,0x01,0x00], // 92 '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // 93 ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // 94 '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // 95 '_'
    [0x08,0x04,0x02,0x00,0x00,0x00,0x00], // 96 '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 97 'a'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x1E], // 98 'b'
    [0x00,0x00,0x0E,0x10,0x10,0x11,0x0E], // 99 'c'
    [0x01,0x01,0x0D,0x13,0x11,0x11,0x0F], // 100 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 101 'e'
    [0x06,0x09,0x08,0x1C,0x08,0x08,0x08], // 102 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 103 'g'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x11], // 104 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 105 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 106 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 107 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 108 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x11,0x11], // 109 'm'
    [0x00,0x00,0x16,0x19,0x11,0x11,0x11], // 110 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 111 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 112 'p'
    [0x00,0x00,0x0D,0x13,0x0F,0x01,0x01], // 113 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 114 'r'
    [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E], // 115 's'
    [0x08,0x08,0x1C,0x08,0x08,0x09,0x06], // 116 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 117 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 118 'v'
    [0x00,0x00,0x11,0x11,0x15,0x15,0x0A], // 119 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 120 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 121 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 122 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // 123 '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // 124 '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // 125 '}'
    [0x00,0x00,0x08,0x15,0x02,0x00,0x00], // 126 '~'
];

/// Bitmap rows for `ch`; anything outside printable ASCII draws as '?'.
pub fn builtin_glyph(ch: char) -> &'static [u8; 7] {
    let code = ch as u32;
    let idx = if (32..=126).contains(&code) { code - 32 } else { '?' as u32 - 32 };
    &FONT_5X7[idx as usize]
}

/// A loaded face, shared read-only between requests.
#[derive(Clone)]
pub enum FontSource {
    Loaded(Arc<FontVec>),
    UseDefault,
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Loaded(_) => f.write_str("FontSource::Loaded"),
            FontSource::UseDefault => f.write_str("FontSource::UseDefault"),
        }
    }
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::UseDefault
    }
}

impl FontSource {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| Error::FontError(e.to_string()))?;
        Ok(FontSource::Loaded(Arc::new(font)))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontSource::UseDefault)
    }

    /// The face at a given pixel size.
    pub fn typeface(&self, size_px: f32) -> Typeface {
        match self {
            FontSource::Loaded(font) => Typeface::TrueType {
                font: Arc::clone(font),
                scale: PxScale::from(size_px),
            },
            FontSource::UseDefault => Typeface::Builtin {
                size_px,
                scale: builtin_scale(size_px),
            },
        }
    }
}

/// Load a TrueType/OpenType file, falling back to the built-in font when the
/// path is absent, unreadable, or not a font.
pub fn load_font(path: Option<&Path>) -> FontSource {
    let Some(path) = path else {
        return FontSource::UseDefault;
    };
    let loaded = std::fs::read(path)
        .map_err(Error::from)
        .and_then(FontSource::from_bytes);
    match loaded {
        Ok(src) => {
            log::info!("loaded font {}", path.display());
            src
        }
        Err(e) => {
            log::warn!("font {} unusable ({}); using built-in font", path.display(), e);
            FontSource::UseDefault
        }
    }
}

fn builtin_scale(size_px: f32) -> u32 {
    ((size_px / BUILTIN_CHAR_H as f32).round() as u32).max(1)
}

/// A font at a concrete size.
#[derive(Clone)]
pub enum Typeface {
    TrueType { font: Arc<FontVec>, scale: PxScale },
    Builtin { size_px: f32, scale: u32 },
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::TrueType { scale, .. } => write!(f, "Typeface::TrueType({}px)", scale.y),
            Typeface::Builtin { size_px, scale } => {
                write!(f, "Typeface::Builtin({}px, x{})", size_px, scale)
            }
        }
    }
}

impl Typeface {
    pub fn size_px(&self) -> f32 {
        match self {
            Typeface::TrueType { scale, .. } => scale.y,
            Typeface::Builtin { size_px, .. } => *size_px,
        }
    }
}

/// Lay out `text` on one line with the top of the ascender box at `(x, y)`.
pub(crate) fn position_glyphs(font: &FontVec, scale: PxScale, text: &str, x: f32, y: f32) -> Vec<Glyph> {
    let scaled = font.as_scaled(scale);
    let baseline = y + scaled.ascent();
    let mut caret = x;
    let mut prev = None;
    let mut glyphs = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, baseline)));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    glyphs
}

impl FontMetric for Typeface {
    fn measure(&self, text: &str) -> TextSize {
        match self {
            Typeface::TrueType { font, scale } => {
                let mut min_y = f32::MAX;
                let mut max_y = f32::MIN;
                let mut max_x = 0.0f32;
                for glyph in position_glyphs(font, *scale, text, 0.0, 0.0) {
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let b = outlined.px_bounds();
                        min_y = min_y.min(b.min.y);
                        max_y = max_y.max(b.max.y);
                        max_x = max_x.max(b.max.x);
                    }
                }
                if max_y < min_y {
                    return TextSize::default();
                }
                TextSize {
                    width: max_x.ceil() as u32,
                    height: (max_y - min_y).ceil() as u32,
                }
            }
            Typeface::Builtin { scale, .. } => {
                let n = text.chars().count() as u32;
                if n == 0 {
                    return TextSize::default();
                }
                TextSize {
                    width: (n * BUILTIN_CHAR_W - 1) * scale,
                    height: BUILTIN_GLYPH_ROWS * scale,
                }
            }
        }
    }
}

/// Typefaces used by one wallpaper variant.
#[derive(Debug, Clone)]
pub struct FontSet {
    /// Year header (calendar only)
    pub header: Typeface,
    pub quote: Typeface,
    pub author: Typeface,
    /// Percentage label (linear) or month names (calendar)
    pub label: Typeface,
}

impl FontSet {
    pub fn linear(source: &FontSource) -> Self {
        Self {
            header: source.typeface(100.0),
            quote: source.typeface(48.0),
            author: source.typeface(36.0),
            label: source.typeface(56.0),
        }
    }

    pub fn calendar(source: &FontSource) -> Self {
        Self {
            header: source.typeface(100.0),
            quote: source.typeface(40.0),
            author: source.typeface(32.0),
            label: source.typeface(32.0),
        }
    }
}
