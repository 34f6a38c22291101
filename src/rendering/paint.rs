/// Paint command set: the resolved draw list handed to the rasterizer

use sha2::{Digest, Sha256};

pub type Rgb = [u8; 3];

/// Fixed wallpaper palette.
pub struct Palette;

impl Palette {
    pub const BACKGROUND: Rgb = [0, 0, 0];
    pub const COMPLETE: Rgb = [255, 165, 0];
    pub const INCOMPLETE: Rgb = [120, 120, 120];
    pub const TEXT: Rgb = [200, 200, 200];
    pub const MUTED: Rgb = [120, 120, 120];
}

/// Whether a dot's unit has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotState {
    Complete,
    Incomplete,
}

impl DotState {
    pub fn color(self) -> Rgb {
        match self {
            DotState::Complete => Palette::COMPLETE,
            DotState::Incomplete => Palette::INCOMPLETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Filled circle centred on `(cx, cy)`
    Circle {
        cx: i32,
        cy: i32,
        radius: u32,
        state: DotState,
    },
    /// Text whose bounding box starts at `(x, y)`, drawn at `size_px`
    Text {
        x: i32,
        y: i32,
        text: String,
        size_px: f32,
        rgb: Rgb,
    },
}

/// A fully resolved composition. Built once per render and consumed by the
/// rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub commands: Vec<PaintCommand>,
}

impl CanvasLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Palette::BACKGROUND,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    /// Circle commands as `(cx, cy, state)` in draw order.
    pub fn dots(&self) -> impl Iterator<Item = (i32, i32, DotState)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            PaintCommand::Circle { cx, cy, state, .. } => Some((*cx, *cy, *state)),
            _ => None,
        })
    }

    /// Text commands as `(x, y, text)` in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (i32, i32, &str)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            PaintCommand::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
    }

    pub fn count_dots(&self, state: DotState) -> usize {
        self.dots().filter(|(_, _, s)| *s == state).count()
    }

    /// Content digest of the draw list, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.background);
        for cmd in &self.commands {
            match cmd {
                PaintCommand::Circle {
                    cx,
                    cy,
                    radius,
                    state,
                } => {
                    hasher.update([0u8]);
                    hasher.update(cx.to_le_bytes());
                    hasher.update(cy.to_le_bytes());
                    hasher.update(radius.to_le_bytes());
                    hasher.update(state.color());
                }
                PaintCommand::Text {
                    x,
                    y,
                    text,
                    size_px,
                    rgb,
                } => {
                    hasher.update([1u8]);
                    hasher.update(x.to_le_bytes());
                    hasher.update(y.to_le_bytes());
                    hasher.update(size_px.to_bits().to_le_bytes());
                    hasher.update(rgb);
                    hasher.update(text.as_bytes());
                }
            }
        }
        hex::encode(hasher.finalize())
    }
}
