/// Composition of grid, quote block and labels onto a canvas.
///
/// The grid is always anchored first and independently of the quote; the
/// quote block is then hung above it. Removing the quote never moves a dot.

use crate::rendering::font::{FontMetric, FontSet, Typeface};
use crate::rendering::layout::{layout_calendar_grid, layout_linear_grid, place_linear_dots, Dot};
use crate::rendering::paint::{CanvasLayout, PaintCommand, Palette, Rgb};
use crate::rendering::text::{WrappedTextBlock, BLOCK_GAP, LINE_GAP};
use crate::{CalendarProgress, Canvas, Progress};

/// Linear grid centre, as a fraction of canvas height.
pub const LINEAR_GRID_CENTER: f64 = 0.6;
pub const LINEAR_QUOTE_GAP: i32 = 80;

pub const CALENDAR_HEADER_Y: i32 = 150;
/// Downward shift of the month grid to clear the year header.
pub const CALENDAR_GRID_BIAS: i32 = 100;
pub const CALENDAR_QUOTE_GAP: i32 = 50;

/// Left edge that centres `inner` within `outer`, flooring like integer
/// division on negatives.
pub fn centered(outer: u32, inner: u32) -> i32 {
    (outer as i32 - inner as i32).div_euclid(2)
}

fn push_text(layout: &mut CanvasLayout, x: i32, y: i32, text: &str, face: &Typeface, rgb: Rgb) {
    layout.push(PaintCommand::Text {
        x,
        y,
        text: text.to_string(),
        size_px: face.size_px(),
        rgb,
    });
}

fn push_centered_text(layout: &mut CanvasLayout, y: i32, text: &str, face: &Typeface, rgb: Rgb) {
    let size = face.measure(text);
    let x = centered(layout.width, size.width);
    push_text(layout, x, y, text, face, rgb);
}

fn push_dots(layout: &mut CanvasLayout, dots: Vec<Dot>, radius: u32) {
    for dot in dots {
        layout.push(PaintCommand::Circle {
            cx: dot.x,
            cy: dot.y,
            radius,
            state: dot.state,
        });
    }
}

/// Draw a measured quote block with its top edge at `top`.
fn push_quote_block(layout: &mut CanvasLayout, block: &WrappedTextBlock, top: i32, fonts: &FontSet) {
    let width = layout.width;
    let mut y = top;
    for line in &block.lines {
        push_text(
            layout,
            centered(width, line.size.width),
            y,
            &line.text,
            &fonts.quote,
            Palette::TEXT,
        );
        y += (line.size.height + LINE_GAP) as i32;
    }
    y += BLOCK_GAP as i32;
    let attribution = &block.attribution;
    push_text(
        layout,
        centered(width, attribution.size.width),
        y,
        &attribution.text,
        &fonts.author,
        Palette::MUTED,
    );
}

/// Linear wallpaper: quote, dot grid at 60% height, percentage label below.
pub fn compose_linear(
    canvas: Canvas,
    progress: Progress,
    quote: Option<&WrappedTextBlock>,
    fonts: &FontSet,
) -> CanvasLayout {
    let mut layout = CanvasLayout::new(canvas.width, canvas.height);
    let grid = layout_linear_grid(progress.total());

    let grid_center_y = (canvas.height as f64 * LINEAR_GRID_CENTER) as i32;
    let start_y = grid_center_y - (grid.grid_height / 2) as i32;
    let start_x = centered(canvas.width, grid.grid_width);

    if let Some(block) = quote {
        let top = start_y - block.total_height as i32 - LINEAR_QUOTE_GAP;
        push_quote_block(&mut layout, block, top, fonts);
    }

    let dots = place_linear_dots(&grid, progress.total(), progress.done(), start_x, start_y);
    push_dots(&mut layout, dots, grid.dot_radius);

    let label = progress.label();
    let label_size = fonts.label.measure(&label);
    let dots_bottom = start_y + grid.grid_height as i32;
    let free_below = canvas.height as i32 - dots_bottom;
    let label_y = dots_bottom + (free_below - label_size.height as i32).div_euclid(2);
    push_centered_text(&mut layout, label_y, &label, &fonts.label, Palette::TEXT);

    layout
}

/// Calendar wallpaper: year header, quote, 3x4 month grid.
pub fn compose_calendar(
    canvas: Canvas,
    progress: CalendarProgress,
    quote: Option<&WrappedTextBlock>,
    fonts: &FontSet,
) -> CanvasLayout {
    let mut layout = CanvasLayout::new(canvas.width, canvas.height);
    let grid = layout_calendar_grid(progress.year, progress.days_elapsed());

    push_centered_text(
        &mut layout,
        CALENDAR_HEADER_Y,
        &progress.year.to_string(),
        &fonts.header,
        Palette::TEXT,
    );

    let origin_x = centered(canvas.width, grid.width);
    let origin_y = centered(canvas.height, grid.height) + CALENDAR_GRID_BIAS;

    if let Some(block) = quote {
        let top = origin_y - block.total_height as i32 - CALENDAR_QUOTE_GAP;
        push_quote_block(&mut layout, block, top, fonts);
    }

    for month in &grid.months {
        push_text(
            &mut layout,
            origin_x + month.offset_x as i32,
            origin_y + month.offset_y as i32,
            month.label,
            &fonts.label,
            Palette::MUTED,
        );
        push_dots(
            &mut layout,
            month.dots(origin_x, origin_y, grid.days_elapsed),
            month.geometry.dot_radius,
        );
    }

    layout
}
