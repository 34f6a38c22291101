/// Dot grid geometry for the linear and calendar wallpapers.
///
/// Everything in this module is a pure function of its arguments: the same
/// inputs always produce the same geometry and the same dot states.

use crate::calendar::{days_in_month, MONTH_NAMES};
use crate::rendering::paint::DotState;

pub const LINEAR_DOT_RADIUS: u32 = 10;
pub const LINEAR_SPACING: u32 = LINEAR_DOT_RADIUS * 3;

pub const CALENDAR_DOT_RADIUS: u32 = 8;
pub const CALENDAR_SPACING: u32 = 28;
pub const DAYS_PER_ROW: u32 = 7;
/// Every month block reserves six week rows so blocks line up.
pub const MONTH_SLOT_ROWS: u32 = 6;
/// Space at the top of a month block for its name.
pub const MONTH_LABEL_HEIGHT: u32 = 40;
pub const MONTH_BLOCK_WIDTH: u32 = DAYS_PER_ROW * CALENDAR_SPACING;
pub const MONTH_BLOCK_HEIGHT: u32 = MONTH_SLOT_ROWS * CALENDAR_SPACING + MONTH_LABEL_HEIGHT;
pub const MONTH_COLS: u32 = 3;
pub const MONTH_ROWS: u32 = 4;
pub const MONTH_COL_GAP: u32 = 60;
pub const MONTH_ROW_GAP: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DotGridGeometry {
    pub dots_per_row: u32,
    pub rows: u32,
    pub dot_radius: u32,
    pub spacing: u32,
    pub grid_width: u32,
    pub grid_height: u32,
}

impl DotGridGeometry {
    fn new(count: u32, dots_per_row: u32, dot_radius: u32, spacing: u32) -> Self {
        let rows = count.div_ceil(dots_per_row);
        Self {
            dots_per_row,
            rows,
            dot_radius,
            spacing,
            grid_width: dots_per_row.saturating_mul(spacing),
            grid_height: rows.saturating_mul(spacing),
        }
    }

    /// `(col, row)` of dot `i` in row-major order.
    pub fn cell(&self, i: u32) -> (u32, u32) {
        (i % self.dots_per_row, i / self.dots_per_row)
    }
}

/// A positioned dot, `(x, y)` being its centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dot {
    pub x: i32,
    pub y: i32,
    pub state: DotState,
}

/// Columns widen as the total grows so the grid stays roughly square-ish on
/// a portrait canvas.
pub fn linear_dots_per_row(total: u32) -> u32 {
    if total <= 40 {
        5
    } else if total <= 100 {
        10
    } else {
        20
    }
}

pub fn layout_linear_grid(total: u32) -> DotGridGeometry {
    DotGridGeometry::new(
        total,
        linear_dots_per_row(total),
        LINEAR_DOT_RADIUS,
        LINEAR_SPACING,
    )
}

/// Place `total` dots with the first dot centred on `(start_x, start_y)`.
/// Dots with index `< done` are complete.
pub fn place_linear_dots(
    geometry: &DotGridGeometry,
    total: u32,
    done: u32,
    start_x: i32,
    start_y: i32,
) -> Vec<Dot> {
    let spacing = geometry.spacing as i32;
    (0..total)
        .map(|i| {
            let (col, row) = geometry.cell(i);
            Dot {
                x: start_x + col as i32 * spacing,
                y: start_y + row as i32 * spacing,
                state: if i < done {
                    DotState::Complete
                } else {
                    DotState::Incomplete
                },
            }
        })
        .collect()
}

/// One month's cluster of day dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBlock {
    /// 1-based month number
    pub month: u32,
    pub label: &'static str,
    pub days: u32,
    /// Year-global 1-based index of this month's first day
    pub first_day: u32,
    pub geometry: DotGridGeometry,
    /// Top-left of the block relative to the calendar grid origin
    pub offset_x: u32,
    pub offset_y: u32,
}

impl MonthBlock {
    /// Day dots for this block, given the grid origin. Day dots sit in
    /// `spacing`-sized cells below the label strip, centred in each cell.
    pub fn dots(&self, origin_x: i32, origin_y: i32, days_elapsed: u32) -> Vec<Dot> {
        let g = &self.geometry;
        let spacing = g.spacing as i32;
        let half = spacing / 2;
        let left = origin_x + self.offset_x as i32;
        let top = origin_y + self.offset_y as i32 + MONTH_LABEL_HEIGHT as i32;
        (0..self.days)
            .map(|d| {
                let (col, row) = g.cell(d);
                let global = self.first_day + d;
                Dot {
                    x: left + col as i32 * spacing + half,
                    y: top + row as i32 * spacing + half,
                    state: if global <= days_elapsed {
                        DotState::Complete
                    } else {
                        DotState::Incomplete
                    },
                }
            })
            .collect()
    }
}

/// The 3x4 arrangement of month blocks for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub year: i32,
    pub days_elapsed: u32,
    pub months: Vec<MonthBlock>,
    pub width: u32,
    pub height: u32,
}

impl CalendarGrid {
    pub fn total_days(&self) -> u32 {
        self.months.iter().map(|m| m.days).sum()
    }

    /// All day dots, January through December.
    pub fn dots(&self, origin_x: i32, origin_y: i32) -> Vec<Dot> {
        self.months
            .iter()
            .flat_map(|m| m.dots(origin_x, origin_y, self.days_elapsed))
            .collect()
    }
}

pub fn layout_calendar_grid(year: i32, days_elapsed: u32) -> CalendarGrid {
    let months = (1..=12u32)
        .scan(0u32, |days_before, month| {
            let days = days_in_month(year, month);
            let first_day = *days_before + 1;
            *days_before += days;
            let idx = month - 1;
            let (block_col, block_row) = (idx % MONTH_COLS, idx / MONTH_COLS);
            Some(MonthBlock {
                month,
                label: MONTH_NAMES[idx as usize],
                days,
                first_day,
                geometry: DotGridGeometry::new(
                    days,
                    DAYS_PER_ROW,
                    CALENDAR_DOT_RADIUS,
                    CALENDAR_SPACING,
                ),
                offset_x: block_col * (MONTH_BLOCK_WIDTH + MONTH_COL_GAP),
                offset_y: block_row * (MONTH_BLOCK_HEIGHT + MONTH_ROW_GAP),
            })
        })
        .collect();

    CalendarGrid {
        year,
        days_elapsed,
        months,
        width: MONTH_COLS * MONTH_BLOCK_WIDTH + (MONTH_COLS - 1) * MONTH_COL_GAP,
        height: MONTH_ROWS * MONTH_BLOCK_HEIGHT + (MONTH_ROWS - 1) * MONTH_ROW_GAP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dots_per_row_thresholds() {
        for total in 1..=40 {
            assert_eq!(layout_linear_grid(total).dots_per_row, 5, "total {}", total);
        }
        for total in 41..=100 {
            assert_eq!(layout_linear_grid(total).dots_per_row, 10, "total {}", total);
        }
        for total in [101, 365, 1000, 4000] {
            assert_eq!(layout_linear_grid(total).dots_per_row, 20, "total {}", total);
        }
    }

    #[test]
    fn linear_geometry_for_a_year() {
        let g = layout_linear_grid(365);
        assert_eq!((g.dots_per_row, g.rows), (20, 19));
        assert_eq!((g.grid_width, g.grid_height), (600, 570));
        assert_eq!((g.dot_radius, g.spacing), (10, 30));
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let g = layout_linear_grid(u32::MAX);
        assert_eq!(g.grid_height, u32::MAX);
        assert_eq!(g.grid_width, 600);
    }

    #[test]
    fn linear_dots_color_first_done_and_never_overlap() {
        for (total, done) in [(1, 0), (1, 1), (30, 17), (365, 24), (100, 100)] {
            let g = layout_linear_grid(total);
            let dots = place_linear_dots(&g, total, done, 0, 0);
            assert_eq!(dots.len(), total as usize);
            let complete = dots.iter().filter(|d| d.state == DotState::Complete).count();
            assert_eq!(complete, done as usize);
            assert!(dots[..done as usize].iter().all(|d| d.state == DotState::Complete));
            let unique: HashSet<(i32, i32)> = dots.iter().map(|d| (d.x, d.y)).collect();
            assert_eq!(unique.len(), total as usize);
        }
    }

    #[test]
    fn linear_dot_positions_are_row_major() {
        let g = layout_linear_grid(12);
        let dots = place_linear_dots(&g, 12, 0, 100, 200);
        assert_eq!((dots[0].x, dots[0].y), (100, 200));
        assert_eq!((dots[4].x, dots[4].y), (220, 200));
        assert_eq!((dots[5].x, dots[5].y), (100, 230));
    }

    #[test]
    fn calendar_totals_follow_leap_years() {
        assert_eq!(layout_calendar_grid(2023, 0).total_days(), 365);
        assert_eq!(layout_calendar_grid(2024, 0).total_days(), 366);
        assert_eq!(layout_calendar_grid(2024, 0).dots(0, 0).len(), 366);
    }

    #[test]
    fn february_2024_is_five_rows() {
        let grid = layout_calendar_grid(2024, 0);
        let feb = &grid.months[1];
        assert_eq!(feb.label, "Feb");
        assert_eq!(feb.days, 29);
        assert_eq!(feb.first_day, 32);
        assert_eq!((feb.geometry.dots_per_row, feb.geometry.rows), (7, 5));
        let dots = feb.dots(0, 0, 0);
        let last_row_y = dots[28].y;
        assert_eq!(dots.iter().filter(|d| d.y == last_row_y).count(), 1);
    }

    #[test]
    fn calendar_blocks_form_three_by_four() {
        let grid = layout_calendar_grid(2023, 0);
        assert_eq!((grid.width, grid.height), (708, 1072));
        let april = &grid.months[3];
        assert_eq!((april.offset_x, april.offset_y), (0, 288));
        let dec = &grid.months[11];
        assert_eq!((dec.offset_x, dec.offset_y), (512, 864));
    }

    #[test]
    fn calendar_marks_days_through_elapsed() {
        let grid = layout_calendar_grid(2023, 40);
        let dots = grid.dots(0, 0);
        let complete = dots.iter().filter(|d| d.state == DotState::Complete).count();
        assert_eq!(complete, 40);
        assert_eq!(dots[39].state, DotState::Complete);
        assert_eq!(dots[40].state, DotState::Incomplete);
    }

    #[test]
    fn layouts_are_pure() {
        assert_eq!(layout_linear_grid(365), layout_linear_grid(365));
        assert_eq!(layout_calendar_grid(2024, 100), layout_calendar_grid(2024, 100));
    }
}
