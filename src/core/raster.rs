//! Draws a [`GridLayout`] onto an RGBA canvas, the same way the HTML table looks on screen.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

use crate::core::grid::{BREAK_LABEL, GridCell, GridLayout};
use crate::core::palette::Rgb;
use crate::error::{Result, TimetableError};

const MARGIN: u32 = 16;
const DAY_COLUMN_WIDTH: u32 = 72;
const SLOT_COLUMN_WIDTH: u32 = 136;
const HEADER_HEIGHT: u32 = 32;
const ROW_HEIGHT: u32 = 64;
const CELL_PADDING: u32 = 6;
const GLYPH_SIZE: u32 = 8;
const LINE_HEIGHT: u32 = 12;

const PAGE_BACKGROUND: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
const HEADER_BACKGROUND: Rgb = Rgb::new(0x2D, 0x37, 0x48);
const HEADER_TEXT: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
const DAY_BACKGROUND: Rgb = Rgb::new(0xED, 0xF2, 0xF7);
const BREAK_BACKGROUND: Rgb = Rgb::new(0xED, 0xF2, 0xF7);
const GRID_LINE: Rgb = Rgb::new(0xCB, 0xD5, 0xE0);
const BODY_TEXT: Rgb = Rgb::new(0x1A, 0x20, 0x2C);

/// Canvas size for a layout, margins included.
pub fn canvas_size(layout: &GridLayout) -> (u32, u32) {
    let columns = u32::try_from(layout.slot_count()).unwrap_or(u32::MAX);
    let rows = u32::try_from(layout.rows.len()).unwrap_or(u32::MAX);
    (
        MARGIN * 2 + DAY_COLUMN_WIDTH + columns.saturating_mul(SLOT_COLUMN_WIDTH),
        MARGIN * 2 + HEADER_HEIGHT + rows.saturating_mul(ROW_HEIGHT),
    )
}

/// Rasterizes the table region. Fails on a layout without slots or days.
pub fn rasterize(layout: &GridLayout) -> Result<RgbaImage> {
    if layout.is_empty() {
        return Err(TimetableError::EmptyGrid);
    }
    let (width, height) = canvas_size(layout);
    let mut canvas = RgbaImage::from_pixel(width, height, pixel(PAGE_BACKGROUND));

    fill_rect(&mut canvas, MARGIN, MARGIN, DAY_COLUMN_WIDTH, HEADER_HEIGHT, HEADER_BACKGROUND);
    stroke_rect(&mut canvas, MARGIN, MARGIN, DAY_COLUMN_WIDTH, HEADER_HEIGHT, GRID_LINE);
    draw_text(
        &mut canvas,
        MARGIN + CELL_PADDING,
        MARGIN + 12,
        "DAY",
        HEADER_TEXT,
        DAY_COLUMN_WIDTH,
    );

    for (column, header) in layout.headers.iter().enumerate() {
        let x = column_x(column);
        fill_rect(&mut canvas, x, MARGIN, SLOT_COLUMN_WIDTH, HEADER_HEIGHT, HEADER_BACKGROUND);
        stroke_rect(&mut canvas, x, MARGIN, SLOT_COLUMN_WIDTH, HEADER_HEIGHT, GRID_LINE);
        draw_text(
            &mut canvas,
            x + CELL_PADDING,
            MARGIN + 12,
            &header.label,
            HEADER_TEXT,
            SLOT_COLUMN_WIDTH,
        );
    }

    for (row_index, row) in layout.rows.iter().enumerate() {
        let y = row_y(row_index);
        fill_rect(&mut canvas, MARGIN, y, DAY_COLUMN_WIDTH, ROW_HEIGHT, DAY_BACKGROUND);
        stroke_rect(&mut canvas, MARGIN, y, DAY_COLUMN_WIDTH, ROW_HEIGHT, GRID_LINE);
        draw_text(
            &mut canvas,
            MARGIN + CELL_PADDING,
            y + (ROW_HEIGHT - GLYPH_SIZE) / 2,
            row.day.key(),
            BODY_TEXT,
            DAY_COLUMN_WIDTH,
        );

        for (column, cell) in row.cells.iter().enumerate() {
            draw_cell(&mut canvas, column_x(column), y, cell);
        }
    }

    Ok(canvas)
}

fn column_x(column: usize) -> u32 {
    let column = u32::try_from(column).unwrap_or(u32::MAX);
    MARGIN + DAY_COLUMN_WIDTH + column.saturating_mul(SLOT_COLUMN_WIDTH)
}

fn row_y(row: usize) -> u32 {
    let row = u32::try_from(row).unwrap_or(u32::MAX);
    MARGIN + HEADER_HEIGHT + row.saturating_mul(ROW_HEIGHT)
}

fn draw_cell(canvas: &mut RgbaImage, x: u32, y: u32, cell: &GridCell) {
    match cell {
        GridCell::Course { cell, color } => {
            fill_rect(canvas, x, y, SLOT_COLUMN_WIDTH, ROW_HEIGHT, *color);
            stroke_rect(canvas, x, y, SLOT_COLUMN_WIDTH, ROW_HEIGHT, GRID_LINE);
            let lines = [&cell.name, &cell.code, &cell.location, &cell.lecturer];
            for (line, text) in (0u32..).zip(lines) {
                draw_text(
                    canvas,
                    x + CELL_PADDING,
                    y + CELL_PADDING + line * LINE_HEIGHT,
                    text,
                    BODY_TEXT,
                    SLOT_COLUMN_WIDTH,
                );
            }
        }
        GridCell::Empty => {
            stroke_rect(canvas, x, y, SLOT_COLUMN_WIDTH, ROW_HEIGHT, GRID_LINE);
        }
        GridCell::Break { rowspan } => {
            let span = u32::try_from(*rowspan).unwrap_or(1).max(1);
            let height = ROW_HEIGHT * span;
            fill_rect(canvas, x, y, SLOT_COLUMN_WIDTH, height, BREAK_BACKGROUND);
            stroke_rect(canvas, x, y, SLOT_COLUMN_WIDTH, height, GRID_LINE);

            let letters = u32::try_from(BREAK_LABEL.len()).unwrap_or(0);
            let text_height = letters * LINE_HEIGHT;
            let top = y + height.saturating_sub(text_height) / 2;
            let left = x + (SLOT_COLUMN_WIDTH - GLYPH_SIZE) / 2;
            for (index, letter) in (0u32..).zip(BREAK_LABEL.chars()) {
                draw_glyph(canvas, left, top + index * LINE_HEIGHT, letter, BODY_TEXT);
            }
        }
        GridCell::Covered => {}
    }
}

fn pixel(color: Rgb) -> Rgba<u8> {
    Rgba(color.to_rgba())
}

fn put(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgb) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, pixel(color));
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
    for py in y..y.saturating_add(height) {
        for px in x..x.saturating_add(width) {
            put(canvas, px, py, color);
        }
    }
}

fn stroke_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
    if width == 0 || height == 0 {
        return;
    }
    let right = x + width - 1;
    let bottom = y + height - 1;
    for px in x..=right {
        put(canvas, px, y, color);
        put(canvas, px, bottom, color);
    }
    for py in y..=bottom {
        put(canvas, x, py, color);
        put(canvas, right, py, color);
    }
}

/// Cuts `text` down to what fits in `max_chars` glyphs, marking the cut with "..".
fn fit_text(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut fitted: String = text.chars().take(keep).collect();
    fitted.push_str("..");
    fitted
}

fn draw_text(canvas: &mut RgbaImage, x: u32, y: u32, text: &str, color: Rgb, column_width: u32) {
    let max_chars = (column_width.saturating_sub(CELL_PADDING * 2) / GLYPH_SIZE) as usize;
    for (index, c) in (0u32..).zip(fit_text(text, max_chars).chars()) {
        draw_glyph(canvas, x + index * GLYPH_SIZE, y, c, color);
    }
}

fn draw_glyph(canvas: &mut RgbaImage, x: u32, y: u32, c: char, color: Rgb) {
    let Some(glyph) = BASIC_FONTS.get(c).or_else(|| BASIC_FONTS.get('?')) else {
        return;
    };
    for (dy, bits) in (0u32..).zip(glyph) {
        for dx in 0..GLYPH_SIZE {
            if bits & (1 << dx) != 0 {
                put(canvas, x + dx, y + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::COURSE_PALETTE;
    use crate::model::timetable::{CellData, Timetable, Weekday};
    use pretty_assertions::assert_eq;

    fn layout(slot6: &str) -> GridLayout {
        let mut timetable = Timetable {
            time_slots: vec![1, 2, 6],
            ..Timetable::default()
        };
        for day in Weekday::ALL {
            let schedule = timetable.timetable.entry(day.key().to_string()).or_default();
            schedule.insert(
                6,
                Some(CellData {
                    code: slot6.to_string(),
                    ..CellData::default()
                }),
            );
        }
        timetable.timetable.get_mut("MON").unwrap().insert(
            1,
            Some(CellData {
                code: "CS101".to_string(),
                name: "A VERY LONG COURSE NAME INDEED".to_string(),
                location: "LAB 1".to_string(),
                lecturer: "DR X".to_string(),
            }),
        );
        GridLayout::build(&timetable)
    }

    #[test]
    fn canvas_matches_layout() {
        let image = rasterize(&layout("B")).unwrap();
        assert_eq!(
            (image.width(), image.height()),
            (16 * 2 + 72 + 3 * 136, 16 * 2 + 32 + 5 * 64)
        );
    }

    #[test]
    fn course_cell_is_filled_with_its_color() {
        let image = rasterize(&layout("B")).unwrap();
        // bottom-right corner of Monday / slot 1, clear of text and borders
        let x = column_x(0) + SLOT_COLUMN_WIDTH - 3;
        let y = row_y(0) + ROW_HEIGHT - 3;
        assert_eq!(image.get_pixel(x, y).0, COURSE_PALETTE[0].to_rgba());
    }

    #[test]
    fn break_column_is_one_block() {
        let image = rasterize(&layout("B")).unwrap();
        let x = column_x(2) + 3;
        // the boundary between Monday and Tuesday is not drawn inside a merged break
        let y = row_y(1);
        assert_eq!(image.get_pixel(x, y).0, BREAK_BACKGROUND.to_rgba());
    }

    #[test]
    fn empty_layout_is_an_error() {
        let mut empty = layout("B");
        empty.headers.clear();
        assert!(matches!(rasterize(&empty), Err(TimetableError::EmptyGrid)));
    }

    #[test]
    fn long_text_is_cut() {
        assert_eq!(fit_text("ABCDEFGHIJ", 6), "ABCD..");
        assert_eq!(fit_text("ABC", 6), "ABC");
    }
}
