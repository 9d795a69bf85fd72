use crate::core::break_slot::{BREAK_SLOT, BreakSlotAnalysis, classify_break_slot};
use crate::core::palette::{ColorAssigner, Rgb};
use crate::model::section::Section;
use crate::model::timetable::{CellData, Timetable, Weekday};

pub const BREAK_LABEL: &str = "BREAK";

#[derive(Clone, Debug, PartialEq)]
pub struct SlotHeader {
    pub slot: u32,
    pub label: String,
    pub is_break: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GridCell {
    Course { cell: CellData, color: Rgb },
    Empty,
    /// Merged break placeholder, emitted on the first day only.
    Break { rowspan: usize },
    /// Position taken by a break span from an earlier row.
    Covered,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    pub day: Weekday,
    pub cells: Vec<GridCell>,
}

/// A timetable laid out as days x slots, ready for the HTML and raster renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub section: Section,
    pub headers: Vec<SlotHeader>,
    pub rows: Vec<GridRow>,
    pub break_slot: BreakSlotAnalysis,
}

impl GridLayout {
    /// Lays out the five weekdays with a fresh color assignment.
    pub fn build(timetable: &Timetable) -> Self {
        let mut colors = ColorAssigner::new();
        Self::build_with(timetable, &Weekday::ALL, &mut colors)
    }

    pub fn build_with(timetable: &Timetable, days: &[Weekday], colors: &mut ColorAssigner) -> Self {
        let break_slot = classify_break_slot(timetable, days);
        let merge_break = break_slot.is_break();

        let headers = timetable
            .time_slots
            .iter()
            .map(|&slot| {
                let is_break = merge_break && slot == BREAK_SLOT;
                let label = if is_break {
                    BREAK_LABEL.to_string()
                } else {
                    timetable
                        .slot_time(slot)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Slot {}", slot))
                };
                SlotHeader {
                    slot,
                    label,
                    is_break,
                }
            })
            .collect::<Vec<_>>();

        let rows = days
            .iter()
            .enumerate()
            .map(|(day_index, &day)| {
                let cells = headers
                    .iter()
                    .map(|header| {
                        if header.is_break {
                            return if day_index == 0 {
                                GridCell::Break {
                                    rowspan: days.len(),
                                }
                            } else {
                                GridCell::Covered
                            };
                        }
                        match timetable.course_at(day, header.slot) {
                            Some(cell) => GridCell::Course {
                                color: colors.color_for(&cell.code),
                                cell: cell.clone(),
                            },
                            None => GridCell::Empty,
                        }
                    })
                    .collect();
                GridRow { day, cells }
            })
            .collect();

        GridLayout {
            section: timetable.section.clone(),
            headers,
            rows,
            break_slot,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}
