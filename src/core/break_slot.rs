use crate::model::timetable::{Timetable, Weekday};

/// The slot that may hold either the lunch break or a real lecture.
pub const BREAK_SLOT: u32 = 6;

/// Codes longer than this are treated as real course codes.
const PLACEHOLDER_CODE_LEN: usize = 1;

/// Fewer filled days than this, with placeholder-length codes, still counts as classes.
const BREAK_DAY_THRESHOLD: usize = 4;

/// Outcome of inspecting [`BREAK_SLOT`] across the week.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakSlotAnalysis {
    pub has_long_codes: bool,
    pub days_with_break_data: usize,
    pub has_break_classes: bool,
}

impl BreakSlotAnalysis {
    /// Slot 6 renders as one merged "BREAK" column.
    pub fn is_break(&self) -> bool {
        !self.has_break_classes
    }
}

/// Decides whether [`BREAK_SLOT`] holds real classes or the break.
///
/// A lecture in slot 6 usually appears on a few days and has a full course code. A break that
/// the timetable spells out with single letters (`B`, `R`, `E`, `A`, `K`) shows up on most days.
/// Exactly four days of single letters is ambiguous and resolves to a break.
pub fn classify_break_slot(timetable: &Timetable, days: &[Weekday]) -> BreakSlotAnalysis {
    let mut has_long_codes = false;
    let mut days_with_break_data = 0;

    for &day in days {
        let Some(cell) = timetable.course_at(day, BREAK_SLOT) else {
            continue;
        };
        days_with_break_data += 1;
        if cell.code.chars().count() > PLACEHOLDER_CODE_LEN {
            has_long_codes = true;
        }
    }

    let has_break_classes = has_long_codes
        || (days_with_break_data > 0 && days_with_break_data < BREAK_DAY_THRESHOLD);

    let analysis = BreakSlotAnalysis {
        has_long_codes,
        days_with_break_data,
        has_break_classes,
    };
    log::debug!(
        "slot {} for section {}: {:?}",
        BREAK_SLOT,
        timetable.section,
        analysis
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timetable::CellData;
    use test_case::test_case;

    fn with_slot6(codes: &[&str]) -> Timetable {
        let mut timetable = Timetable::default();
        for (day, code) in Weekday::ALL.iter().zip(codes) {
            let cell = CellData {
                code: code.to_string(),
                name: "X".to_string(),
                ..CellData::default()
            };
            timetable
                .timetable
                .entry(day.key().to_string())
                .or_default()
                .insert(BREAK_SLOT, Some(cell));
        }
        timetable
    }

    #[test_case(&[] => true ; "no data on any day")]
    #[test_case(&["", "", "", "", ""] => true ; "empty codes everywhere")]
    #[test_case(&["B"] => false ; "one day single letter")]
    #[test_case(&["B", "R", "E"] => false ; "three days single letters")]
    #[test_case(&["B", "R", "E", "A"] => true ; "four days single letters")]
    #[test_case(&["B", "R", "E", "A", "K"] => true ; "five days single letters")]
    #[test_case(&["", "", "", "", "MATH1023"] => false ; "one long code")]
    #[test_case(&["B", "R", "E", "A", "MATH1023"] => false ; "long code beats day count")]
    #[test_case(&["AB", "AB", "AB", "AB", "AB"] => false ; "two characters is long")]
    fn decides_break(codes: &[&str]) -> bool {
        classify_break_slot(&with_slot6(codes), &Weekday::ALL).is_break()
    }

    #[test]
    fn reports_counts() {
        let analysis = classify_break_slot(&with_slot6(&["B", "", "E"]), &Weekday::ALL);
        assert_eq!(
            analysis,
            BreakSlotAnalysis {
                has_long_codes: false,
                days_with_break_data: 2,
                has_break_classes: true,
            }
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let analysis = classify_break_slot(&with_slot6(&["É", "É", "É", "É"]), &Weekday::ALL);
        assert!(!analysis.has_long_codes);
        assert!(analysis.is_break());
    }

    #[test]
    fn only_listed_days_are_inspected() {
        let timetable = with_slot6(&["B", "R", "E", "A", "K"]);
        let analysis = classify_break_slot(&timetable, &Weekday::ALL[..2]);
        assert_eq!(analysis.days_with_break_data, 2);
        assert!(analysis.has_break_classes);
    }
}
