use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::nullable_string;
use crate::model::section::Section;

/// Slot index -> cell. `None` is an explicit empty slot (`null` on the wire).
pub type DaySchedule = BTreeMap<u32, Option<CellData>>;

/// Standard slot times, used when the payload leaves a slot out of `slot_times`.
pub const DEFAULT_SLOT_TIMES: [(u32, &str); 14] = [
    (1, "0800 - 0850"),
    (2, "0900 - 0950"),
    (3, "1000 - 1050"),
    (4, "1100 - 1150"),
    (5, "1200 - 1250"),
    (6, "1300 - 1400"),
    (7, "1400 - 1450"),
    (8, "1500 - 1550"),
    (9, "1600 - 1650"),
    (10, "1700 - 1750"),
    (11, "1800 - 1850"),
    (12, "1900 - 1950"),
    (13, "2000 - 2050"),
    (14, "2100 - 2150"),
];

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CellData {
    #[serde(default, deserialize_with = "nullable_string")]
    pub code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub lecturer: String,
}

impl CellData {
    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }
}

/// The five rendered weekdays, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Key used by the backend (`MON`, `TUE`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Weekday::Monday => "MON",
            Weekday::Tuesday => "TUE",
            Weekday::Wednesday => "WED",
            Weekday::Thursday => "THU",
            Weekday::Friday => "FRI",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    fn matches(self, key: &str) -> bool {
        let key = key.trim();
        key.eq_ignore_ascii_case(self.key()) || key.eq_ignore_ascii_case(self.full_name())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `GET /api/timetable/{id}` and `POST /api/upload`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Timetable {
    pub section: Section,
    #[serde(default)]
    pub time_slots: Vec<u32>,
    #[serde(default)]
    pub slot_times: BTreeMap<u32, String>,
    #[serde(default)]
    pub timetable: BTreeMap<String, DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_slot: Option<u32>,
}

impl Timetable {
    pub fn day(&self, day: Weekday) -> Option<&DaySchedule> {
        self.timetable.get(day.key()).or_else(|| {
            self.timetable
                .iter()
                .find(|(key, _)| day.matches(key))
                .map(|(_, schedule)| schedule)
        })
    }

    /// The cell at `day`/`slot`, if one is present. An empty `code` still counts as present.
    pub fn cell(&self, day: Weekday, slot: u32) -> Option<&CellData> {
        self.day(day)?.get(&slot)?.as_ref()
    }

    /// Only cells that carry a course code.
    pub fn course_at(&self, day: Weekday, slot: u32) -> Option<&CellData> {
        self.cell(day, slot).filter(|cell| cell.has_code())
    }

    pub fn slot_time(&self, slot: u32) -> Option<&str> {
        self.slot_times.get(&slot).map(String::as_str).or_else(|| {
            DEFAULT_SLOT_TIMES
                .iter()
                .find(|(index, _)| *index == slot)
                .map(|(_, time)| *time)
        })
    }
}
