pub mod timetable;

pub use timetable::{Result, TimetableError};
