//! Client for a timetable backend: fetches sections and timetables, lays them out as a weekly
//! grid, compares shared lecturers across sections, and exports the grid as PNG or PDF.

pub mod core;
pub mod error;
pub mod http;
pub mod model;
pub mod utils;

pub use error::{Result, TimetableError};
