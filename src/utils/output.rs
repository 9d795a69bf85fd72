use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::model::section::Section;

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid file name pattern"));

/// `section` reduced to characters that are safe in a file name.
pub fn sanitize_section(section: &Section) -> String {
    let section = section.to_string();
    let cleaned = UNSAFE_FILE_CHARS.replace_all(&section, "-");
    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "custom".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `timetable-section-<section>-<YYYYMMDD-HHMMSS>.<extension>`
pub fn export_file_name(section: &Section, extension: &str, now: DateTime<Local>) -> String {
    format!(
        "timetable-section-{}-{}.{}",
        sanitize_section(section),
        now.format("%Y%m%d-%H%M%S"),
        extension
    )
}

/// Where an export goes: `explicit` if given, otherwise a generated name under `output_dir`.
pub fn export_path(
    explicit: Option<&Path>,
    output_dir: &Path,
    section: &Section,
    extension: &str,
) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => output_dir.join(export_file_name(section, extension, Local::now())),
    }
}
