pub mod api_error;
pub mod course_entry;
pub mod section;
pub mod timetable;

use serde::{Deserialize, Deserializer};

/// Treats `null` like a missing string field.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
