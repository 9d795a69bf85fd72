use serde::{Deserialize, Serialize};

use crate::model::section::Section;

/// One course of the selected section, with the other sections taught by the same lecturer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CourseEntry {
    pub course_name: String,
    pub lecturer_name: String,
    #[serde(default)]
    pub shared_sections: Vec<Section>,
}

/// `GET /api/shared-lecturers/{id}`
#[derive(Serialize, Deserialize, Debug)]
pub struct SharedLecturersResponse {
    #[serde(default)]
    pub section: Option<Section>,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
}
