use std::fmt::Write;

use crate::model::course_entry::CourseEntry;
use crate::model::section::Section;

pub const NO_COURSES_MESSAGE: &str = "No courses found for this section.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComparisonSummary {
    pub total_courses: usize,
    /// Sum of every course's shared-section count.
    pub total_shared: usize,
}

impl ComparisonSummary {
    pub fn from_courses(courses: &[CourseEntry]) -> Self {
        ComparisonSummary {
            total_courses: courses.len(),
            total_shared: courses.iter().map(|c| c.shared_sections.len()).sum(),
        }
    }
}

/// What the comparison view shows: either cards or an inline message.
#[derive(Clone, Debug, PartialEq)]
pub enum ComparisonView {
    Loaded {
        section: Section,
        courses: Vec<CourseEntry>,
        summary: ComparisonSummary,
    },
    Message(String),
}

impl ComparisonView {
    pub fn new(section: Section, courses: Vec<CourseEntry>) -> Self {
        if courses.is_empty() {
            return ComparisonView::Message(NO_COURSES_MESSAGE.to_string());
        }
        let summary = ComparisonSummary::from_courses(&courses);
        ComparisonView::Loaded {
            section,
            courses,
            summary,
        }
    }

    pub fn summary(&self) -> Option<ComparisonSummary> {
        match self {
            ComparisonView::Loaded { summary, .. } => Some(*summary),
            ComparisonView::Message(_) => None,
        }
    }

    /// Terminal rendering of the cards.
    pub fn render_text(&self) -> String {
        let (section, courses, summary) = match self {
            ComparisonView::Message(message) => return format!("{}\n", message),
            ComparisonView::Loaded {
                section,
                courses,
                summary,
            } => (section, courses, summary),
        };

        let mut out = String::new();
        let _ = writeln!(out, "Section {}", section);
        let _ = writeln!(
            out,
            "Courses: {}    Shared sections: {}",
            summary.total_courses, summary.total_shared
        );
        for course in courses {
            let _ = writeln!(out);
            let _ = writeln!(out, "  {}", course.course_name);
            let _ = writeln!(out, "    Lecturer: {}", course.lecturer_name);
            if course.shared_sections.is_empty() {
                let _ = writeln!(out, "    Not shared with other sections");
            } else {
                let badges = course
                    .shared_sections
                    .iter()
                    .map(|s| format!("[Section {}]", s))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(out, "    Shared with: {}", badges);
            }
        }
        out
    }
}
