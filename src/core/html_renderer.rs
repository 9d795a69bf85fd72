use std::fmt::Write;

use crate::core::comparison::ComparisonView;
use crate::core::grid::{GridCell, GridLayout};

/// Decorative content of the merged break cell.
const BREAK_PLACEHOLDER: &str = concat!(
    r#"<div class="break-content">"#,
    r#"<span class="break-icon">&#9749;</span>"#,
    r#"<span class="break-text">BREAK</span>"#,
    "</div>"
);

const PAGE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 24px; color: #1a202c; }
table.timetable { border-collapse: collapse; }
table.timetable th, table.timetable td {
  border: 1px solid #cbd5e0; padding: 6px; min-width: 110px; vertical-align: top; font-size: 12px;
}
table.timetable thead th { background: #2d3748; color: #fff; }
.day-label { background: #edf2f7; }
.course-name { font-weight: 600; }
.break-cell { background: #edf2f7; text-align: center; vertical-align: middle; }
.break-text { display: block; letter-spacing: 4px; }
.course-card { border: 1px solid #cbd5e0; border-radius: 8px; padding: 12px; margin: 8px 0; }
.section-badge {
  display: inline-block; background: #d6ecff; border-radius: 10px;
  padding: 2px 8px; margin-right: 4px;
}
.stats span { margin-right: 16px; font-weight: 600; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the `<table>` fragment for a laid-out timetable.
pub fn render_table(layout: &GridLayout) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<table class="timetable" data-section="{}">"#,
        escape_html(&layout.section.to_string())
    );

    html.push_str(r#"<thead><tr><th class="day-header">DAY / TIME</th>"#);
    for header in &layout.headers {
        let class = if header.is_break {
            "slot-header break-header"
        } else {
            "slot-header"
        };
        let _ = write!(
            html,
            r#"<th class="{}" data-slot="{}">{}</th>"#,
            class,
            header.slot,
            escape_html(&header.label)
        );
    }
    html.push_str("</tr></thead><tbody>");

    for row in &layout.rows {
        let _ = write!(html, r#"<tr><th class="day-label">{}</th>"#, row.day.key());
        for cell in &row.cells {
            render_cell(&mut html, cell);
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

fn render_cell(html: &mut String, cell: &GridCell) {
    match cell {
        GridCell::Course { cell, color } => {
            let _ = write!(
                html,
                concat!(
                    r#"<td class="course-cell" style="background-color: {}">"#,
                    r#"<div class="course-name">{}</div>"#,
                    r#"<div class="course-code">{}</div>"#,
                    r#"<div class="course-location">{}</div>"#,
                    r#"<div class="course-lecturer">{}</div>"#,
                    "</td>"
                ),
                color.to_hex(),
                escape_html(&cell.name),
                escape_html(&cell.code),
                escape_html(&cell.location),
                escape_html(&cell.lecturer),
            );
        }
        GridCell::Empty => html.push_str(r#"<td class="empty-cell"></td>"#),
        GridCell::Break { rowspan } => {
            let _ = write!(
                html,
                r#"<td class="break-cell" rowspan="{}">{}</td>"#,
                rowspan, BREAK_PLACEHOLDER
            );
        }
        GridCell::Covered => {}
    }
}

/// Course cards with shared-section badges, plus the two counters.
pub fn render_comparison(view: &ComparisonView) -> String {
    let (section, courses, summary) = match view {
        ComparisonView::Message(message) => {
            return format!(r#"<div class="empty-state">{}</div>"#, escape_html(message));
        }
        ComparisonView::Loaded {
            section,
            courses,
            summary,
        } => (section, courses, summary),
    };

    let mut html = String::new();
    let _ = write!(
        html,
        concat!(
            r#"<div class="comparison" data-section="{}">"#,
            r#"<div class="stats"><span class="total-courses">{}</span>"#,
            r#"<span class="total-shared">{}</span></div>"#
        ),
        escape_html(&section.to_string()),
        summary.total_courses,
        summary.total_shared,
    );

    for course in courses {
        let _ = write!(
            html,
            concat!(
                r#"<div class="course-card">"#,
                r#"<div class="course-title">{}</div>"#,
                r#"<div class="lecturer">{}</div>"#,
                r#"<div class="shared-sections">"#
            ),
            escape_html(&course.course_name),
            escape_html(&course.lecturer_name),
        );
        if course.shared_sections.is_empty() {
            html.push_str(r#"<span class="no-shared">Not shared with other sections</span>"#);
        }
        for shared in &course.shared_sections {
            let _ = write!(
                html,
                r#"<span class="section-badge">Section {}</span>"#,
                escape_html(&shared.to_string())
            );
        }
        html.push_str("</div></div>");
    }

    html.push_str("</div>");
    html
}

/// Standalone HTML5 page around a rendered fragment.
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{}</title>\n<style>{}</style>\n</head>\n",
            "<body>\n<h1>{}</h1>\n{}\n</body>\n</html>\n"
        ),
        escape_html(title),
        PAGE_STYLE,
        escape_html(title),
        body
    )
}
