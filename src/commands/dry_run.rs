//! Dry-run preview of a parsed booklist.

use booklist_core::ParseOutput;
use booklist_core::parser::CourseRecord;

/// Prints one line per course and per book without writing output.
pub fn run_dry_run_preview(output: &ParseOutput) {
    for line in preview_lines(output) {
        println!("{line}");
    }
}

fn preview_lines(output: &ParseOutput) -> Vec<String> {
    let mut lines = Vec::new();
    for course in &output.courses {
        lines.push(course_line(course));
        for book in &course.books {
            let title = book.title.as_deref().unwrap_or("(no book required)");
            let isbn = if book.isbn.is_empty() { "-" } else { book.isbn.as_str() };
            let status = book.status().map_or("", |status| status.as_str());
            lines.push(format!("  - {isbn} {title} {status}").trim_end().to_string());
        }
    }
    lines.push(format!("Dry run summary: {}", output.stats));
    lines.push("Dry run - no file written".to_string());
    lines
}

fn course_line(course: &CourseRecord) -> String {
    let term = if course.term.is_empty() { "?" } else { course.term.as_str() };
    format!(
        "[{term}] {} starts {} ({} book(s))",
        course.label(),
        course.start_date,
        course.books.len()
    )
}
