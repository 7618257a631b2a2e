//! Tabular booklist output.
//!
//! Writes one row per (course, book) pair with the fixed column layout
//! downstream import tools expect, or the parsed course structure as JSON.
//!
//! Kept as a single file: the feature is small enough that sub-files would
//! only add indirection.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::parser::{BookRecord, CourseRecord};

/// Column names in output order.
pub const COLUMNS: [&str; 14] = [
    "TERM",
    "CAMPUS",
    "DEPARTMENT",
    "COURSE",
    "UNDERGRAD",
    "SECTION",
    "COURSE ID",
    "ENROLLMENT",
    "ISBN",
    "AUTHOR",
    "TITLE",
    "PUBLISHER",
    "BOOK STATUS",
    "NEW RETAIL",
];

/// Placeholder written to `CAMPUS`, `UNDERGRAD` and `COURSE ID`.
pub const NOT_APPLICABLE: &str = "N/A";

/// Placeholder written to `ENROLLMENT`.
pub const DEFAULT_ENROLLMENT: &str = "25";

/// Errors produced while writing output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// I/O error writing to the sink.
    #[error("I/O error writing output: {0}")]
    Io(#[from] std::io::Error),
    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// One row per book, comma separated
    #[default]
    Csv,
    /// Courses with nested books
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}' (expected csv or json)")),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooklistRow<'a> {
    #[serde(rename = "TERM")]
    pub term: &'a str,
    #[serde(rename = "CAMPUS")]
    pub campus: &'static str,
    #[serde(rename = "DEPARTMENT")]
    pub department: &'a str,
    #[serde(rename = "COURSE")]
    pub course: &'a str,
    #[serde(rename = "UNDERGRAD")]
    pub undergrad: &'static str,
    #[serde(rename = "SECTION")]
    pub section: &'a str,
    #[serde(rename = "COURSE ID")]
    pub course_id: &'static str,
    #[serde(rename = "ENROLLMENT")]
    pub enrollment: &'static str,
    #[serde(rename = "ISBN")]
    pub isbn: &'a str,
    #[serde(rename = "AUTHOR")]
    pub author: &'a str,
    #[serde(rename = "TITLE")]
    pub title: &'a str,
    #[serde(rename = "PUBLISHER")]
    pub publisher: &'a str,
    #[serde(rename = "BOOK STATUS")]
    pub book_status: &'static str,
    #[serde(rename = "NEW RETAIL")]
    pub new_retail: &'a str,
}

impl<'a> BooklistRow<'a> {
    /// Builds the row for `book` adopted by `course`.
    #[must_use]
    pub fn new(course: &'a CourseRecord, book: &'a BookRecord) -> Self {
        Self {
            term: &course.term,
            campus: NOT_APPLICABLE,
            department: &course.department,
            course: &course.course,
            undergrad: NOT_APPLICABLE,
            section: &course.section,
            course_id: NOT_APPLICABLE,
            enrollment: DEFAULT_ENROLLMENT,
            isbn: &book.isbn,
            author: book.author.as_deref().unwrap_or_default(),
            title: book.title.as_deref().unwrap_or_default(),
            publisher: &book.publisher,
            book_status: book.status().map_or("", |status| status.as_str()),
            new_retail: book.retail_new.as_deref().unwrap_or_default(),
        }
    }
}

/// Rows for every book of every course, in document order.
///
/// Courses without books contribute nothing.
pub fn rows(courses: &[CourseRecord]) -> impl Iterator<Item = BooklistRow<'_>> {
    courses.iter().flat_map(|course| {
        course
            .books
            .iter()
            .map(move |book| BooklistRow::new(course, book))
    })
}

/// Writes the header and one CSV row per book.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`ExportError`] if encoding or writing fails.
#[instrument(skip_all, fields(courses = courses.len()))]
pub fn write_csv<W: Write>(courses: &[CourseRecord], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;

    let mut written = 0usize;
    for row in rows(courses) {
        trace!(isbn = row.isbn, "writing row");
        csv_writer.serialize(&row)?;
        written += 1;
    }
    csv_writer.flush()?;
    debug!(rows = written, "CSV written");
    Ok(written)
}

/// Writes the courses as a pretty-printed JSON array.
///
/// Returns the number of book rows contained in the output.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or writing fails.
#[instrument(skip_all, fields(courses = courses.len()))]
pub fn write_json<W: Write>(courses: &[CourseRecord], mut writer: W) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, courses)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(rows(courses).count())
}

/// Writes `courses` in `format`.
///
/// # Errors
///
/// Returns [`ExportError`] if encoding or writing fails.
pub fn write<W: Write>(
    format: ExportFormat,
    courses: &[CourseRecord],
    writer: W,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => write_csv(courses, writer),
        ExportFormat::Json => write_json(courses, writer),
    }
}
