//! Error types for booklist parsing.

use std::fmt;

use thiserror::Error;

/// Grammar field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatField {
    /// Course header could not be split into department, course and section
    CourseHeader,
    /// Token after the header is neither a date nor an instructor name
    Instructor,
    /// Expected the class start date
    ClassStartDate,
    /// First token of a book window does not start with an uppercase letter
    Author,
    /// Price reached without an ISBN and no duration to fall back to
    Isbn,
    /// Expected `N/A`, `PURCHASE` or `<n> DAYS`
    Duration,
    /// Expected one of `REQ`, `REC`, `SUG`, `CHC`
    Use,
    /// Continuation page table header does not end where expected
    HeaderField,
}

impl FormatField {
    /// Returns the field label used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CourseHeader => "COURSE HEADER",
            Self::Instructor => "INSTRUCTOR",
            Self::ClassStartDate => "CLASS START DATE",
            Self::Author => "AUTHOR",
            Self::Isbn => "ISBN",
            Self::Duration => "DURATION",
            Self::Use => "USE",
            Self::HeaderField => "header field",
        }
    }
}

impl fmt::Display for FormatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural grammar violation. Aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error on page {page}, row {row} - invalid {field}: {value}")]
pub struct FormatError {
    /// 1-based page number
    pub page: usize,
    /// 1-based row counter at the time of failure
    pub row: usize,
    /// Field that failed
    pub field: FormatField,
    /// Offending token text (trimmed; empty when the page ran out)
    pub value: String,
}

/// Field failure without document position. The session attaches page and row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub(crate) field: FormatField,
    pub(crate) value: String,
}

impl FieldError {
    pub(crate) fn new(field: FormatField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into().trim().to_string(),
        }
    }

    pub(crate) fn at(self, page: usize, row: usize) -> FormatError {
        FormatError {
            page,
            row,
            field: self.field,
            value: self.value,
        }
    }
}
