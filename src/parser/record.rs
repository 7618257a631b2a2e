//! Course and book adoption records.

use std::fmt;

use serde::Serialize;

use super::classify::rental_days;
use super::error::{FieldError, FormatField};

/// How a book is obtained for the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    /// `PURCHASE`
    Purchase,
    /// `N/A`
    NotApplicable,
    /// `<n> DAYS` rental window
    Rental {
        /// Rental length in days
        days: u16,
    },
}

impl Duration {
    /// Parses a duration token. Returns `None` for any other shape.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "PURCHASE" => Some(Self::Purchase),
            "N/A" => Some(Self::NotApplicable),
            other => rental_days(other).map(|days| Self::Rental { days }),
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purchase => write!(f, "PURCHASE"),
            Self::NotApplicable => write!(f, "N/A"),
            Self::Rental { days } => write!(f, "{days} DAYS"),
        }
    }
}

/// Requirement category of a book for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UseType {
    /// Required
    #[serde(rename = "REQ")]
    Req,
    /// Recommended
    #[serde(rename = "REC")]
    Rec,
    /// Suggested
    #[serde(rename = "SUG")]
    Sug,
    /// Choice (one of several)
    #[serde(rename = "CHC")]
    Chc,
}

impl UseType {
    /// Parses a use-type token. Only the exact codes are accepted.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "REQ" => Some(Self::Req),
            "REC" => Some(Self::Rec),
            "SUG" => Some(Self::Sug),
            "CHC" => Some(Self::Chc),
            _ => None,
        }
    }

    /// Returns the document code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Req => "REQ",
            Self::Rec => "REC",
            Self::Sug => "SUG",
            Self::Chc => "CHC",
        }
    }

    /// Returns true only for `REQ`.
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(self, Self::Req)
    }
}

impl fmt::Display for UseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output classification of a book's use type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Required,
    Optional,
}

impl BookStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Optional => "OPTIONAL",
        }
    }
}

impl From<UseType> for BookStatus {
    fn from(use_type: UseType) -> Self {
        if use_type.is_required() {
            Self::Required
        } else {
            Self::Optional
        }
    }
}

/// One book adoption entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub author: Option<String>,
    pub title: Option<String>,
    pub edition: Option<String>,
    pub copyright_year: Option<String>,
    /// Empty when no book is required or the ISBN could not be recovered
    pub isbn: String,
    pub duration: Option<Duration>,
    pub publisher: String,
    pub use_type: Option<UseType>,
    pub retail_new: Option<String>,
}

impl BookRecord {
    /// Entry for a course marked with the no-book sentinel.
    #[must_use]
    pub fn no_book_required(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    /// `REQUIRED`/`OPTIONAL` from the use type; `None` when it was never set.
    #[must_use]
    pub fn status(&self) -> Option<BookStatus> {
        self.use_type.map(BookStatus::from)
    }
}

/// One course section with its adopted books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub department: String,
    pub course: String,
    pub section: String,
    pub instructor: Option<String>,
    pub section_note: Option<String>,
    /// `MM/DD/YYYY`
    pub start_date: String,
    /// Stamped when the page that finalized the course is done
    pub term: String,
    pub books: Vec<BookRecord>,
}

impl CourseRecord {
    /// Opens a course from a header token such as `BIO 202 03`.
    ///
    /// The trimmed token is split on single spaces; the first three parts must
    /// all be present and non-empty.
    pub(crate) fn from_header(token: &str) -> Result<Self, FieldError> {
        let mut parts = token.trim().split(' ');
        let (Some(department), Some(course), Some(section)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(FieldError::new(FormatField::CourseHeader, token));
        };
        if department.is_empty() || course.is_empty() || section.is_empty() {
            return Err(FieldError::new(FormatField::CourseHeader, token));
        }

        Ok(Self {
            department: department.to_string(),
            course: course.to_string(),
            section: section.to_string(),
            instructor: None,
            section_note: None,
            start_date: String::new(),
            term: String::new(),
            books: Vec::new(),
        })
    }

    /// `DEPT COURSE SECTION`, for log lines.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} {}", self.department, self.course, self.section)
    }
}
