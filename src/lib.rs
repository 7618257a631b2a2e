//! Booklist Core Library
//!
//! Recovers course sections and their textbook adoptions from bookstore
//! booklist documents whose only structure is the order of their text
//! fragments.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`extract`] - Document loading into pages of text fragments
//! - [`parser`] - Token classification and the course/book grammar
//! - [`export`] - CSV and JSON output, one row per (course, book)

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod extract;
pub mod parser;

// Re-export commonly used types
pub use export::{BooklistRow, ExportError, ExportFormat, write_csv, write_json};
pub use extract::{ExtractError, PageExtractor, extract_pages};
pub use parser::{
    BookRecord, CourseRecord, FormatError, Page, ParseOutput, ParseSession, ParseStats,
    parse_pages,
};
