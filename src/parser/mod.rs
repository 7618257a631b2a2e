//! Booklist token-stream parser.
//!
//! Recovers course and textbook adoption records from pages that have already
//! been reduced to ordered text fragments. No layout information is used: the
//! grammar is recognized from token shapes alone, with local lookahead and one
//! bounded backtrack per book entry.
//!
//! # Grammar
//!
//! ```text
//! course  := HEADER [INSTRUCTOR] [SECTION_NOTE...] START_DATE (NO_BOOK | book*)
//! book    := AUTHOR... TITLE... [EDITION] [YEAR] ISBN? DURATION PUBLISHER USE PRICE*
//! ```
//!
//! Term markers (`TERM: FALL2025`) may appear anywhere; a course takes the
//! term in effect at the end of the page where it is finalized.
//!
//! # Example
//!
//! ```
//! use booklist_core::parser::{Page, parse_pages};
//!
//! let page = Page::new(1, [
//!     "BIO 202 03", "SMITH J", "01/15/2025",
//!     "SMITHSON A", "INTRO TO BIO", "2021", "9781234567897",
//!     "PURCHASE", "ABC", "REQ", "$ 50.00",
//! ]);
//! let output = parse_pages(&[page]).unwrap();
//! assert_eq!(output.courses.len(), 1);
//! assert_eq!(output.courses[0].books[0].isbn, "9781234567897");
//! ```

mod book;
mod classify;
mod course;
mod cursor;
mod error;
mod input;
mod record;
mod session;

pub use book::{BookWindow, WindowFields};
pub use classify::{NO_BOOK_PREFIX, PRICE_PREFIX, TERM_PREFIX, TokenClass, classify, term_value};
pub use cursor::Cursor;
pub use error::{FormatError, FormatField};
pub use input::Page;
pub use record::{BookRecord, BookStatus, CourseRecord, Duration, UseType};
pub use session::{
    CONTINUATION_HEADER_LEN, DEFAULT_PROGRESS_INTERVAL, ParseOutput, ParseSession, ParseStats,
    parse_pages, parse_pages_with,
};

/// Reads the author, title, edition and year fields of one book window.
///
/// `window.start` is the first author fragment and `window.end` the ISBN
/// token (or the duration token when the ISBN is missing). Only tokens inside
/// the window and the two cells before `window.end` are inspected.
///
/// # Errors
///
/// Returns a [`FormatError`] for `page`/`row` when the window does not open
/// with an uppercase author fragment.
pub fn read_book_window(
    tokens: &[String],
    window: &BookWindow,
    page: usize,
    row: usize,
) -> Result<WindowFields, FormatError> {
    book::read_window(tokens, window).map_err(|err| err.at(page, row))
}
