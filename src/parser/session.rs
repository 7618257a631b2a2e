//! Document-level parse driver.
//!
//! A [`ParseSession`] walks pages in order. It owns the open course, the
//! courses finalized on the current page, the document-wide term and the
//! diagnostic counters. Courses finalized while a page is processed are
//! stamped with the term in effect when that page is done.

use std::fmt;

use tracing::{debug, info};

use super::book::next_book;
use super::classify::{NO_BOOK_PREFIX, TokenClass};
use super::course::{CourseHead, read_course_head};
use super::cursor::Cursor;
use super::error::{FieldError, FormatError, FormatField};
use super::input::Page;
use super::record::{BookRecord, CourseRecord};

/// Number of tokens in the table header repeated at the top of continuation pages.
pub const CONTINUATION_HEADER_LEN: usize = 24;

/// First token of the repeated table header.
const CONTINUATION_HEADER_FIRST: &str = "COURSE";

/// Last token of the repeated table header.
const CONTINUATION_HEADER_LAST: &str = "USED";

/// Default number of pages between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Diagnostic counters. Never affect parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Pages processed
    pub pages: usize,
    /// Output rows produced (books plus no-book entries)
    pub rows: usize,
    /// Courses returned
    pub courses: usize,
    /// Books parsed
    pub books: usize,
}

impl fmt::Display for ParseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Pages - {}, Rows - {}, Courses - {}, Books - {}",
            self.pages, self.rows, self.courses, self.books
        )
    }
}

/// Result of a complete parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Finalized courses in document order
    pub courses: Vec<CourseRecord>,
    /// Counters collected while parsing
    pub stats: ParseStats,
}

impl ParseOutput {
    /// Returns true if no course was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// Stateful driver over the pages of one document.
#[derive(Debug)]
pub struct ParseSession {
    term: String,
    open: Option<CourseRecord>,
    page_courses: Vec<CourseRecord>,
    courses: Vec<CourseRecord>,
    stats: ParseStats,
    progress_interval: usize,
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseSession {
    /// Creates a session with the default progress interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: String::new(),
            open: None,
            page_courses: Vec::new(),
            courses: Vec::new(),
            stats: ParseStats::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Logs progress every `pages` pages (minimum 1).
    #[must_use]
    pub fn with_progress_interval(mut self, pages: usize) -> Self {
        self.progress_interval = pages.max(1);
        self
    }

    /// Term in effect so far.
    #[must_use]
    pub fn current_term(&self) -> &str {
        &self.term
    }

    /// Courses finalized on completed pages.
    #[must_use]
    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    /// Counters so far. `courses` is only filled in by [`ParseSession::finish`].
    #[must_use]
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Processes the next page of the document.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] on any grammar violation. The session should be
    /// dropped afterwards.
    #[tracing::instrument(skip(self, page), fields(page = page.number, tokens = page.tokens.len()))]
    pub fn process_page(&mut self, page: &Page) -> Result<(), FormatError> {
        self.stats.pages += 1;
        let page_number = self.stats.pages;

        let mut cursor = Cursor::new(&page.tokens);
        let walked = self.walk_page(&mut cursor);
        if let Some(term) = cursor.into_term() {
            self.term = term;
        }
        walked.map_err(|err| err.at(page_number, self.stats.rows + 1))?;

        for course in &mut self.page_courses {
            course.term.clone_from(&self.term);
        }
        self.courses.append(&mut self.page_courses);

        if let Some(line) = self.progress_line() {
            info!("{line}");
        }
        Ok(())
    }

    /// Progress message due after the current page, if any.
    fn progress_line(&self) -> Option<String> {
        let pages = self.stats.pages;
        (pages % self.progress_interval == 0)
            .then(|| format!("Processed {pages} pages ({} courses)...", self.courses.len()))
    }

    /// Closes any course still open and returns everything parsed.
    #[must_use]
    pub fn finish(mut self) -> ParseOutput {
        if let Some(mut course) = self.open.take() {
            course.term.clone_from(&self.term);
            self.courses.push(course);
        }
        self.stats.courses = self.courses.len();
        ParseOutput {
            courses: self.courses,
            stats: self.stats,
        }
    }

    fn walk_page(&mut self, cursor: &mut Cursor<'_>) -> Result<(), FieldError> {
        while !cursor.at_end() {
            if self.open.is_none() {
                cursor.skip_while(|t| !TokenClass::Header.matches(t));
                if cursor.at_end() {
                    break;
                }
                match read_course_head(cursor)? {
                    CourseHead::Opened(course) => self.open = Some(course),
                    CourseHead::Discarded => break,
                }
            } else {
                skip_continuation_header(cursor)?;
                if at_header(cursor) {
                    self.finalize();
                    continue;
                }
            }

            if cursor.at_end() {
                break;
            }

            if cursor.current_is(|t| TokenClass::NoBookSentinel.matches(t)) {
                let isbn = sentinel_isbn(cursor);
                self.stats.rows += 1;
                self.push_book(BookRecord::no_book_required(isbn));
                self.finalize();
                continue;
            }

            while !cursor.at_end() {
                let Some(book) = next_book(cursor)? else {
                    break;
                };
                self.stats.books += 1;
                self.stats.rows += 1;
                self.push_book(book);
            }

            if at_header(cursor) {
                self.finalize();
            }
        }
        Ok(())
    }

    fn push_book(&mut self, book: BookRecord) {
        if let Some(course) = self.open.as_mut() {
            course.books.push(book);
        }
    }

    fn finalize(&mut self) {
        if let Some(course) = self.open.take() {
            debug!(
                course = %course.label(),
                books = course.books.len(),
                "course finalized"
            );
            self.page_courses.push(course);
        }
    }
}

/// Parses every page of a document in order.
///
/// # Errors
///
/// Returns the first [`FormatError`]; nothing parsed before it is returned.
pub fn parse_pages(pages: &[Page]) -> Result<ParseOutput, FormatError> {
    parse_pages_with(ParseSession::new(), pages)
}

/// Like [`parse_pages`] with a preconfigured session.
///
/// # Errors
///
/// Returns the first [`FormatError`].
pub fn parse_pages_with(
    mut session: ParseSession,
    pages: &[Page],
) -> Result<ParseOutput, FormatError> {
    for page in pages {
        session.process_page(page)?;
    }
    let output = session.finish();
    info!("{}", output.stats);
    Ok(output)
}

fn at_header(cursor: &Cursor<'_>) -> bool {
    cursor.current_is(|t| TokenClass::Header.matches(t))
}

/// Skips the table header repeated at the top of a continuation page.
fn skip_continuation_header(cursor: &mut Cursor<'_>) -> Result<(), FieldError> {
    if cursor.position() != 0 || cursor.current_raw() != Some(CONTINUATION_HEADER_FIRST) {
        return Ok(());
    }
    if !cursor
        .get(CONTINUATION_HEADER_LEN)
        .is_some_and(|t| !t.is_empty())
    {
        return Ok(());
    }
    let last = cursor
        .get(CONTINUATION_HEADER_LEN - 1)
        .unwrap_or_default();
    if last != CONTINUATION_HEADER_LAST {
        return Err(FieldError::new(FormatField::HeaderField, last));
    }
    cursor.advance_by(CONTINUATION_HEADER_LEN);
    Ok(())
}

/// ISBN recorded for a no-book sentinel: the next token for a bare `***`,
/// otherwise the text fused after the prefix.
fn sentinel_isbn(cursor: &Cursor<'_>) -> String {
    let token = cursor.current_or_empty();
    let value = if token == NO_BOOK_PREFIX {
        cursor.get(cursor.position() + 1).unwrap_or_default()
    } else {
        token.strip_prefix(NO_BOOK_PREFIX).unwrap_or(token)
    };
    value.trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn continuation_header() -> Vec<&'static str> {
        let mut header = vec!["COURSE"];
        header.extend(std::iter::repeat_n("COL", CONTINUATION_HEADER_LEN - 2));
        header.push("USED");
        header
    }

    #[test]
    fn test_session_empty_page_yields_nothing() {
        let mut session = ParseSession::new();
        session.process_page(&Page::new(1, Vec::<String>::new())).unwrap();
        let output = session.finish();
        assert!(output.is_empty());
        assert_eq!(output.stats.pages, 1);
    }

    #[test]
    fn test_session_stamps_term_at_end_of_page() {
        let page = Page::new(
            1,
            [
                "TERM: FALL2025",
                "BIO 202 03",
                "01/15/2025",
                "***",
                "9780000000000",
                "TERM: SPRING2026",
                "CHEM 101 01",
                "01/15/2025",
                "***NO TEXT",
            ],
        );
        let mut session = ParseSession::new();
        session.process_page(&page).unwrap();
        assert_eq!(session.current_term(), "SPRING2026");
        let output = session.finish();
        assert_eq!(output.courses.len(), 2);
        assert!(output.courses.iter().all(|c| c.term == "SPRING2026"));
        assert_eq!(output.courses[0].books[0].isbn, "9780000000000");
        assert_eq!(output.courses[1].books[0].isbn, "NO TEXT");
        assert_eq!(output.stats.rows, 2);
        assert_eq!(output.stats.books, 0);
    }

    #[test]
    fn test_session_skips_continuation_header_for_open_course() {
        let first = Page::new(
            1,
            [
                "BIO 202 03",
                "01/15/2025",
                "SMITH",
                "BIOLOGY",
                "9781234567897",
                "PURCHASE",
                "ABC",
                "REQ",
            ],
        );
        let mut second_tokens = continuation_header();
        second_tokens.extend([
            "JONES",
            "LAB MANUAL",
            "9781111111111",
            "N/A",
            "XYZ",
            "REC",
        ]);
        let second = Page::new(2, second_tokens);

        let output = parse_pages(&[first, second]).unwrap();
        assert_eq!(output.courses.len(), 1);
        let books = &output.courses[0].books;
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].author.as_deref(), Some("JONES"));
    }

    #[test]
    fn test_session_corrupted_continuation_header_is_fatal() {
        let first = Page::new(1, ["BIO 202 03", "01/15/2025"]);
        let mut second_tokens = continuation_header();
        second_tokens[CONTINUATION_HEADER_LEN - 1] = "NEW";
        second_tokens.push("JONES");
        let second = Page::new(2, second_tokens);

        let err = parse_pages(&[first, second]).unwrap_err();
        assert_eq!(err.page, 2);
        assert_eq!(err.field, FormatField::HeaderField);
        assert_eq!(err.value, "NEW");
    }

    #[test]
    fn test_session_discards_course_when_note_runs_off_page() {
        let first = Page::new(1, ["BIO 202 03", "SMITH J", "SEE", "NOTES"]);
        let second = Page::new(2, ["CHEM 101 01", "02/01/2025", "***", "N/A"]);
        let output = parse_pages(&[first, second]).unwrap();
        assert_eq!(output.courses.len(), 1);
        assert_eq!(output.courses[0].department, "CHEM");
    }

    #[test]
    fn test_session_error_reports_page_and_row() {
        let first = Page::new(1, ["BIO 202 03", "01/15/2025", "***", "N/A"]);
        let second = Page::new(
            2,
            ["CHEM 101 01", "02/01/2025", "JONES", "LAB", "9781111111111", "SOON"],
        );
        let err = parse_pages(&[first, second]).unwrap_err();
        assert_eq!(err.page, 2);
        assert_eq!(err.row, 2);
        assert_eq!(err.field, FormatField::Duration);
        assert_eq!(
            err.to_string(),
            "Error on page 2, row 2 - invalid DURATION: SOON"
        );
    }

    #[test]
    fn test_session_open_course_keeps_term_of_last_page() {
        let first = Page::new(1, ["TERM: FALL2025", "BIO 202 03", "01/15/2025"]);
        let second = Page::new(2, ["TERM: WINTER2026"]);
        let output = parse_pages(&[first, second]).unwrap();
        assert_eq!(output.courses[0].term, "WINTER2026");
    }

    #[test]
    fn test_parse_stats_display() {
        let stats = ParseStats {
            pages: 3,
            rows: 10,
            courses: 4,
            books: 8,
        };
        assert_eq!(
            stats.to_string(),
            "Total Pages - 3, Rows - 10, Courses - 4, Books - 8"
        );
    }

    #[test]
    fn test_progress_interval_has_floor_of_one() {
        let session = ParseSession::new().with_progress_interval(0);
        assert_eq!(session.progress_interval, 1);
    }

    #[test]
    fn test_progress_line_follows_interval() {
        let course = Page::new(1, ["ART 100 01", "01/10/2025", "***", "N/A"]);
        let blank = Page::new(2, Vec::<String>::new());
        let mut session = ParseSession::new().with_progress_interval(2);

        session.process_page(&course).unwrap();
        assert!(session.progress_line().is_none());

        session.process_page(&blank).unwrap();
        assert_eq!(
            session.progress_line().as_deref(),
            Some("Processed 2 pages (1 courses)...")
        );

        session.process_page(&blank).unwrap();
        assert!(session.progress_line().is_none());
    }

    #[test]
    fn test_progress_line_every_page() {
        let mut session = ParseSession::new().with_progress_interval(1);
        session.process_page(&Page::new(1, Vec::<String>::new())).unwrap();
        assert_eq!(
            session.progress_line().as_deref(),
            Some("Processed 1 pages (0 courses)...")
        );
    }
}
