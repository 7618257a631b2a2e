//! Book adoption entry parsing.
//!
//! A book entry has no reliable delimiters. The parser scans forward to the
//! first ISBN-shaped token, which closes a *window* of author and title
//! fragments. When the entry has no ISBN the scan runs into the price column
//! instead, and the window end is walked back to the duration cell.
//!
//! Inside the window the author is reassembled from wrapped line fragments,
//! the copyright year and edition are read from the cells just before the
//! window end, and whatever remains in between is the title. The fields after
//! the window (ISBN, duration, publisher, use, prices) are read in order.
//!
//! The author heuristic absorbs a following fragment only when it is very
//! short or the running text ends in a hyphen or space. With several authors
//! the extra names land in the title.

use tracing::trace;

use super::classify::{TokenClass, is_author_start};
use super::cursor::Cursor;
use super::error::{FieldError, FormatField};
use super::record::{BookRecord, Duration, UseType};

/// Fragments shorter than this are always treated as an author continuation.
const SHORT_FRAGMENT_LEN: usize = 3;

/// Publisher cells shorter than this were split across two fragments.
const SHORT_PUBLISHER_LEN: usize = 3;

/// Token range holding one book's author and title fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookWindow {
    /// Index where the scan started (first author fragment)
    pub start: usize,
    /// Index of the ISBN token, or of the duration token when `isbn_missing`
    pub end: usize,
    /// The scan reached a price without seeing an ISBN
    pub isbn_missing: bool,
}

/// Fields recovered from inside a [`BookWindow`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFields {
    pub author: String,
    pub title: String,
    pub edition: Option<String>,
    pub copyright_year: Option<String>,
}

/// Reads author, year, edition and title from `tokens[window.start..window.end]`.
///
/// Pure over the token buffer; the caller owns positioning.
pub(crate) fn read_window(
    tokens: &[String],
    window: &BookWindow,
) -> Result<WindowFields, FieldError> {
    let end = window.end;
    let first = token_at(tokens, window.start);
    if !is_author_start(first) {
        return Err(FieldError::new(FormatField::Author, first));
    }

    let mut author = first.to_string();
    let mut next = window.start + 1;
    while next < end {
        let fragment = token_at(tokens, next);
        if fragment.len() >= SHORT_FRAGMENT_LEN && !author.ends_with('-') && !author.ends_with(' ')
        {
            break;
        }
        author.push_str(fragment);
        next += 1;
    }

    let mut copyright_year = None;
    let mut edition = None;
    if let Some(before) = end.checked_sub(1).and_then(|i| tokens.get(i)) {
        if TokenClass::Year.matches(before) {
            copyright_year = Some(before.trim().to_string());
            edition = end
                .checked_sub(2)
                .and_then(|i| tokens.get(i))
                .filter(|t| TokenClass::Edition.matches(t))
                .map(|t| t.trim().to_string());
        } else if TokenClass::Edition.matches(before) {
            edition = Some(before.trim().to_string());
        }
    }

    let title_stop = edition.as_deref().or(copyright_year.as_deref());
    let mut title = String::new();
    while next < end {
        let fragment = token_at(tokens, next);
        if title_stop == Some(fragment.trim()) {
            break;
        }
        title.push_str(fragment);
        next += 1;
    }

    Ok(WindowFields {
        author: author.trim().to_string(),
        title: title.trim().to_string(),
        edition,
        copyright_year,
    })
}

/// Finds the duration cell between `start` (exclusive) and `end` (inclusive),
/// searching backward from `end`.
pub(crate) fn find_duration_before(tokens: &[String], start: usize, end: usize) -> Option<usize> {
    (start + 1..=end)
        .rev()
        .find(|&i| TokenClass::Duration.matches(token_at(tokens, i)))
}

/// Parses the next book entry for the open course.
///
/// Returns `Ok(None)` when the page ends or a course header is reached before
/// an ISBN or price.
pub(crate) fn next_book(cursor: &mut Cursor<'_>) -> Result<Option<BookRecord>, FieldError> {
    let Some(window) = scan_window(cursor)? else {
        return Ok(None);
    };
    let tokens = cursor.tokens();
    let fields = read_window(tokens, &window)?;

    let isbn = if window.isbn_missing {
        String::new()
    } else {
        cursor.take().unwrap_or_default().to_string()
    };

    let token = cursor.current_or_empty();
    let duration =
        Duration::from_token(token).ok_or_else(|| FieldError::new(FormatField::Duration, token))?;
    cursor.take();

    let mut publisher = cursor.take().unwrap_or_default().to_string();
    if publisher.len() < SHORT_PUBLISHER_LEN
        && let Some(rest) = cursor.take()
    {
        publisher.push_str(rest);
    }

    let token = cursor.current_or_empty();
    let use_type =
        UseType::from_token(token).ok_or_else(|| FieldError::new(FormatField::Use, token))?;
    cursor.take();

    cursor.skip_while(|t| !TokenClass::Price.matches(t) && !TokenClass::Header.matches(t));
    let retail_new = if cursor.current_is(|t| TokenClass::Price.matches(t)) {
        cursor.take().map(str::to_string)
    } else {
        None
    };
    // Used and rental prices follow the new retail price.
    cursor.skip_while(|t| TokenClass::Price.matches(t));

    let book = BookRecord {
        author: Some(fields.author),
        title: (!fields.title.is_empty()).then_some(fields.title),
        edition: fields.edition,
        copyright_year: fields.copyright_year,
        isbn,
        duration: Some(duration),
        publisher,
        use_type: Some(use_type),
        retail_new,
    };
    trace!(
        start = window.start,
        end = window.end,
        isbn = %book.isbn,
        title = ?book.title,
        "book parsed"
    );
    Ok(Some(book))
}

/// Scans to the end of the next book window, backtracking to the duration
/// cell when the ISBN is missing.
fn scan_window(cursor: &mut Cursor<'_>) -> Result<Option<BookWindow>, FieldError> {
    let start = cursor.position();
    cursor.skip_while(|t| {
        !TokenClass::Header.matches(t)
            && !TokenClass::Isbn.matches(t)
            && !TokenClass::Price.matches(t)
    });

    let Some(stop) = cursor.current_raw() else {
        return Ok(None);
    };
    if TokenClass::Header.matches(stop) {
        return Ok(None);
    }

    if !TokenClass::Price.matches(stop) {
        return Ok(Some(BookWindow {
            start,
            end: cursor.position(),
            isbn_missing: false,
        }));
    }

    let tokens = cursor.tokens();
    let Some(end) = find_duration_before(tokens, start, cursor.position()) else {
        return Err(FieldError::new(FormatField::Isbn, token_at(tokens, start)));
    };
    cursor.rewind_to(end);
    Ok(Some(BookWindow {
        start,
        end,
        isbn_missing: true,
    }))
}

fn token_at(tokens: &[String], index: usize) -> &str {
    tokens.get(index).map_or("", String::as_str)
}
