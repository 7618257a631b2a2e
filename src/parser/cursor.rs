//! Positional walk over one page's tokens.

use tracing::trace;

use super::classify::term_value;

/// Reads one page's tokens in order.
///
/// The position only moves forward, except through [`Cursor::rewind_to`],
/// which the book parser uses for its bounded backtrack. Term markers are
/// noticed as the cursor skips over them.
#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
    term: Option<String>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `tokens`.
    #[must_use]
    pub fn new(tokens: &'a [String]) -> Self {
        Self {
            tokens,
            pos: 0,
            term: None,
        }
    }

    /// All tokens of the page.
    #[must_use]
    pub fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    /// Current page-local index.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once every token has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Trimmed current token without advancing.
    #[must_use]
    pub fn current(&self) -> Option<&'a str> {
        self.current_raw().map(str::trim)
    }

    /// Untrimmed current token without advancing.
    #[must_use]
    pub fn current_raw(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// Trimmed current token, or an empty string past the end.
    #[must_use]
    pub fn current_or_empty(&self) -> &'a str {
        self.current().unwrap_or_default()
    }

    /// Token at an arbitrary index, untrimmed.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Returns true if the current token satisfies `pred`; false at the end.
    pub fn current_is(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.current_raw().is_some_and(pred)
    }

    /// Reads the trimmed current token and advances.
    pub fn take(&mut self) -> Option<&'a str> {
        self.take_raw().map(str::trim)
    }

    /// Reads the untrimmed current token and advances.
    pub fn take_raw(&mut self) -> Option<&'a str> {
        let token = self.current_raw()?;
        self.pos += 1;
        Some(token)
    }

    /// Steps over the current token, recording it if it is a term marker.
    pub fn skip(&mut self) {
        if let Some(token) = self.current_raw()
            && let Some(term) = term_value(token)
        {
            trace!(term = %term, position = self.pos, "term marker");
            self.term = Some(term);
        }
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Skips tokens while `pred` holds, stopping at the end of the page.
    pub fn skip_while(&mut self, pred: impl Fn(&str) -> bool) {
        while self.current_is(&pred) {
            self.skip();
        }
    }

    /// Moves to `index` inside the window the book parser just scanned.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `index` is not past the current position.
    pub fn rewind_to(&mut self, index: usize) {
        debug_assert!(index <= self.pos, "rewind must not move forward");
        self.pos = index;
    }

    /// Moves forward by `count` tokens without inspecting them.
    pub fn advance_by(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.tokens.len());
    }

    /// Most recent term marker skipped on this page.
    #[must_use]
    pub fn last_term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Consumes the cursor, returning the most recent term marker skipped.
    #[must_use]
    pub fn into_term(self) -> Option<String> {
        self.term
    }
}
