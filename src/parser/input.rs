//! Types representing parser input.

use std::fmt;

/// One document page reduced to text fragments in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number in the source document
    pub number: usize,
    /// Text fragments, untrimmed
    pub tokens: Vec<String>,
}

impl Page {
    /// Creates a page from any iterator of fragments.
    #[must_use]
    pub fn new<I, S>(number: usize, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            number,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the page has no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({} tokens)", self.number, self.tokens.len())
    }
}
