//! Token shape classification.
//!
//! Every structural decision in the booklist grammar is made from the shape of
//! a single token. [`TokenClass`] names those shapes; [`classify`] returns the
//! dominant one and [`TokenClass::matches`] answers for one shape in
//! isolation, which the grammar needs because shapes overlap (an ISBN also
//! contains a 4-digit year run).
//!
//! Patterns are unanchored searches unless stated otherwise. Price and term
//! prefixes are tested on the raw token; all other shapes on the trimmed one.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Literal prefix that marks a course with no textbook requirement.
pub const NO_BOOK_PREFIX: &str = "***";

/// Prefix of a term marker token (e.g. `TERM: FALL2025`).
pub const TERM_PREFIX: &str = "TERM:";

/// Fixed width of the term marker prefix; the term value follows it.
const TERM_VALUE_OFFSET: usize = 6;

/// Prefix of a price token (e.g. `$ 50.00`).
pub const PRICE_PREFIX: &str = "$ ";

#[allow(clippy::expect_used)]
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]{2,10} \d{3} \d{2}").expect("course header regex is valid")
});

#[allow(clippy::expect_used)]
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("date regex is valid"));

#[allow(clippy::expect_used)]
static RENTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,3}) DAYS").expect("rental duration regex is valid"));

#[allow(clippy::expect_used)]
static EDITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[A-Z]{2,4}").expect("edition regex is valid"));

#[allow(clippy::expect_used)]
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year regex is valid"));

#[allow(clippy::expect_used)]
static ISBN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"97\d{11}").expect("ISBN regex is valid"));

#[allow(clippy::expect_used)]
static INSTRUCTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+").expect("instructor regex is valid"));

#[allow(clippy::expect_used)]
static AUTHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]").expect("author regex is valid"));

/// Shape of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Course header: `<2-10 letters> <3 digits> <2 digits>`
    Header,
    /// Class start date: `MM/DD/YYYY`
    Date,
    /// Price cell: starts with `$ `
    Price,
    /// Loan/purchase duration: `N/A`, `PURCHASE` or `<n> DAYS`
    Duration,
    /// Edition marker such as `3RD` or `12ED`
    Edition,
    /// Any token containing a 4-digit run
    Year,
    /// Term marker: starts with `TERM:`
    Term,
    /// 13-digit ISBN starting with `97`
    Isbn,
    /// No textbook required / class cancelled marker: starts with `***`
    NoBookSentinel,
    /// Anything else
    Plain,
}

impl TokenClass {
    /// Classes in the order [`classify`] tries them.
    pub const PRIORITY: [Self; 9] = [
        Self::NoBookSentinel,
        Self::Term,
        Self::Header,
        Self::Date,
        Self::Price,
        Self::Isbn,
        Self::Duration,
        Self::Edition,
        Self::Year,
    ];

    /// Returns true if `token` has this shape, regardless of any other shape it
    /// may also have.
    #[must_use]
    pub fn matches(self, token: &str) -> bool {
        let trimmed = token.trim();
        match self {
            Self::Header => HEADER_PATTERN.is_match(trimmed),
            Self::Date => DATE_PATTERN.is_match(trimmed),
            Self::Price => token.starts_with(PRICE_PREFIX),
            Self::Duration => {
                matches!(trimmed, "N/A" | "PURCHASE") || RENTAL_PATTERN.is_match(trimmed)
            }
            Self::Edition => EDITION_PATTERN.is_match(trimmed),
            Self::Year => YEAR_PATTERN.is_match(trimmed),
            Self::Term => token.starts_with(TERM_PREFIX),
            Self::Isbn => ISBN_PATTERN.is_match(trimmed),
            Self::NoBookSentinel => trimmed.starts_with(NO_BOOK_PREFIX),
            Self::Plain => !Self::PRIORITY.iter().any(|class| class.matches(token)),
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Header => "header",
            Self::Date => "date",
            Self::Price => "price",
            Self::Duration => "duration",
            Self::Edition => "edition",
            Self::Year => "year",
            Self::Term => "term",
            Self::Isbn => "isbn",
            Self::NoBookSentinel => "no-book",
            Self::Plain => "plain",
        };
        f.write_str(label)
    }
}

/// Returns the dominant shape of `token`.
#[must_use]
pub fn classify(token: &str) -> TokenClass {
    TokenClass::PRIORITY
        .into_iter()
        .find(|class| class.matches(token))
        .unwrap_or(TokenClass::Plain)
}

/// Extracts the term value from a term marker token.
///
/// Returns `None` when the token is not a term marker.
#[must_use]
pub fn term_value(token: &str) -> Option<String> {
    if !TokenClass::Term.matches(token) {
        return None;
    }
    let value: String = token.chars().skip(TERM_VALUE_OFFSET).collect();
    Some(value.trim().to_string())
}

/// Extracts the day count from a rental duration token such as `180 DAYS`.
pub(crate) fn rental_days(token: &str) -> Option<u16> {
    RENTAL_PATTERN
        .captures(token.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|days| days.as_str().parse().ok())
}

/// Returns true if `token` can open an instructor field (leading uppercase run).
pub(crate) fn is_instructor(token: &str) -> bool {
    INSTRUCTOR_PATTERN.is_match(token.trim())
}

/// Returns true if `token` can open an author field (leading uppercase letter).
///
/// Tested on the raw token: a fragment starting with whitespace is rejected.
pub(crate) fn is_author_start(token: &str) -> bool {
    AUTHOR_PATTERN.is_match(token)
}
