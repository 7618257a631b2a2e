//! Document-to-token extraction.
//!
//! Turns a booklist document on disk into ordered pages of text fragments
//! for the [`parser`](crate::parser). Only string content and order are
//! produced; geometry and fonts are discarded.
//!
//! # Architecture
//!
//! - [`PageExtractor`] - trait implemented per input format
//! - [`ExtractorRegistry`] - ordered collection that picks the first extractor
//!   able to handle a path
//! - [`PdfExtractor`] - PDF documents via `lopdf`
//! - [`TextDumpExtractor`] - form-feed separated token dumps (`.txt`)

mod error;
mod pdf;
mod text;

pub use error::ExtractError;
pub use pdf::PdfExtractor;
pub use text::{PAGE_BREAK, TextDumpExtractor, parse_text_dump};

use std::path::Path;

use tracing::{debug, info};

use crate::parser::Page;

/// Produces pages of tokens from one kind of document.
pub trait PageExtractor {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns true if this extractor understands `path`.
    fn can_handle(&self, path: &Path) -> bool;

    /// Extracts every page of the document in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the document cannot be read or decoded.
    fn extract(&self, path: &Path) -> Result<Vec<Page>, ExtractError>;
}

/// Ordered collection of extractors.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn PageExtractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PdfExtractor::new()));
        registry.register(Box::new(TextDumpExtractor::new()));
        registry
    }
}

impl ExtractorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Appends an extractor; earlier registrations win.
    pub fn register(&mut self, extractor: Box<dyn PageExtractor>) {
        debug!(name = extractor.name(), "Registering extractor");
        self.extractors.push(extractor);
    }

    /// Returns the number of registered extractors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Returns true if no extractors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Returns the first extractor that can handle `path`.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&dyn PageExtractor> {
        self.extractors
            .iter()
            .find(|e| e.can_handle(path))
            .map(AsRef::as_ref)
    }

    /// Extracts pages with the first matching extractor.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Unsupported`] when no extractor matches,
    /// [`ExtractError::Empty`] when the document has no pages, or the
    /// extractor's own error.
    pub fn extract(&self, path: &Path) -> Result<Vec<Page>, ExtractError> {
        let Some(extractor) = self.find(path) else {
            return Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
            });
        };
        let pages = extractor.extract(path)?;
        if pages.is_empty() {
            return Err(ExtractError::Empty {
                path: path.to_path_buf(),
            });
        }
        info!(
            extractor = extractor.name(),
            pages = pages.len(),
            "Extracted pages"
        );
        Ok(pages)
    }
}

/// Extracts pages from `path` with the default extractors.
///
/// # Errors
///
/// See [`ExtractorRegistry::extract`].
pub fn extract_pages(path: &Path) -> Result<Vec<Page>, ExtractError> {
    ExtractorRegistry::default().extract(path)
}

/// Case-insensitive extension check.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Splits extracted text into line fragments, dropping blank lines.
pub(crate) fn split_fragments(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
