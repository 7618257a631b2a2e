//! Error types for page extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning a document into pages of tokens.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input could not be read from disk
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The PDF could not be loaded or its text could not be decoded
    #[error("failed to extract text from PDF '{}': {source}", path.display())]
    Pdf {
        /// Input path
        path: PathBuf,
        /// Underlying PDF backend error
        #[source]
        source: lopdf::Error,
    },

    /// No extractor handles this kind of file
    #[error(
        "unsupported input '{}'\n  Suggestion: provide a .pdf booklist or a .txt token dump",
        path.display()
    )]
    Unsupported {
        /// Input path
        path: PathBuf,
    },

    /// The document has no pages
    #[error("no pages found in '{}'", path.display())]
    Empty {
        /// Input path
        path: PathBuf,
    },
}

impl ExtractError {
    /// Creates a `Pdf` error for `path`.
    #[must_use]
    pub fn pdf(path: impl Into<PathBuf>, source: lopdf::Error) -> Self {
        Self::Pdf {
            path: path.into(),
            source,
        }
    }
}
