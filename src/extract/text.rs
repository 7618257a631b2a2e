//! Plain-text token dumps.
//!
//! Pages are separated by a form feed (`\x0C`); every line is one token.
//! Lines keep their surrounding spaces so the author heuristic sees the same
//! fragments a PDF extraction would produce.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{ExtractError, PageExtractor, has_extension, split_fragments};
use crate::parser::Page;

/// Page separator in a token dump.
pub const PAGE_BREAK: char = '\x0C';

/// Reads `.txt` token dumps.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDumpExtractor;

impl TextDumpExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for TextDumpExtractor {
    fn name(&self) -> &'static str {
        "text-dump"
    }

    fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, "txt")
    }

    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<Page>, ExtractError> {
        let raw = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pages = parse_text_dump(&raw);
        debug!(pages = pages.len(), "token dump loaded");
        Ok(pages)
    }
}

/// Splits a token dump into pages.
///
/// A trailing page break does not start an extra page.
#[must_use]
pub fn parse_text_dump(raw: &str) -> Vec<Page> {
    let mut chunks: Vec<&str> = raw.split(PAGE_BREAK).collect();
    if chunks.len() > 1 && chunks.last().is_some_and(|last| last.trim().is_empty()) {
        chunks.pop();
    }
    if chunks.len() == 1 && chunks[0].trim().is_empty() {
        return Vec::new();
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| Page::new(index + 1, split_fragments(chunk)))
        .collect()
}
