//! PDF page extraction backed by `lopdf`.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{ExtractError, PageExtractor, has_extension};
use crate::parser::Page;

/// `TJ` adjustments below this (in thousandths of a text unit) read as a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -100.0;

/// Extracts text fragments from each page of a PDF.
///
/// Every text-showing operation (`Tj`, `TJ`, `'` and `"`) becomes one token,
/// in content-stream order. Strings are decoded with the encoding of the
/// font selected by the last `Tf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, "pdf")
    }

    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<Page>, ExtractError> {
        let document = Document::load(path).map_err(|err| ExtractError::pdf(path, err))?;
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), "PDF loaded");

        let mut pages = Vec::with_capacity(page_ids.len());
        for (index, page_id) in page_ids.into_iter().enumerate() {
            let tokens =
                page_tokens(&document, page_id).map_err(|err| ExtractError::pdf(path, err))?;
            let page = Page::new(index + 1, tokens);
            trace!(page = page.number, tokens = page.len(), "page extracted");
            pages.push(page);
        }
        Ok(pages)
    }
}

/// Collects one token per text-showing operation on a page.
fn page_tokens(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let mut encodings = BTreeMap::new();
    for (name, font) in document.get_page_fonts(page_id)? {
        match font.get_font_encoding(document) {
            Ok(encoding) => {
                encodings.insert(name, encoding);
            }
            Err(err) => debug!(
                font = %String::from_utf8_lossy(&name),
                error = %err,
                "font encoding unavailable, using byte decoding"
            ),
        }
    }

    let content = Content::decode(&document.get_page_content(page_id)?)?;
    let mut current_font: Option<Vec<u8>> = None;
    let mut tokens = Vec::new();
    for operation in &content.operations {
        let operands: &[Object] = match operation.operator.as_str() {
            "Tf" => {
                current_font = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .map(<[u8]>::to_vec);
                continue;
            }
            "Tj" | "TJ" | "'" => operation.operands.as_slice(),
            // aw ac string
            "\"" => operation.operands.get(2..).unwrap_or_default(),
            _ => continue,
        };

        let encoding = current_font.as_ref().and_then(|name| encodings.get(name));
        let mut text = String::new();
        for operand in operands {
            collect_text(&mut text, operand, &|bytes: &[u8]| match encoding {
                Some(encoding) => Document::decode_text(encoding, bytes),
                None => Ok(decode_bytes(bytes)),
            })?;
        }
        if !text.trim().is_empty() {
            tokens.push(text);
        }
    }
    Ok(tokens)
}

/// Appends the text carried by a `Tj`/`TJ` operand.
fn collect_text(
    text: &mut String,
    operand: &Object,
    decode: &dyn Fn(&[u8]) -> lopdf::Result<String>,
) -> lopdf::Result<()> {
    match operand {
        Object::String(bytes, _) => text.push_str(&decode(bytes)?),
        Object::Array(items) => {
            for item in items {
                collect_text(text, item, decode)?;
            }
        }
        Object::Integer(_) | Object::Real(_) => {
            if operand.as_float().is_ok_and(|gap| gap < WORD_GAP_ADJUSTMENT) {
                text.push(' ');
            }
        }
        _ => {}
    }
    Ok(())
}

/// Decodes a string with no usable font encoding: UTF-16BE when it carries
/// a byte order mark, otherwise one byte per character.
fn decode_bytes(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        }
        _ => bytes.iter().copied().map(char::from).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lopdf::content::Operation;
    use lopdf::{Stream, dictionary};

    use super::*;

    /// Writes a one-page PDF whose content stream is `operations`.
    fn write_pdf(path: &Path, operations: Vec<Operation>) {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = document.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content { operations };
        let content_id =
            document.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.save(path).unwrap();
    }

    #[test]
    fn test_pdf_extractor_handles_pdf_extension() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_handle(Path::new("booklist.pdf")));
        assert!(extractor.can_handle(Path::new("BOOKLIST.PDF")));
        assert!(!extractor.can_handle(Path::new("booklist.txt")));
        assert_eq!(extractor.name(), "pdf");
    }

    #[test]
    fn test_pdf_extractor_rejects_non_pdf_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, "not a pdf").unwrap();
        let err = PdfExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf { .. }));
    }

    #[test]
    fn test_pdf_extractor_splits_cells_within_one_text_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booklist.pdf");
        write_pdf(
            &path,
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("BIO 202 03")]),
                Operation::new("Td", vec![120.into(), 0.into()]),
                Operation::new("Tj", vec![Object::string_literal("SMITH J")]),
                Operation::new("Td", vec![120.into(), 0.into()]),
                Operation::new(
                    "TJ",
                    vec![Object::Array(vec![Object::string_literal("01/15/2025")])],
                ),
                Operation::new("ET", vec![]),
            ],
        );

        let pages = PdfExtractor::new().extract(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].tokens, ["BIO 202 03", "SMITH J", "01/15/2025"]);
    }

    #[test]
    fn test_pdf_extractor_keeps_trailing_space_and_word_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authors.pdf");
        write_pdf(
            &path,
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Tj", vec![Object::string_literal("MARTIN ")]),
                Operation::new("'", vec![Object::string_literal("LOPEZ")]),
                Operation::new(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::string_literal("INTRO"),
                        Object::Integer(-250),
                        Object::string_literal("TO BIO"),
                    ])],
                ),
                Operation::new("Tj", vec![Object::string_literal("   ")]),
                Operation::new("ET", vec![]),
            ],
        );

        let pages = PdfExtractor::new().extract(&path).unwrap();
        assert_eq!(pages[0].tokens, ["MARTIN ", "LOPEZ", "INTRO TO BIO"]);
    }

    #[test]
    fn test_decode_bytes_without_font() {
        assert_eq!(decode_bytes(b"ABC"), "ABC");
        assert_eq!(decode_bytes(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "A\u{e9}");
    }
}
