//! PDF text extraction

use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

/// Extract the text layer of a PDF, page by page, in page order.
///
/// Pages without a text layer (scanned pages) contribute nothing.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let document = Document::load(path)
        .with_context(|| format!("Failed to load PDF: {}", path.display()))?;

    let mut pages_text = Vec::new();
    for (page_num, _object_id) in document.get_pages() {
        match document.extract_text(&[page_num]) {
            Ok(page_text) => {
                let trimmed = page_text.trim();
                if !trimmed.is_empty() {
                    pages_text.push(trimmed.to_string());
                }
            }
            Err(e) => {
                log::warn!(
                    "Could not extract text from page {} of {}: {}",
                    page_num,
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(pages_text.join("\n"))
}

/// Build a one-page PDF containing the given line of text. Test fixture.
#[cfg(test)]
pub(crate) fn write_test_pdf(path: &Path, text: &str) {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
