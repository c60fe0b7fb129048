//! PDF construction and inspection helpers.

#![allow(dead_code)]

use anyhow::Result;
use datestamp::{Span, StampService};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Content stream operators showing `text` in Helvetica at a user-space
/// baseline origin.
pub fn text_at(x: f32, y: f32, text: &str) -> String {
    format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", x, y, text)
}

/// Writes an uncompressed US Letter PDF with one content stream per page.
///
/// Every page shares a resource dictionary with Helvetica as `/F1` and
/// Courier as `/F2`.
pub fn build_raw_pdf(path: &Path, pages: &[String]) -> Result<PathBuf> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let courier = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => helvetica, "F2" => courier },
    });

    let mut kids: Vec<Object> = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog);

    doc.save(path)?;
    Ok(path.to_path_buf())
}

/// Extracts text through `pdf-extract`, independent of this crate's layout model.
pub fn extract_text(pdf_path: &Path) -> Result<String> {
    pdf_extract::extract_text(pdf_path).map_err(|e| anyhow::anyhow!("Failed to extract text: {}", e))
}

/// Every span in the document whose text contains `needle`, with its page number.
pub fn find_spans(pdf_path: &Path, needle: &str) -> Result<Vec<(u32, Span)>> {
    let pages = StampService::default().extract_layout(pdf_path)?;
    Ok(pages
        .into_iter()
        .flat_map(|page| {
            let number = page.number;
            page.blocks
                .into_iter()
                .flat_map(|block| block.lines)
                .flat_map(|line| line.spans)
                .filter(|span| span.text.contains(needle))
                .map(move |span| (number, span))
                .collect::<Vec<_>>()
        })
        .collect())
}

/// Counts spans containing `needle`.
pub fn count_spans(pdf_path: &Path, needle: &str) -> Result<usize> {
    Ok(find_spans(pdf_path, needle)?.len())
}

/// Number of pages in the document.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    Ok(Document::load(pdf_path)?.get_pages().len())
}

/// Validates that a PDF is loadable and has basic structure.
pub fn is_valid_pdf(pdf_path: &Path) -> bool {
    Document::load(pdf_path).is_ok()
}
