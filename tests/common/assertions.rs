//! Custom assertions for date stamping tests.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

#![allow(dead_code)]

use super::pdf_helpers::{extract_text, find_spans};
use datestamp::stamp::ANCHOR_OFFSET;
use std::path::Path;

/// Positions are compared with this tolerance, in points.
const POSITION_TOLERANCE: f32 = 0.5;

/// Asserts that a PDF exists, is non-empty and loads.
///
/// # Panics
/// Panics if the PDF is missing or cannot be parsed.
pub fn assert_valid_pdf(pdf_path: &Path) {
    assert!(
        pdf_path.exists(),
        "PDF should exist at '{}'",
        pdf_path.display()
    );

    let metadata = std::fs::metadata(pdf_path).expect("Failed to get PDF metadata");
    assert!(
        metadata.len() > 0,
        "PDF should not be empty at '{}'",
        pdf_path.display()
    );

    assert!(
        lopdf::Document::load(pdf_path).is_ok(),
        "PDF should load at '{}'",
        pdf_path.display()
    );
}

/// Asserts that `text` appears in the plain-text extraction of the PDF.
///
/// # Panics
/// Panics if the text is missing.
pub fn assert_text_present(pdf_path: &Path, text: &str) {
    let extracted = extract_text(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to extract text from '{}': {}", pdf_path.display(), e));
    assert!(
        extracted.contains(text),
        "'{}' should be present in PDF at '{}'",
        text,
        pdf_path.display()
    );
}

/// Asserts the date appears exactly `expected` times as a span of its own.
///
/// # Panics
/// Panics if the count differs.
pub fn assert_stamp_count(pdf_path: &Path, date: &str, expected: usize) {
    let found = find_spans(pdf_path, date)
        .unwrap_or_else(|e| panic!("Failed to read layout of '{}': {}", pdf_path.display(), e));
    assert_eq!(
        found.len(),
        expected,
        "Expected {} stamp(s) of '{}' in '{}', found on pages {:?}",
        expected,
        date,
        pdf_path.display(),
        found.iter().map(|(page, _)| *page).collect::<Vec<_>>()
    );
}

/// Asserts that a stamp of `date` sits right of the first span containing
/// `anchor` on `page`, vertically centred on it.
///
/// # Panics
/// Panics if either span is missing or the stamp is misplaced.
pub fn assert_stamped_after(pdf_path: &Path, page: u32, anchor: &str, date: &str) {
    let anchor_span = find_spans(pdf_path, anchor)
        .expect("Failed to read layout")
        .into_iter()
        .find(|(p, span)| *p == page && !span.text.contains(date))
        .map(|(_, span)| span)
        .unwrap_or_else(|| panic!("No '{}' span on page {}", anchor, page));

    let stamps: Vec<_> = find_spans(pdf_path, date)
        .expect("Failed to read layout")
        .into_iter()
        .filter(|(p, _)| *p == page)
        .map(|(_, span)| span)
        .collect();

    let expected_left = anchor_span.bbox.right + ANCHOR_OFFSET;
    let expected_baseline = anchor_span.bbox.vertical_center();
    let placed = stamps.iter().any(|stamp| {
        // The extractor puts the baseline 0.2 font sizes above the box bottom.
        let baseline = stamp.bbox.bottom - 0.2 * stamp.size;
        (stamp.bbox.left - expected_left).abs() < POSITION_TOLERANCE
            && (baseline - expected_baseline).abs() < POSITION_TOLERANCE
    });

    assert!(
        placed,
        "Expected '{}' at ({:.1}, {:.1}) after '{}' on page {}, found {:?}",
        date,
        expected_left,
        expected_baseline,
        anchor,
        page,
        stamps.iter().map(|s| s.bbox).collect::<Vec<_>>()
    );
}
