//! Anchor search over a document's text.
//!
//! Pages are extracted lazily and their lines visited as one flat sequence.
//! The search stops at the first line after which both anchors have been
//! found, so later pages are never extracted.

use super::writer::StampTarget;
use crate::domain::{Anchor, MatchState};
use crate::error::StamperResult;
use crate::layout::{Line, PageExtractor, PageGeometry, Point, Span};
use lopdf::{Document, ObjectId};

/// Horizontal distance between an anchor span's right edge and the stamp.
pub const ANCHOR_OFFSET: f32 = 10.0;

/// Where a stamp goes relative to the span that triggered it.
pub fn insertion_point(span: &Span) -> Point {
    Point::new(span.bbox.right + ANCHOR_OFFSET, span.bbox.vertical_center())
}

/// An anchor found in the document.
#[derive(Debug, Clone)]
pub struct AnchorHit {
    pub anchor: Anchor,
    /// Span whose box positions the stamp
    pub span: Span,
    pub target: StampTarget,
}

/// Result of scanning a document for anchors.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Hits in discovery order, at most one per anchor
    pub hits: Vec<AnchorHit>,
    pub state: MatchState,
    /// Pages whose text was extracted before the scan stopped
    pub pages_scanned: usize,
}

/// A line together with the page it came from.
struct PageLine {
    page: u32,
    page_id: ObjectId,
    geometry: PageGeometry,
    line: Line,
}

/// Every line of the document in page, block, line order.
///
/// A page is only extracted once the lines of the previous page are used up.
fn page_lines<'d>(
    doc: &'d Document,
    extractor: &'d PageExtractor<'d>,
) -> impl Iterator<Item = StamperResult<PageLine>> + 'd {
    doc.get_pages()
        .into_iter()
        .flat_map(move |(number, page_id)| match extractor.extract(number, page_id) {
            Ok(page) => {
                let geometry = page.geometry;
                page.blocks
                    .into_iter()
                    .flat_map(|block| block.lines)
                    .map(|line| {
                        Ok(PageLine {
                            page: number,
                            page_id,
                            geometry,
                            line,
                        })
                    })
                    .collect::<Vec<_>>()
            }
            Err(e) => vec![Err(e)],
        })
}

/// Finds the first `ENTERED:` span and the first `Date:` line.
pub fn scan(doc: &Document) -> StamperResult<ScanOutcome> {
    let extractor = PageExtractor::new(doc);
    let mut outcome = ScanOutcome::default();

    for item in page_lines(doc, &extractor) {
        let PageLine {
            page,
            page_id,
            geometry,
            line,
        } = item?;
        let line_text = line.full_text();

        for span in &line.spans {
            for anchor in Anchor::ALL {
                if outcome.state.needs(anchor) && anchor.matches(&span.text, &line_text) {
                    log::debug!("Page {}: '{}' matched in span {}", page, anchor, span.bbox);
                    outcome.state = outcome.state.record(anchor);
                    outcome.hits.push(AnchorHit {
                        anchor,
                        span: span.clone(),
                        target: StampTarget {
                            page,
                            page_id,
                            geometry,
                            at: insertion_point(span),
                        },
                    });
                }
            }
        }

        if outcome.state.is_complete() {
            outcome.pages_scanned = page as usize;
            return Ok(outcome);
        }
    }

    outcome.pages_scanned = doc.get_pages().len();
    Ok(outcome)
}
