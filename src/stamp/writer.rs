//! Stamp writer trait and supporting types.
//!
//! A writer turns a located anchor into visible text on the page. The
//! default writes into the page content stream; an annotation writer is
//! available for viewers where the stamp should stay editable.

use crate::domain::TextStyle;
use crate::error::StamperResult;
use crate::layout::{PageGeometry, Point};
use lopdf::{Document, ObjectId};

/// Page location a stamp is written to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampTarget {
    /// 1-based page number
    pub page: u32,
    pub page_id: ObjectId,
    pub geometry: PageGeometry,
    /// Baseline origin of the stamp, in top-left page space
    pub at: Point,
}

/// Strategy for writing a date string onto a page.
pub trait StampWriter: Send + Sync {
    /// Writes `text` at `target` using `style`.
    fn write(
        &self,
        doc: &mut Document,
        target: &StampTarget,
        text: &str,
        style: &TextStyle,
    ) -> StamperResult<()>;

    /// Returns a human-readable name for this writer.
    fn name(&self) -> &str;
}
