//! Statistics about a stamping run.

use crate::domain::{Anchor, MatchState};
use crate::layout::Point;

/// One date string written into the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub anchor: Anchor,

    /// 1-based page number
    pub page: u32,

    /// Baseline origin of the inserted text, top-left page space
    pub at: Point,
}

/// Statistics about a stamping operation.
#[derive(Debug, Clone, Default)]
pub struct StampReport {
    /// Pages extracted before the scan stopped
    pub pages_scanned: usize,

    /// Pages in the output document
    pub page_count: usize,

    /// Insertions in the order they were made
    pub insertions: Vec<Insertion>,

    /// Anchors found
    pub state: MatchState,

    /// The date string that was inserted
    pub date: String,
}

impl StampReport {
    /// Returns true if any date was inserted.
    pub fn has_insertions(&self) -> bool {
        !self.insertions.is_empty()
    }

    /// The insertion made for `anchor`, if it was found.
    pub fn insertion(&self, anchor: Anchor) -> Option<&Insertion> {
        self.insertions.iter().find(|i| i.anchor == anchor)
    }
}
