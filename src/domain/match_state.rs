//! Progress of an anchor search across a document.

use super::Anchor;

/// Which anchors have been stamped so far.
///
/// Each anchor is recorded at most once per document. `Both` is terminal:
/// once reached, the scan stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchState {
    #[default]
    Neither,
    EnteredOnly,
    DateOnly,
    Both,
}

impl MatchState {
    /// Returns true if `anchor` has not been recorded yet.
    pub fn needs(self, anchor: Anchor) -> bool {
        !self.has(anchor)
    }

    /// Returns true if `anchor` has been recorded.
    pub fn has(self, anchor: Anchor) -> bool {
        matches!(
            (self, anchor),
            (Self::Both, _)
                | (Self::EnteredOnly, Anchor::Entered)
                | (Self::DateOnly, Anchor::DateLine)
        )
    }

    /// State after recording `anchor`. Recording twice is a no-op.
    pub fn record(self, anchor: Anchor) -> Self {
        match (self, anchor) {
            (Self::Neither, Anchor::Entered) => Self::EnteredOnly,
            (Self::Neither, Anchor::DateLine) => Self::DateOnly,
            (Self::EnteredOnly, Anchor::DateLine) | (Self::DateOnly, Anchor::Entered) => {
                Self::Both
            }
            (state, _) => state,
        }
    }

    /// Both anchors found.
    pub fn is_complete(self) -> bool {
        self == Self::Both
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_both_in_either_order() {
        let state = MatchState::default()
            .record(Anchor::Entered)
            .record(Anchor::DateLine);
        assert!(state.is_complete());

        let state = MatchState::default()
            .record(Anchor::DateLine)
            .record(Anchor::Entered);
        assert!(state.is_complete());
    }

    #[test]
    fn test_recording_twice_is_idempotent() {
        let state = MatchState::default().record(Anchor::Entered);
        assert_eq!(state.record(Anchor::Entered), MatchState::EnteredOnly);
        assert!(state.has(Anchor::Entered));
        assert!(state.needs(Anchor::DateLine));
        assert!(!state.is_complete());
    }

    #[test]
    fn test_neither_needs_everything() {
        let state = MatchState::Neither;
        assert!(Anchor::ALL.iter().all(|a| state.needs(*a)));
    }
}
