//! Text anchors that trigger a date insertion.
//!
//! Two anchors exist and both are literal. `ENTERED:` may appear anywhere
//! inside a single span, while `Date:` must open the whole line.

use std::fmt;

/// Literal searched for inside a span.
pub const ENTERED_LITERAL: &str = "ENTERED:";

/// Literal a line's full text must start with.
pub const DATE_LITERAL: &str = "Date:";

/// One of the two anchors a date gets stamped beside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// A span whose trimmed text contains `ENTERED:`
    Entered,

    /// A span on a line whose trimmed text starts with `Date:`
    DateLine,
}

impl Anchor {
    /// Anchors in the order they are tested against each span.
    pub const ALL: [Anchor; 2] = [Anchor::Entered, Anchor::DateLine];

    /// The literal this anchor looks for.
    pub fn literal(self) -> &'static str {
        match self {
            Self::Entered => ENTERED_LITERAL,
            Self::DateLine => DATE_LITERAL,
        }
    }

    /// Tests a span against this anchor.
    ///
    /// `span_text` is the span's own text and `line_text` the concatenation
    /// of every span on its line. Both are trimmed here.
    pub fn matches(self, span_text: &str, line_text: &str) -> bool {
        match self {
            Self::Entered => span_text.trim().contains(ENTERED_LITERAL),
            Self::DateLine => line_text.trim().starts_with(DATE_LITERAL),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entered_is_a_substring_match() {
        assert!(Anchor::Entered.matches("ENTERED:", ""));
        assert!(Anchor::Entered.matches("  DATE ENTERED: ", ""));
        assert!(!Anchor::Entered.matches("Entered:", ""));
        assert!(!Anchor::Entered.matches("ENTERED", ""));
    }

    #[test]
    fn test_date_line_checks_the_line_not_the_span() {
        assert!(Anchor::DateLine.matches("anything", "Date: ____"));
        assert!(Anchor::DateLine.matches("", "   Date:"));
        assert!(!Anchor::DateLine.matches("Date:", "Signed Date:"));
        assert!(!Anchor::DateLine.matches("Date:", "date:"));
    }

    #[test]
    fn test_display_uses_literal() {
        assert_eq!(Anchor::Entered.to_string(), "ENTERED:");
        assert_eq!(Anchor::DateLine.to_string(), "Date:");
    }
}
