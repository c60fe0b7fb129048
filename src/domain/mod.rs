//! Domain models for date stamping.
//!
//! This module holds the rules that do not depend on any PDF backend:
//! which text counts as an anchor, how far a search has progressed,
//! which fonts a stamp may use, and the options a caller passes in.

pub mod anchor;
pub mod font;
pub mod match_state;
pub mod style;

pub use anchor::{Anchor, DATE_LITERAL, ENTERED_LITERAL};
pub use font::StandardFont;
pub use match_state::MatchState;
pub use style::{Rgb, StampOptions, TextStyle};
