//! Glyph widths for standard fonts.
//!
//! Standard fonts are often referenced without a `/Widths` array, so the
//! AFM advance widths for printable ASCII are kept here. Bold and italic
//! faces of Helvetica and Times use the regular widths; Courier is
//! monospaced in every face.

/// Width used when nothing better is known, in 1/1000 em.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

const COURIER_WIDTH: f32 = 600.0;

/// Helvetica advance widths for codes 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Times-Roman advance widths for codes 32..=126.
#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

fn family(base_font: &str) -> Option<Family> {
    // Subset fonts carry a six-letter tag: ABCDEF+Helvetica
    let name = base_font
        .split_once('+')
        .map_or(base_font, |(_, rest)| rest)
        .to_ascii_lowercase();

    if name.contains("courier") {
        Some(Family::Courier)
    } else if name.contains("helvetica") || name.contains("arial") {
        Some(Family::Helvetica)
    } else if name.contains("times") {
        Some(Family::Times)
    } else {
        None
    }
}

/// AFM width of `code` in a standard font, or `None` if the font or code
/// is not covered.
pub fn standard_width(base_font: &str, code: u32) -> Option<f32> {
    let family = family(base_font)?;
    if family == Family::Courier {
        return Some(COURIER_WIDTH);
    }

    let index = code.checked_sub(32).filter(|i| *i < 95)? as usize;
    let table = match family {
        Family::Helvetica => &HELVETICA,
        Family::Times => &TIMES_ROMAN,
        Family::Courier => unreachable!("handled above"),
    };
    Some(table[index] as f32)
}
