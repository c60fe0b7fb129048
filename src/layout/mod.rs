//! Positioned text model of a PDF page.
//!
//! Pages are read into blocks of lines of spans. A span is a run of text in
//! a single font and size with its bounding box. Coordinates use a top-left
//! origin relative to the page's MediaBox with y growing downward, so for
//! every box `top <= bottom`.

pub mod encoding;
pub mod extract;
pub mod fonts;
mod inline_image;
pub mod metrics;
pub(crate) mod objects;

pub use extract::PageExtractor;
pub use objects::page_geometry;

use std::fmt;

/// A point in top-left page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in top-left page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn vertical_center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Page box used to convert between PDF user space and top-left page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// MediaBox as `[x0, y0, x1, y1]` in user space
    pub media_box: [f32; 4],
}

impl PageGeometry {
    /// US Letter, used when a page carries no usable MediaBox.
    pub const LETTER: PageGeometry = PageGeometry {
        media_box: [0.0, 0.0, 612.0, 792.0],
    };

    pub fn new(media_box: [f32; 4]) -> Self {
        let [ax, ay, bx, by] = media_box;
        Self {
            media_box: [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)],
        }
    }

    pub fn width(&self) -> f32 {
        self.media_box[2] - self.media_box[0]
    }

    pub fn height(&self) -> f32 {
        self.media_box[3] - self.media_box[1]
    }

    /// User-space coordinates to top-left page space.
    pub fn to_page(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.media_box[0], self.media_box[3] - y)
    }

    /// Top-left page space back to user-space coordinates.
    pub fn to_user(&self, point: Point) -> (f32, f32) {
        (point.x + self.media_box[0], self.media_box[3] - point.y)
    }
}

/// Smallest unit of extracted text sharing one font and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bbox: Rect,
    /// `/BaseFont` of the font the span was shown with
    pub font: String,
    /// Effective size in points after text and graphics scaling
    pub size: f32,
}

/// Spans sharing a baseline, in reading order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
    pub bbox: Rect,
}

impl Line {
    /// Concatenated span text, trimmed.
    pub fn full_text(&self) -> String {
        let text: String = self.spans.iter().map(|s| s.text.as_str()).collect();
        text.trim().to_string()
    }
}

/// Lines grouped by vertical proximity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub lines: Vec<Line>,
    pub bbox: Rect,
}

/// All text of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// 1-based page number
    pub number: u32,
    pub geometry: PageGeometry,
    pub blocks: Vec<Block>,
}

impl PageText {
    /// Every line on the page in block order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    pub fn span_count(&self) -> usize {
        self.lines().map(|l| l.spans.len()).sum()
    }
}
