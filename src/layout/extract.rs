//! Content stream interpretation.
//!
//! [`PageExtractor`] walks a page's content operators, tracking just enough
//! graphics and text state to place every shown string on the page, then
//! groups the resulting glyph runs into spans, lines and blocks.

use super::fonts::FontInfo;
use super::inline_image::strip_inline_images;
use super::objects::{dict_entry, inherited, number, page_geometry, resolve, stream_bytes};
use super::{Block, Line, PageGeometry, PageText, Rect, Span};
use crate::error::{StamperError, StamperResult};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Nesting limit for form XObjects painted from other forms.
const MAX_FORM_DEPTH: usize = 8;

/// TJ adjustment (1/1000 em) wide enough to count as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baseline drift, as a fraction of font size, still treated as the same line.
const SAME_LINE_TOLERANCE: f32 = 0.2;

/// Horizontal gap, as a fraction of font size, rendered as a space.
const SPACE_GAP: f32 = 0.15;

/// Horizontal gap, in font sizes, past which a run starts its own span.
const SPAN_GAP: f32 = 1.0;

/// Horizontal gap, in font sizes, past which a run on the same baseline
/// starts its own line.
const LINE_GAP: f32 = 3.0;

/// Vertical gap, in line heights, that starts a new block.
const BLOCK_GAP: f32 = 1.5;

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let values: Vec<f32> = operands.iter().filter_map(number).collect();
        match values.as_slice() {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// `self` applied first, then `other`.
    fn then(self, other: Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Graphics state, including the text state parameters saved by `q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Rc<FontInfo>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Text shown by one operator, positioned in top-left page space.
#[derive(Debug, Clone)]
struct GlyphRun {
    text: String,
    font: String,
    size: f32,
    left: f32,
    right: f32,
    baseline: f32,
    ascent: f32,
    descent: f32,
}

impl GlyphRun {
    fn bbox(&self) -> Rect {
        Rect::new(
            self.left,
            self.baseline - self.ascent * self.size,
            self.right,
            self.baseline - self.descent * self.size,
        )
    }
}

/// Extracts the positioned text model from pages of a loaded document.
pub struct PageExtractor<'a> {
    doc: &'a Document,
    fonts: RefCell<HashMap<ObjectId, Rc<FontInfo>>>,
}

impl<'a> PageExtractor<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            fonts: RefCell::new(HashMap::new()),
        }
    }

    /// Extracts one page. `number` is the 1-based page number used in reports.
    pub fn extract(&self, number: u32, page_id: ObjectId) -> StamperResult<PageText> {
        let geometry = page_geometry(self.doc, page_id);
        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| StamperError::pdf("Failed to read page content", Some(number), e))?;
        let resources = inherited(self.doc, page_id, b"Resources").and_then(|obj| obj.as_dict().ok());

        let mut interpreter = Interpreter::new(self, geometry, number);
        interpreter.run(&content, resources, 0)?;
        let blocks = assemble(interpreter.runs);

        log::debug!(
            "Page {}: {} block(s), {} line(s)",
            number,
            blocks.len(),
            blocks.iter().map(|b| b.lines.len()).sum::<usize>()
        );

        Ok(PageText {
            number,
            geometry,
            blocks,
        })
    }

    /// Extracts every page in document order.
    pub fn extract_all(&self) -> StamperResult<Vec<PageText>> {
        self.doc
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| self.extract(number, page_id))
            .collect()
    }

    fn font(&self, resources: Option<&'a Dictionary>, name: &[u8]) -> Rc<FontInfo> {
        let entry = resources
            .and_then(|r| dict_entry(self.doc, r, b"Font"))
            .and_then(|fonts| fonts.get(name).ok());

        let Some(entry) = entry else {
            log::warn!(
                "Font resource /{} not found; using default metrics",
                String::from_utf8_lossy(name)
            );
            return Rc::new(FontInfo::default());
        };

        let load = |obj: &Object| match resolve(self.doc, obj).as_dict() {
            Ok(dict) => FontInfo::load(self.doc, dict),
            Err(_) => FontInfo::default(),
        };

        match entry {
            Object::Reference(id) => self
                .fonts
                .borrow_mut()
                .entry(*id)
                .or_insert_with(|| Rc::new(load(entry)))
                .clone(),
            direct => Rc::new(load(direct)),
        }
    }
}

struct Interpreter<'e, 'a> {
    extractor: &'e PageExtractor<'a>,
    geometry: PageGeometry,
    page: u32,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    runs: Vec<GlyphRun>,
}

impl<'e, 'a> Interpreter<'e, 'a> {
    fn new(extractor: &'e PageExtractor<'a>, geometry: PageGeometry, page: u32) -> Self {
        Self {
            extractor,
            geometry,
            page,
            state: GraphicsState::default(),
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            runs: Vec::new(),
        }
    }

    fn run(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) -> StamperResult<()> {
        let stream = strip_inline_images(content);
        let content = Content::decode(&stream)
            .map_err(|e| StamperError::pdf("Failed to decode content stream", Some(self.page), e))?;

        for op in &content.operations {
            let operands = op.operands.as_slice();
            let arg = |i: usize| operands.get(i).and_then(number);

            match op.operator.as_str() {
                "q" => self.saved.push(self.state.clone()),
                "Q" => {
                    if let Some(state) = self.saved.pop() {
                        self.state = state;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        self.state.ctm = m.then(self.state.ctm);
                    }
                }
                "BT" => {
                    self.text_matrix = Matrix::IDENTITY;
                    self.line_matrix = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.state.font = Some(self.extractor.font(resources, name));
                    }
                    if let Some(size) = arg(1) {
                        self.state.font_size = size;
                    }
                }
                "Tc" => self.state.char_spacing = arg(0).unwrap_or(0.0),
                "Tw" => self.state.word_spacing = arg(0).unwrap_or(0.0),
                "Tz" => self.state.horizontal_scale = arg(0).unwrap_or(100.0) / 100.0,
                "TL" => self.state.leading = arg(0).unwrap_or(0.0),
                "Ts" => self.state.rise = arg(0).unwrap_or(0.0),
                "Td" => self.move_line(arg(0).unwrap_or(0.0), arg(1).unwrap_or(0.0)),
                "TD" => {
                    let ty = arg(1).unwrap_or(0.0);
                    self.state.leading = -ty;
                    self.move_line(arg(0).unwrap_or(0.0), ty);
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        self.text_matrix = m;
                        self.line_matrix = m;
                    }
                }
                "T*" => self.next_line(),
                "Tj" => {
                    if let Some(text) = operands.first() {
                        self.show(std::slice::from_ref(text));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        self.show(items);
                    }
                }
                "'" => {
                    self.next_line();
                    if let Some(text) = operands.first() {
                        self.show(std::slice::from_ref(text));
                    }
                }
                "\"" => {
                    self.state.word_spacing = arg(0).unwrap_or(0.0);
                    self.state.char_spacing = arg(1).unwrap_or(0.0);
                    self.next_line();
                    if let Some(text) = operands.get(2) {
                        self.show(std::slice::from_ref(text));
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.paint_form(name, resources, depth)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).then(self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.state.leading);
    }

    /// Shows strings (and TJ adjustments), advancing the text matrix.
    fn show(&mut self, items: &[Object]) {
        let font = self.state.font.clone().unwrap_or_default();
        let size = self.state.font_size;
        let scale = self.state.horizontal_scale;
        let rise = self.state.rise;

        let start = self.text_matrix.then(self.state.ctm);
        let mut text = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    for code in font.codes(bytes) {
                        let mut advance = font.width(code) / 1000.0 * size + self.state.char_spacing;
                        if !font.two_byte && code == 32 {
                            advance += self.state.word_spacing;
                        }
                        text.push_str(&font.unicode(code));
                        self.text_matrix = Matrix::translate(advance * scale, 0.0).then(self.text_matrix);
                    }
                }
                other => {
                    if let Some(adjust) = number(other) {
                        self.text_matrix =
                            Matrix::translate(-adjust / 1000.0 * size * scale, 0.0).then(self.text_matrix);
                        if -adjust > TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ') {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        if text.is_empty() {
            return;
        }

        let end = self.text_matrix.then(self.state.ctm);
        let (sx, sy) = start.apply(0.0, rise);
        let (ex, ey) = end.apply(0.0, rise);
        let from = self.geometry.to_page(sx, sy);
        let to = self.geometry.to_page(ex, ey);

        self.runs.push(GlyphRun {
            text,
            font: font.base_font.clone(),
            size: (size * start.vertical_scale()).abs(),
            left: from.x.min(to.x),
            right: from.x.max(to.x),
            baseline: from.y,
            ascent: font.ascent,
            descent: font.descent,
        });
    }

    /// Interprets a form XObject in place of its `Do` operator.
    fn paint_form(
        &mut self,
        name: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) -> StamperResult<()> {
        let doc = self.extractor.doc;
        let stream = resources
            .and_then(|r| dict_entry(doc, r, b"XObject"))
            .and_then(|xobjects| xobjects.get(name).ok())
            .map(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_stream().ok());

        let Some(stream) = stream else {
            return Ok(());
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Form".as_slice()) {
            return Ok(());
        }
        if depth >= MAX_FORM_DEPTH {
            log::warn!(
                "Page {}: form XObject /{} nested too deeply, skipping",
                self.page,
                String::from_utf8_lossy(name)
            );
            return Ok(());
        }

        let content = stream_bytes(stream)
            .map_err(|e| StamperError::pdf("Failed to decode form XObject", Some(self.page), e))?;
        let form_resources = dict_entry(doc, &stream.dict, b"Resources").or(resources);
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|obj| obj.as_array().ok())
            .and_then(|array| Matrix::from_operands(array))
            .unwrap_or(Matrix::IDENTITY);

        let saved_text = (self.text_matrix, self.line_matrix);
        self.saved.push(self.state.clone());
        self.state.ctm = matrix.then(self.state.ctm);

        let result = self.run(&content, form_resources, depth + 1);

        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
        (self.text_matrix, self.line_matrix) = saved_text;
        result
    }
}

struct LineBuilder {
    spans: Vec<Span>,
    baseline: f32,
    size: f32,
    right: f32,
}

impl LineBuilder {
    fn new(run: GlyphRun) -> Self {
        let mut line = Self {
            spans: Vec::new(),
            baseline: run.baseline,
            size: run.size,
            right: run.right,
        };
        line.spans.push(Span {
            bbox: run.bbox(),
            text: run.text,
            font: run.font,
            size: run.size,
        });
        line
    }

    fn accepts(&self, run: &GlyphRun) -> bool {
        let size = self.size.max(run.size).max(1.0);
        let gap = run.left - self.right;
        (run.baseline - self.baseline).abs() <= SAME_LINE_TOLERANCE * size
            && gap >= -size
            && gap <= LINE_GAP * size
    }

    fn push(&mut self, run: GlyphRun) {
        let gap = run.left - self.right;
        let detached = gap > SPAN_GAP * run.size.max(1.0);
        let spaced = gap > SPACE_GAP * run.size
            && !run.text.starts_with(' ')
            && self.spans.last().is_some_and(|s| !s.text.ends_with(' '));
        let bbox = run.bbox();
        self.right = self.right.max(run.right);
        self.size = self.size.max(run.size);

        if let Some(last) = self
            .spans
            .last_mut()
            .filter(|s| !detached && s.font == run.font && (s.size - run.size).abs() < 0.01)
        {
            if spaced {
                last.text.push(' ');
            }
            last.text.push_str(&run.text);
            last.bbox = last.bbox.union(&bbox);
            return;
        }

        let text = if spaced {
            format!(" {}", run.text)
        } else {
            run.text
        };
        self.spans.push(Span {
            text,
            bbox,
            font: run.font,
            size: run.size,
        });
    }

    fn finish(self) -> Line {
        let bbox = self
            .spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Line {
            spans: self.spans,
            bbox,
        }
    }
}

/// Groups glyph runs, in content order, into blocks of lines of spans.
fn assemble(runs: Vec<GlyphRun>) -> Vec<Block> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Option<LineBuilder> = None;

    for run in runs {
        if current.as_ref().is_some_and(|line| line.accepts(&run)) {
            if let Some(line) = current.as_mut() {
                line.push(run);
            }
            continue;
        }
        if let Some(line) = current.take() {
            lines.push(line.finish());
        }
        if !run.text.trim().is_empty() {
            current = Some(LineBuilder::new(run));
        }
    }
    if let Some(line) = current {
        lines.push(line.finish());
    }

    let mut blocks: Vec<Block> = Vec::new();
    for line in lines {
        let continues = blocks
            .last()
            .and_then(|block| block.lines.last())
            .is_some_and(|prev| {
                let height = prev.bbox.height().max(line.bbox.height());
                let gap = line.bbox.top - prev.bbox.bottom;
                gap <= BLOCK_GAP * height && line.bbox.bottom >= prev.bbox.top
            });

        match blocks.last_mut() {
            Some(block) if continues => {
                block.bbox = block.bbox.union(&line.bbox);
                block.lines.push(line);
            }
            _ => blocks.push(Block {
                bbox: line.bbox,
                lines: vec![line],
            }),
        }
    }
    blocks
}
