//! Test fixtures and PDF builders.
//!
//! Provides builders for creating form-like test PDFs, following the
//! Builder pattern for clean test setup.

#![allow(dead_code)]

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Date used by tests that need a fixed, recognisable stamp.
pub const TEST_DATE: &str = "2024-03-15";

/// Vertical distance between consecutive lines, in millimetres.
const LINE_SPACING: f32 = 10.0;

/// Builder for creating test PDFs with one text line per `use_text` call.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_line("Intake Form")
///     .with_line("ENTERED: ____")
///     .new_page()
///     .with_line("Date: ________")
///     .build(Path::new("/tmp/form.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    font_size: f32,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    /// Creates a new test PDF builder with one empty A4 page.
    pub fn new() -> Self {
        Self {
            title: "Test Form".to_string(),
            pages: vec![Vec::new()],
            font_size: 12.0,
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line of text to the current page.
    pub fn with_line(mut self, text: &str) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(text.to_string());
        }
        self
    }

    /// Starts a new page; following lines go there.
    pub fn new_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Sets the font size of every line.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (index, lines) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(self.page_width, self.page_height, "Layer 1")
            };
            let current_layer = doc.get_page(page).get_layer(layer);

            for (row, line) in lines.iter().enumerate() {
                let y = 270.0 - row as f32 * LINE_SPACING;
                current_layer.use_text(line.as_str(), self.font_size, Mm(20.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;

        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single page form with both fields, each appearing once.
pub fn create_form(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Intake Form")
        .with_line("Patient Intake")
        .with_line("Name: Jane Doe")
        .with_line("ENTERED: ____________")
        .with_line("Date: ________________")
        .build(path)
}

/// Form with the `ENTERED:` label only.
pub fn create_entered_only_form(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_line("Patient Intake")
        .with_line("ENTERED: ____________")
        .with_line("Signature: __________")
        .build(path)
}

/// Form where both fields repeat on later pages.
pub fn create_repeating_form(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_line("ENTERED: ____________")
        .with_line("Date: ________________")
        .new_page()
        .with_line("ENTERED: ____________")
        .with_line("Date: ________________")
        .new_page()
        .with_line("Date: ________________")
        .build(path)
}

/// Form without either field.
pub fn create_plain_document(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_line("Meeting notes")
        .with_line("Nothing to stamp here")
        .build(path)
}
