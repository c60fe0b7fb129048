//! Date stamping: anchor scan, writers and the service that ties them together.
//!
//! The service validates options, opens the source, scans it for anchors,
//! hands each hit to a [`StampWriter`] and saves the result to a new file.

pub mod annotation;
pub mod content;
mod page_edit;
pub mod report;
pub mod scan;
pub mod writer;

pub use annotation::AnnotationWriter;
pub use content::ContentStreamWriter;
pub use report::{Insertion, StampReport};
pub use scan::{insertion_point, scan, AnchorHit, ScanOutcome, ANCHOR_OFFSET};
pub use writer::{StampTarget, StampWriter};

use crate::domain::StampOptions;
use crate::error::{StamperError, StamperResult};
use crate::layout::{PageExtractor, PageText};
use lopdf::Document;
use std::path::Path;

/// Stamping service coordinating scan and writer.
pub struct StampService {
    writer: Box<dyn StampWriter>,
}

impl StampService {
    /// Creates a new service with the specified writer.
    pub fn new(writer: Box<dyn StampWriter>) -> Self {
        Self { writer }
    }

    /// Creates a service that writes into page content streams.
    pub fn with_content_writer() -> Self {
        Self::new(Box::new(ContentStreamWriter::new()))
    }

    /// Creates a service that writes FreeText annotations.
    pub fn with_annotation_writer() -> Self {
        Self::new(Box::new(AnnotationWriter::new()))
    }

    /// Name of the configured writer.
    pub fn writer_name(&self) -> &str {
        self.writer.name()
    }

    /// Stamps the date next to the first `ENTERED:` span and the first
    /// `Date:` line of `input`, writing the result to `output`.
    ///
    /// # Errors
    /// * `UnsupportedFont` if `options.font_name` is not a standard font
    /// * `NotFound` if `input` does not exist
    /// * `InvalidInput` if `output` is the same file as `input`
    /// * `Pdf` / `Io` for failures while loading, editing or saving
    pub fn stamp(
        &self,
        input: &Path,
        output: &Path,
        options: &StampOptions,
    ) -> StamperResult<StampReport> {
        let style = options.text_style()?;

        if !input.exists() {
            return Err(StamperError::NotFound {
                path: input.to_path_buf(),
            });
        }
        if is_same_file(input, output) {
            return Err(StamperError::InvalidInput {
                parameter: "output".to_string(),
                reason: "Output path must differ from the input path".to_string(),
            });
        }

        let mut doc = load(input)?;
        let outcome = scan(&doc)?;
        let date = options.resolved_date();

        let mut insertions = Vec::with_capacity(outcome.hits.len());
        for hit in &outcome.hits {
            self.writer.write(&mut doc, &hit.target, &date, &style)?;
            if options.verbose {
                println!("[Page {}] Date inserted after '{}'", hit.target.page, hit.anchor);
            }
            insertions.push(Insertion {
                anchor: hit.anchor,
                page: hit.target.page,
                at: hit.target.at,
            });
        }

        doc.save(output).map_err(|e| StamperError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;
        if options.verbose {
            println!("✔ PDF saved to {}", output.display());
        }
        log::info!(
            "{}: {} insertion(s) using {}",
            output.display(),
            insertions.len(),
            self.writer.name()
        );

        Ok(StampReport {
            pages_scanned: outcome.pages_scanned,
            page_count: doc.get_pages().len(),
            insertions,
            state: outcome.state,
            date,
        })
    }

    /// Extracts the block/line/span layout of every page.
    pub fn extract_layout(&self, input: &Path) -> StamperResult<Vec<PageText>> {
        if !input.exists() {
            return Err(StamperError::NotFound {
                path: input.to_path_buf(),
            });
        }
        let doc = load(input)?;
        let pages = PageExtractor::new(&doc).extract_all()?;
        Ok(pages)
    }

    /// Extracts plain text from a PDF for analysis.
    pub fn extract_text(&self, input: &Path) -> StamperResult<String> {
        let bytes = std::fs::read(input).map_err(|e| StamperError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| StamperError::Backend {
            backend: "pdf-extract".to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for StampService {
    fn default() -> Self {
        Self::with_content_writer()
    }
}

/// Stamps `input` into `output` with the content-stream writer.
pub fn insert_date_into_pdf(
    input: &Path,
    output: &Path,
    options: &StampOptions,
) -> StamperResult<StampReport> {
    StampService::with_content_writer().stamp(input, output, options)
}

fn load(input: &Path) -> StamperResult<Document> {
    let doc = Document::load(input)
        .map_err(|e| StamperError::pdf(format!("Failed to open {}", input.display()), None, e))?;
    log::debug!("Loaded {} ({} page(s))", input.display(), doc.get_pages().len());
    Ok(doc)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
