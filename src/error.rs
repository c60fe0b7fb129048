//! Error types for the date stamping library.
//!
//! Validation failures (missing source, unsupported font) are raised before
//! any document is opened. Everything the PDF backend reports afterwards is
//! carried through unchanged in [`StamperError::Pdf`] or [`StamperError::Io`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stamping operations.
pub type StamperResult<T> = Result<T, StamperError>;

/// Error type for all stamping operations.
#[derive(Debug, Error)]
pub enum StamperError {
    /// Source document does not exist
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Font name is not one of the standard PDF fonts
    #[error("Font '{name}' is not supported; run `datestamp fonts` for the accepted names")]
    UnsupportedFont { name: String },

    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error reported by the PDF object layer (parse, decode, save)
    #[error("{}", pdf_message(.message, .page))]
    Pdf {
        message: String,
        page: Option<u32>,
        #[source]
        source: Option<lopdf::Error>,
    },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Auxiliary backend error (plain-text extraction)
    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },
}

fn pdf_message(message: &str, page: &Option<u32>) -> String {
    match page {
        Some(p) => format!("PDF processing error on page {}: {}", p, message),
        None => format!("PDF processing error: {}", message),
    }
}

impl StamperError {
    /// Wraps a lopdf error with a message and optional page number.
    pub fn pdf(message: impl Into<String>, page: Option<u32>, source: lopdf::Error) -> Self {
        Self::Pdf {
            message: message.into(),
            page,
            source: Some(source),
        }
    }

    /// Structural problem found while walking the document, without a lopdf cause.
    pub fn malformed(message: impl Into<String>, page: Option<u32>) -> Self {
        Self::Pdf {
            message: message.into(),
            page,
            source: None,
        }
    }
}

impl From<lopdf::Error> for StamperError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf {
            message: err.to_string(),
            page: None,
            source: Some(err),
        }
    }
}
