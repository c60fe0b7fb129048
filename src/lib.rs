//! Date stamping for PDF forms.
//!
//! This library finds the `ENTERED:` and `Date:` fields of a PDF form and
//! writes a date string next to each, producing a new document. Text
//! positions come from a span-level layout model built directly from the
//! page content streams.
//!
//! # Features
//!
//! - **Anchor scan**: first span containing `ENTERED:`, first line starting with `Date:`
//! - **Early exit**: pages after the one completing both anchors are never read
//! - **Standard fonts**: any of the 14 base PDF fonts, by full or short name
//! - **Two writers**: page content overlay or editable FreeText annotation
//!
//! # Architecture
//!
//! - [`domain`]: Anchors, match state, fonts and stamp options
//! - [`layout`]: Page text model and content-stream extraction
//! - [`stamp`]: Anchor scan, writers and the service layer
//! - [`error`]: Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use datestamp::{insert_date_into_pdf, StampOptions};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = insert_date_into_pdf(
//!     Path::new("form.pdf"),
//!     Path::new("form_dated.pdf"),
//!     &StampOptions::new().with_date("2024-03-15"),
//! )?;
//! println!("{} date(s) inserted", report.insertions.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Annotation writer with custom style
//!
//! ```no_run
//! use datestamp::{Rgb, StampOptions, StampService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = StampService::with_annotation_writer();
//! let options = StampOptions::new()
//!     .with_font("helv")
//!     .with_font_size(10.0)
//!     .with_color(Rgb::new(0.0, 0.0, 1.0))
//!     .quiet();
//!
//! service.stamp(Path::new("form.pdf"), Path::new("out.pdf"), &options)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Font lookup
//!
//! ```
//! use datestamp::StandardFont;
//!
//! assert_eq!(StandardFont::from_name("tiro"), Some(StandardFont::TimesRoman));
//! assert_eq!(StandardFont::from_name("Helvetica-Bold"), Some(StandardFont::HelveticaBold));
//! assert!(StandardFont::from_name("comic-sans").is_none());
//! ```

// Public API
pub mod domain;
pub mod error;
pub mod layout;
pub mod stamp;

// Re-exports for convenient access
pub use domain::{Anchor, MatchState, Rgb, StampOptions, StandardFont, TextStyle};
pub use error::{StamperError, StamperResult};
pub use layout::{Block, Line, PageText, Rect, Span};
pub use stamp::{
    insert_date_into_pdf, AnnotationWriter, ContentStreamWriter, Insertion, StampReport,
    StampService, StampWriter,
};
