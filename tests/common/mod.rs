//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Custom assertions
//! - Test fixtures and builders
//! - PDF construction and inspection helpers

pub mod assertions;
pub mod fixtures;
pub mod pdf_helpers;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use pdf_helpers::*;
