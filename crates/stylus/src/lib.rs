//! Stylus: structuring and translation alignment for cuneiform transliterations.
//!
//! Stylus turns flat ATF line records (one row per physical line of a clay
//! tablet) into a nested surface → column → line document of classified
//! word tokens, and aligns free-text translations to the lines they render.
//!
//! # Core Principles
//!
//! - **Lossless**: every token renders back to its ATF text
//! - **Deterministic**: surface and column order follows first appearance
//! - **Total**: every translation ends matched, unmatched or unmatchable
//!
//! # Example
//!
//! ```no_run
//! use stylus::Stylus;
//!
//! let stylus = Stylus::new();
//! let report = stylus.align_files("lines.csv", "translations.csv").unwrap();
//!
//! println!("Tablets: {}", report.tablets.len());
//! println!("Matched: {}/{}", report.summary.matched, report.summary.total);
//! ```

pub mod alignment;
pub mod atf;
pub mod error;
pub mod input;

mod stylus;

pub use crate::stylus::{Stylus, StylusConfig, TabletView};
pub use alignment::{AlignmentConfig, AlignmentReport, TabletAlignment, TranslationMatch};
pub use atf::{StructuredDocument, StructuredLine, WordToken};
pub use error::{Result, StylusError};
pub use input::{FlatLineRecord, SourceMetadata, TranslationRecord};
