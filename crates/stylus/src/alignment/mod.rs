//! Translation-to-line alignment.
//!
//! Translations arrive as free text, often prefixed with a line reference
//! (`o 5. the king went`). The alignment pass extracts that reference,
//! resolves it against the tablet's content lines, and falls back to the
//! translation's position when no reference is present.
//!
//! # Example
//!
//! ```
//! use stylus::alignment::Aligner;
//! use stylus::input::{FlatLineRecord, TranslationRecord};
//!
//! let lines = vec![FlatLineRecord::content(1, "5", "lugal")];
//! let translations = vec![TranslationRecord::new(7, "o 5. the king went")];
//!
//! let result = Aligner::new().align_tablet("P1", &lines, &translations);
//! assert_eq!(result.matches[0].line_id, Some(1));
//! assert_eq!(result.matches[0].confidence, Some(1.0));
//! ```

mod catalogue;
mod engine;
mod matcher;
mod reference;
mod report;

pub use catalogue::{CatalogueLine, LineCatalogue, normalize_line_number};
pub use engine::{Aligner, AlignmentConfig, AlignmentSummary, TabletAlignment, TranslationMatch};
pub use matcher::{AMBIGUITY_PENALTY, LineMatch, LineMatcher, MatchMethod, POSITIONAL_CONFIDENCE};
pub use reference::{
    Extraction, LineReference, PatternTier, UnmatchableReason, classify_unmatchable,
    extract_reference, find_reference,
};
pub use report::{AlignmentReport, REPORT_VERSION, report_path};
