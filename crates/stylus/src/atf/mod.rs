//! ATF transliteration: tokenizing, structuring, legends and raw text.

mod determinative;
mod document;
mod legend;
mod raw_text;
mod surface;
mod tokenizer;

pub use determinative::{DeterminativeInfo, UNKNOWN_DETERMINATIVE_TYPE, lookup_determinative};
pub use document::{
    Column, CompositeRef, RULING_TEXT, StructuredDocument, StructuredLine, Surface,
    structure_document, structure_line,
};
pub use legend::{LegendEntry, LegendFeature, generate_legend};
pub use raw_text::{DEFAULT_BLANK, DEFAULT_RULING, raw_line, reconstruct_raw_text};
pub use surface::{canonical_surface, normalize_surface, surface_label};
pub use tokenizer::{
    DeterminativePosition, Tokenizer, TrailingDeterminative, WordToken, normalize, render_line,
    tokenize,
};
