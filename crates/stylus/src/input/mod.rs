//! Input records and delimited-file readers.

mod parser;
mod source;

pub use parser::{InputConfig, RecordReader};
pub use source::{
    DEFAULT_SURFACE, FlatLineRecord, LineTable, SourceMetadata, TabletRow, TabletRows,
    TranslationRecord, TranslationTable,
};
