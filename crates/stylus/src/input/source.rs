//! Input records and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Surface assumed when a record does not name one.
pub const DEFAULT_SURFACE: &str = "obverse";

/// One physical transliteration line as delivered by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatLineRecord {
    /// Storage identifier, returned by the matcher as the line id.
    pub id: u64,
    /// Tablet (P-number) the line belongs to.
    #[serde(default)]
    pub tablet_id: String,
    /// Line label, possibly primed (`3'.`) or a sub-line (`1.a`).
    pub line_number: String,
    /// Raw transliteration text.
    pub raw_text: String,
    /// Whether the line is a ruling marker.
    #[serde(default)]
    pub is_ruling: bool,
    /// Whether the line is a blank/state marker.
    #[serde(default)]
    pub is_blank: bool,
    /// Surface name (obverse, reverse, left edge, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_type: Option<String>,
    /// Column number, 0 when unspecified.
    #[serde(default)]
    pub column_number: u32,
}

impl FlatLineRecord {
    /// Create a content line on the obverse, column 0.
    pub fn content(id: u64, line_number: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id,
            tablet_id: String::new(),
            line_number: line_number.into(),
            raw_text: raw_text.into(),
            is_ruling: false,
            is_blank: false,
            surface_type: None,
            column_number: 0,
        }
    }

    /// Create a ruling marker.
    pub fn ruling(id: u64) -> Self {
        Self {
            is_ruling: true,
            ..Self::content(id, "", "")
        }
    }

    /// Create a blank marker, optionally carrying a description.
    pub fn blank(id: u64, raw_text: impl Into<String>) -> Self {
        Self {
            is_blank: true,
            ..Self::content(id, "", raw_text)
        }
    }

    /// Set the tablet.
    pub fn with_tablet(mut self, tablet_id: impl Into<String>) -> Self {
        self.tablet_id = tablet_id.into();
        self
    }

    /// Set the surface.
    pub fn with_surface(mut self, surface: impl Into<String>) -> Self {
        self.surface_type = Some(surface.into());
        self
    }

    /// Set the column.
    pub fn with_column(mut self, column: u32) -> Self {
        self.column_number = column;
        self
    }

    /// Surface name, falling back to the obverse.
    pub fn surface_name(&self) -> &str {
        match self.surface_type.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_SURFACE,
        }
    }

    /// Whether the raw text is a `$` state annotation.
    pub fn is_dollar_line(&self) -> bool {
        self.raw_text.trim_start().starts_with('$')
    }

    /// Whether this record holds transliterated content (not a ruling, blank
    /// or `$` annotation).
    pub fn is_content(&self) -> bool {
        !self.is_ruling && !self.is_blank && !self.is_dollar_line()
    }
}

/// A free-text translation attached to a tablet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Storage identifier; ordering by id gives the insertion order.
    pub id: u64,
    /// Tablet (P-number) the translation belongs to.
    #[serde(default)]
    pub tablet_id: String,
    /// Translation text.
    pub text: String,
    /// Language tag (e.g. "en").
    #[serde(default)]
    pub language: String,
}

impl TranslationRecord {
    /// Create an English translation record.
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            tablet_id: String::new(),
            text: text.into(),
            language: "en".to_string(),
        }
    }

    /// Set the tablet.
    pub fn with_tablet(mut self, tablet_id: impl Into<String>) -> Self {
        self.tablet_id = tablet_id.into();
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Rows grouped per tablet, tablets in first-appearance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabletRows<T> {
    tablets: IndexMap<String, Vec<T>>,
}

/// Line records grouped per tablet.
pub type LineTable = TabletRows<FlatLineRecord>;

/// Translation records grouped per tablet.
pub type TranslationTable = TabletRows<TranslationRecord>;

impl<T> TabletRows<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            tablets: IndexMap::new(),
        }
    }

    /// Append a row to a tablet, registering the tablet on first sight.
    pub fn push(&mut self, tablet_id: impl Into<String>, row: T) {
        self.tablets.entry(tablet_id.into()).or_default().push(row);
    }

    /// Rows for one tablet.
    pub fn get(&self, tablet_id: &str) -> Option<&[T]> {
        self.tablets.get(tablet_id).map(Vec::as_slice)
    }

    /// Tablet ids in first-appearance order.
    pub fn tablet_ids(&self) -> impl Iterator<Item = &str> {
        self.tablets.keys().map(String::as_str)
    }

    /// Iterate over (tablet id, rows).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.tablets
            .iter()
            .map(|(id, rows)| (id.as_str(), rows.as_slice()))
    }

    /// Number of tablets.
    pub fn tablet_count(&self) -> usize {
        self.tablets.len()
    }

    /// Total number of rows across tablets.
    pub fn row_count(&self) -> usize {
        self.tablets.values().map(Vec::len).sum()
    }

    /// Whether no rows were loaded.
    pub fn is_empty(&self) -> bool {
        self.tablets.is_empty()
    }

    /// Sort each tablet's rows in place, keeping equal rows in input order.
    pub(crate) fn sort_rows_by_key<K: Ord>(&mut self, mut key: impl FnMut(&T) -> K) {
        for rows in self.tablets.values_mut() {
            rows.sort_by_key(&mut key);
        }
    }
}

impl<T> Default for TabletRows<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A row that knows which tablet it belongs to.
pub trait TabletRow {
    fn tablet_id(&self) -> &str;
}

impl TabletRow for FlatLineRecord {
    fn tablet_id(&self) -> &str {
        &self.tablet_id
    }
}

impl TabletRow for TranslationRecord {
    fn tablet_id(&self) -> &str {
        &self.tablet_id
    }
}

/// Group rows by their own tablet id.
impl<T: TabletRow> FromIterator<T> for TabletRows<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Self::new();
        for row in iter {
            table.push(row.tablet_id().to_string(), row);
        }
        table
    }
}

/// Metadata about a loaded input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of distinct tablets.
    pub tablet_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        tablet_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            tablet_count,
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_defaults_to_obverse() {
        let line = FlatLineRecord::content(1, "1.", "a-na");
        assert_eq!(line.surface_name(), "obverse");

        let line = line.with_surface("  ");
        assert_eq!(line.surface_name(), "obverse");

        let line = FlatLineRecord::content(2, "1.", "a-na").with_surface("reverse");
        assert_eq!(line.surface_name(), "reverse");
    }

    #[test]
    fn test_record_kinds() {
        assert!(FlatLineRecord::content(1, "1.", "lugal").is_content());
        assert!(!FlatLineRecord::ruling(2).is_content());
        assert!(!FlatLineRecord::blank(3, "").is_content());
        assert!(!FlatLineRecord::content(4, "", "$ broken").is_content());
    }

    #[test]
    fn test_collect_groups_by_record_tablet() {
        let lines: LineTable = vec![
            FlatLineRecord::content(1, "1", "a").with_tablet("P2"),
            FlatLineRecord::content(2, "1", "b").with_tablet("P1"),
            FlatLineRecord::ruling(3).with_tablet("P2"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = lines.tablet_ids().collect();
        assert_eq!(ids, vec!["P2", "P1"]);
        let p2: Vec<u64> = lines.get("P2").unwrap().iter().map(|l| l.id).collect();
        assert_eq!(p2, vec![1, 3]);

        let translations: TranslationTable = vec![TranslationRecord::new(7, "x").with_tablet("P1")]
            .into_iter()
            .collect();
        assert_eq!(translations.get("P1").unwrap()[0].tablet_id, "P1");
        assert_eq!(translations.row_count(), 1);
    }

    #[test]
    fn test_tablet_rows_keep_first_appearance_order() {
        let mut rows = TranslationTable::new();
        rows.push("P2", TranslationRecord::new(1, "a"));
        rows.push("P1", TranslationRecord::new(2, "b"));
        rows.push("P2", TranslationRecord::new(3, "c"));

        let ids: Vec<&str> = rows.tablet_ids().collect();
        assert_eq!(ids, vec!["P2", "P1"]);
        assert_eq!(rows.get("P2").map(|r| r.len()), Some(2));
        assert_eq!(rows.row_count(), 3);
    }
}
