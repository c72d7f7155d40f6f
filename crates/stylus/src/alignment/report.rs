//! Alignment reports and their JSON persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::{AlignmentSummary, TabletAlignment, TranslationMatch};
use crate::error::{Result, StylusError};
use crate::input::SourceMetadata;

/// Current report format version.
pub const REPORT_VERSION: &str = "1.0";

/// The outcome of aligning a translation file against a line file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_source: Option<SourceMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations_source: Option<SourceMetadata>,
    pub tablets: Vec<TabletAlignment>,
    /// Totals over all tablets.
    pub summary: AlignmentSummary,
}

impl AlignmentReport {
    /// Build a report from per-tablet results.
    pub fn new(tablets: Vec<TabletAlignment>) -> Self {
        let mut summary = AlignmentSummary::default();
        for tablet in &tablets {
            summary.merge(&tablet.summary);
        }

        Self {
            version: REPORT_VERSION.to_string(),
            created_at: Utc::now(),
            lines_source: None,
            translations_source: None,
            tablets,
            summary,
        }
    }

    /// Record where the inputs came from.
    pub fn with_sources(mut self, lines: SourceMetadata, translations: SourceMetadata) -> Self {
        self.lines_source = Some(lines);
        self.translations_source = Some(translations);
        self
    }

    /// Results for one tablet.
    pub fn tablet(&self, tablet_id: &str) -> Option<&TabletAlignment> {
        self.tablets.iter().find(|t| t.tablet_id == tablet_id)
    }

    /// Every translation needing manual review, with its tablet.
    pub fn unresolved(&self) -> impl Iterator<Item = (&str, &TranslationMatch)> {
        self.tablets
            .iter()
            .flat_map(|t| t.unresolved().map(move |m| (t.tablet_id.as_str(), m)))
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StylusError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            StylusError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            StylusError::Persistence(format!("Failed to serialize alignment report: {}", e))
        })?;

        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            StylusError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            StylusError::Persistence(format!(
                "Failed to parse alignment report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Default report path for a translation file: `data/tr.csv` becomes
/// `data/tr.alignment.json`.
pub fn report_path(translations_path: impl AsRef<Path>) -> PathBuf {
    let path = translations_path.as_ref();
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = path.parent().unwrap_or(Path::new(""));
    parent.join(format!("{}.alignment.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Aligner;
    use crate::input::{FlatLineRecord, TranslationRecord};
    use tempfile::tempdir;

    fn sample_report() -> AlignmentReport {
        let lines = vec![
            FlatLineRecord::content(1, "1", "lugal"),
            FlatLineRecord::content(2, "2", "e2"),
        ];
        let aligner = Aligner::new();
        AlignmentReport::new(vec![
            aligner.align_tablet("P1", &lines, &[TranslationRecord::new(10, "1. the king")]),
            aligner.align_tablet("P2", &[], &[TranslationRecord::new(11, "...")]),
        ])
    }

    #[test]
    fn test_report_totals() {
        let report = sample_report();
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.summary.unmatchable, 1);
        assert!(report.tablet("P2").is_some());

        let unresolved: Vec<_> = report.unresolved().collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].0, "P2");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        let report = sample_report();
        report.save(&path).unwrap();
        let loaded = AlignmentReport::load(&path).unwrap();

        assert_eq!(loaded.version, REPORT_VERSION);
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.tablets[0].matches, report.tablets[0].matches);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AlignmentReport::load("/nonexistent/report.json");
        assert!(matches!(result, Err(StylusError::Persistence(_))));
    }

    #[test]
    fn test_report_path() {
        assert_eq!(
            report_path("data/translations.csv"),
            PathBuf::from("data/translations.alignment.json")
        );
        assert_eq!(report_path("tr.tsv"), PathBuf::from("tr.alignment.json"));
    }
}
