//! Main Stylus struct and public API.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alignment::{Aligner, AlignmentConfig, AlignmentReport, TabletAlignment};
use crate::atf::{
    LegendEntry, StructuredDocument, generate_legend, reconstruct_raw_text, structure_document,
};
use crate::error::{Result, StylusError};
use crate::input::{
    FlatLineRecord, InputConfig, LineTable, RecordReader, SourceMetadata, TranslationRecord,
    TranslationTable,
};

/// Configuration for Stylus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StylusConfig {
    /// Input reader configuration.
    pub input: InputConfig,
    /// Alignment configuration.
    pub alignment: AlignmentConfig,
}

impl StylusConfig {
    /// Load configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| StylusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            StylusError::Config(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Everything needed to display one tablet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabletView {
    pub tablet_id: String,
    pub document: StructuredDocument,
    pub legend: Vec<LegendEntry>,
    /// ATF-like reconstruction of the raw lines.
    pub raw_text: String,
}

/// Entry point tying loading, structuring and alignment together.
pub struct Stylus {
    config: StylusConfig,
    reader: RecordReader,
    aligner: Aligner,
}

impl Stylus {
    /// Create a new Stylus instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(StylusConfig::default())
    }

    /// Create a Stylus instance with custom configuration.
    pub fn with_config(config: StylusConfig) -> Self {
        let reader = RecordReader::with_config(config.input.clone());
        let aligner = Aligner::with_config(config.alignment.clone());

        Self {
            config,
            reader,
            aligner,
        }
    }

    pub fn config(&self) -> &StylusConfig {
        &self.config
    }

    /// Load line rows from a delimited file.
    pub fn load_lines(&self, path: impl AsRef<Path>) -> Result<(LineTable, SourceMetadata)> {
        self.reader.read_lines(path)
    }

    /// Load translation rows from a delimited file.
    pub fn load_translations(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(TranslationTable, SourceMetadata)> {
        self.reader.read_translations(path)
    }

    /// Build the display view of one tablet.
    pub fn view_tablet(&self, tablet_id: &str, lines: &[FlatLineRecord]) -> TabletView {
        let document = structure_document(lines);
        let legend = generate_legend(&document.surfaces);
        let raw_text = reconstruct_raw_text(lines);

        TabletView {
            tablet_id: tablet_id.to_string(),
            document,
            legend,
            raw_text,
        }
    }

    /// Build the display view of one tablet with its aligned translations
    /// attached to their lines.
    pub fn view_aligned_tablet(
        &self,
        tablet_id: &str,
        lines: &[FlatLineRecord],
        translations: &[TranslationRecord],
    ) -> (TabletView, TabletAlignment) {
        let alignment = self.align_tablet(tablet_id, lines, translations);

        let mut document = structure_document(lines);
        document.attach_translations(alignment.line_translations(translations));
        let legend = generate_legend(&document.surfaces);

        let view = TabletView {
            tablet_id: tablet_id.to_string(),
            document,
            legend,
            raw_text: reconstruct_raw_text(lines),
        };
        (view, alignment)
    }

    /// Align the translations of one tablet.
    pub fn align_tablet(
        &self,
        tablet_id: &str,
        lines: &[FlatLineRecord],
        translations: &[TranslationRecord],
    ) -> TabletAlignment {
        self.aligner.align_tablet(tablet_id, lines, translations)
    }

    /// Align every tablet with translations.
    pub fn align_all(&self, lines: &LineTable, translations: &TranslationTable) -> AlignmentReport {
        AlignmentReport::new(self.aligner.align_all(lines, translations))
    }

    /// Load both files and align them.
    pub fn align_files(
        &self,
        lines_path: impl AsRef<Path>,
        translations_path: impl AsRef<Path>,
    ) -> Result<AlignmentReport> {
        let (lines, lines_source) = self.load_lines(lines_path)?;
        let (translations, translations_source) = self.load_translations(translations_path)?;

        let report = self
            .align_all(&lines, &translations)
            .with_sources(lines_source, translations_source);

        info!(
            tablets = report.tablets.len(),
            translations = report.summary.total,
            matched = report.summary.matched,
            "alignment complete"
        );
        Ok(report)
    }
}

impl Default for Stylus {
    fn default() -> Self {
        Self::new()
    }
}
