//! The alignment pass: every translation of a tablet becomes exactly one
//! [`TranslationMatch`].

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::catalogue::LineCatalogue;
use super::matcher::{LineMatch, LineMatcher, MatchMethod};
use super::reference::{Extraction, LineReference, UnmatchableReason, extract_reference};
use crate::input::{FlatLineRecord, LineTable, TranslationRecord, TranslationTable};

/// Alignment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Only align translations in this language (None = all).
    pub language: Option<String>,
    /// Fall back to ordinal position when no reference is found.
    pub positional_fallback: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            language: None,
            positional_fallback: true,
        }
    }
}

/// Outcome of aligning one translation.
///
/// Exactly one of three states holds: matched (`line_id` and `confidence`
/// set), unmatchable (`unmatchable_reason` set), or unmatched (none set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationMatch {
    pub translation_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MatchMethod>,
    /// The reference found in the text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<LineReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unmatchable_reason: Option<UnmatchableReason>,
}

impl TranslationMatch {
    fn matched(translation_id: u64, found: LineMatch, reference: Option<LineReference>) -> Self {
        Self {
            translation_id,
            line_id: Some(found.line_id),
            confidence: Some(found.confidence),
            method: Some(found.method),
            reference,
            unmatchable_reason: None,
        }
    }

    fn unmatchable(translation_id: u64, reason: UnmatchableReason) -> Self {
        Self {
            translation_id,
            line_id: None,
            confidence: None,
            method: None,
            reference: None,
            unmatchable_reason: Some(reason),
        }
    }

    fn unmatched(translation_id: u64, reference: Option<LineReference>) -> Self {
        Self {
            translation_id,
            line_id: None,
            confidence: None,
            method: None,
            reference,
            unmatchable_reason: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.line_id.is_some()
    }

    pub fn is_unmatchable(&self) -> bool {
        self.unmatchable_reason.is_some()
    }

    /// Neither matched nor classified as unmatchable.
    pub fn is_unmatched(&self) -> bool {
        !self.is_matched() && !self.is_unmatchable()
    }
}

/// Counts over a set of translation matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub unmatchable: usize,
    /// Matched translations per method.
    pub by_method: IndexMap<MatchMethod, usize>,
    /// Unmatchable translations per reason.
    pub by_reason: IndexMap<UnmatchableReason, usize>,
    /// Mean confidence of matched translations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f64>,
}

impl AlignmentSummary {
    /// Summarize a set of matches.
    pub fn from_matches(matches: &[TranslationMatch]) -> Self {
        let mut summary = Self::default();
        let mut confidence_sum = 0.0;

        for m in matches {
            summary.total += 1;
            if let (Some(confidence), Some(method)) = (m.confidence, m.method) {
                summary.matched += 1;
                confidence_sum += confidence;
                *summary.by_method.entry(method).or_insert(0) += 1;
            } else if let Some(reason) = m.unmatchable_reason {
                summary.unmatchable += 1;
                *summary.by_reason.entry(reason).or_insert(0) += 1;
            } else {
                summary.unmatched += 1;
            }
        }

        if summary.matched > 0 {
            summary.mean_confidence = Some(confidence_sum / summary.matched as f64);
        }
        summary
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &AlignmentSummary) {
        let matched_before = self.matched;
        self.total += other.total;
        self.matched += other.matched;
        self.unmatched += other.unmatched;
        self.unmatchable += other.unmatchable;
        for (method, count) in &other.by_method {
            *self.by_method.entry(*method).or_insert(0) += count;
        }
        for (reason, count) in &other.by_reason {
            *self.by_reason.entry(*reason).or_insert(0) += count;
        }

        let weighted = |mean: Option<f64>, n: usize| mean.unwrap_or(0.0) * n as f64;
        if self.matched > 0 {
            let sum = weighted(self.mean_confidence, matched_before)
                + weighted(other.mean_confidence, other.matched);
            self.mean_confidence = Some(sum / self.matched as f64);
        }
    }

    /// Share of translations that were matched.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// Alignment results for one tablet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabletAlignment {
    pub tablet_id: String,
    /// Number of content lines available as targets.
    pub line_count: usize,
    pub matches: Vec<TranslationMatch>,
    pub summary: AlignmentSummary,
}

impl TabletAlignment {
    /// `(line_id, text)` pairs for every matched translation, ready to be
    /// attached to a structured document.
    pub fn line_translations<'a>(
        &self,
        translations: &'a [TranslationRecord],
    ) -> Vec<(u64, &'a str)> {
        let texts: HashMap<u64, &str> = translations
            .iter()
            .map(|t| (t.id, t.text.as_str()))
            .collect();

        self.matches
            .iter()
            .filter_map(|m| Some((m.line_id?, *texts.get(&m.translation_id)?)))
            .collect()
    }

    /// Translations that need manual review: unmatched or unmatchable.
    pub fn unresolved(&self) -> impl Iterator<Item = &TranslationMatch> {
        self.matches.iter().filter(|m| !m.is_matched())
    }
}

/// Runs the alignment pass over tablets.
pub struct Aligner {
    config: AlignmentConfig,
}

impl Aligner {
    pub fn new() -> Self {
        Self {
            config: AlignmentConfig::default(),
        }
    }

    pub fn with_config(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align the translations of one tablet against its line records.
    pub fn align_tablet(
        &self,
        tablet_id: &str,
        lines: &[FlatLineRecord],
        translations: &[TranslationRecord],
    ) -> TabletAlignment {
        let catalogue = LineCatalogue::from_records(tablet_id, lines);
        self.align_catalogue(&catalogue, translations)
    }

    /// Align translations against a prepared catalogue.
    ///
    /// Translations are taken in id order; a translation's ordinal is its
    /// position in that order after the language filter.
    pub fn align_catalogue(
        &self,
        catalogue: &LineCatalogue,
        translations: &[TranslationRecord],
    ) -> TabletAlignment {
        let matcher = LineMatcher::new(catalogue);

        let mut ordered: Vec<&TranslationRecord> = translations
            .iter()
            .filter(|t| self.accepts_language(t))
            .collect();
        ordered.sort_by_key(|t| t.id);

        let matches: Vec<TranslationMatch> = ordered
            .iter()
            .enumerate()
            .map(|(ordinal, translation)| self.align_one(&matcher, ordinal, translation))
            .collect();
        let summary = AlignmentSummary::from_matches(&matches);

        debug!(
            tablet = catalogue.tablet_id(),
            lines = catalogue.len(),
            translations = summary.total,
            matched = summary.matched,
            unmatchable = summary.unmatchable,
            "aligned tablet"
        );

        TabletAlignment {
            tablet_id: catalogue.tablet_id().to_string(),
            line_count: catalogue.len(),
            matches,
            summary,
        }
    }

    /// Align every tablet that has translations, in translation-table order.
    /// Tablets without line rows align against an empty catalogue.
    pub fn align_all(
        &self,
        lines: &LineTable,
        translations: &TranslationTable,
    ) -> Vec<TabletAlignment> {
        translations
            .iter()
            .map(|(tablet_id, rows)| {
                let records = lines.get(tablet_id).unwrap_or(&[]);
                self.align_tablet(tablet_id, records, rows)
            })
            .collect()
    }

    fn align_one(
        &self,
        matcher: &LineMatcher<'_>,
        ordinal: usize,
        translation: &TranslationRecord,
    ) -> TranslationMatch {
        let result = match extract_reference(&translation.text) {
            Extraction::Unmatchable(reason) => {
                TranslationMatch::unmatchable(translation.id, reason)
            }
            Extraction::Reference(reference) => match matcher.match_reference(&reference) {
                Some(found) => TranslationMatch::matched(translation.id, found, Some(reference)),
                None => TranslationMatch::unmatched(translation.id, Some(reference)),
            },
            Extraction::NotFound if self.config.positional_fallback => {
                match matcher.match_position(ordinal) {
                    Some(found) => TranslationMatch::matched(translation.id, found, None),
                    None => TranslationMatch::unmatched(translation.id, None),
                }
            }
            Extraction::NotFound => TranslationMatch::unmatched(translation.id, None),
        };

        trace!(
            translation = translation.id,
            ordinal,
            line = ?result.line_id,
            reason = ?result.unmatchable_reason,
            "aligned translation"
        );
        result
    }

    fn accepts_language(&self, translation: &TranslationRecord) -> bool {
        match self.config.language.as_deref() {
            Some(language) => translation.language.eq_ignore_ascii_case(language),
            None => true,
        }
    }
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new()
    }
}
