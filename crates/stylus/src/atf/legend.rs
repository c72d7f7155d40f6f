//! Legend entries describing which notation features a document uses.

use serde::{Deserialize, Serialize};

use super::document::{StructuredLine, Surface};
use super::tokenizer::WordToken;

/// A notation feature a viewer can explain in its legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendFeature {
    HasDefinition,
    NoDefinition,
    Divine,
    Place,
    Logogram,
    Damaged,
    Uncertain,
    Broken,
    Translation,
}

impl LegendFeature {
    /// Entries every legend starts with.
    pub const BASELINE: [LegendFeature; 2] = [LegendFeature::HasDefinition, LegendFeature::NoDefinition];

    /// Detected features, in the order they are appended.
    pub const DETECTED: [LegendFeature; 7] = [
        LegendFeature::Divine,
        LegendFeature::Place,
        LegendFeature::Logogram,
        LegendFeature::Damaged,
        LegendFeature::Uncertain,
        LegendFeature::Broken,
        LegendFeature::Translation,
    ];

    /// CSS-style class used by viewers.
    pub fn class(&self) -> &'static str {
        match self {
            LegendFeature::HasDefinition => "has-definition",
            LegendFeature::NoDefinition => "no-definition",
            LegendFeature::Divine => "det-divine",
            LegendFeature::Place => "det-place",
            LegendFeature::Logogram => "logogram",
            LegendFeature::Damaged => "damaged",
            LegendFeature::Uncertain => "uncertain",
            LegendFeature::Broken => "broken",
            LegendFeature::Translation => "translation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegendFeature::HasDefinition => "Word with dictionary entry",
            LegendFeature::NoDefinition => "Word without dictionary entry",
            LegendFeature::Divine => "Divine determinative",
            LegendFeature::Place => "Place determinative",
            LegendFeature::Logogram => "Logogram",
            LegendFeature::Damaged => "Damaged sign",
            LegendFeature::Uncertain => "Uncertain reading",
            LegendFeature::Broken => "Broken / restored",
            LegendFeature::Translation => "Line translation",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LegendFeature::HasDefinition => "a",
            LegendFeature::NoDefinition => "a",
            LegendFeature::Divine => "ᵈ",
            LegendFeature::Place => "ᵏⁱ",
            LegendFeature::Logogram => "LUGAL",
            LegendFeature::Damaged => "#",
            LegendFeature::Uncertain => "?",
            LegendFeature::Broken => "[...]",
            LegendFeature::Translation => "¶",
        }
    }

    pub fn entry(&self) -> LegendEntry {
        LegendEntry {
            class: self.class().to_string(),
            label: self.label().to_string(),
            symbol: self.symbol().to_string(),
        }
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub class: String,
    pub label: String,
    pub symbol: String,
}

/// Flags accumulated in a single pass over the document.
#[derive(Debug, Clone, Copy, Default)]
struct FeatureFlags {
    divine: bool,
    place: bool,
    logogram: bool,
    damaged: bool,
    uncertain: bool,
    broken: bool,
    translation: bool,
}

impl FeatureFlags {
    fn observe_token(&mut self, token: &WordToken) {
        match token {
            WordToken::Broken { .. } => self.broken = true,
            WordToken::Logogram { .. } => self.logogram = true,
            WordToken::Determinative {
                det_type, trailing, ..
            } => {
                self.observe_determinative(det_type);
                if let Some(trailing) = trailing {
                    self.observe_determinative(&trailing.det_type);
                }
            }
            _ => {}
        }
        self.damaged |= token.is_damaged();
        self.uncertain |= token.is_uncertain();
    }

    fn observe_determinative(&mut self, det_type: &str) {
        match det_type {
            "divine" => self.divine = true,
            "place" => self.place = true,
            _ => {}
        }
    }

    fn has(&self, feature: LegendFeature) -> bool {
        match feature {
            LegendFeature::HasDefinition | LegendFeature::NoDefinition => true,
            LegendFeature::Divine => self.divine,
            LegendFeature::Place => self.place,
            LegendFeature::Logogram => self.logogram,
            LegendFeature::Damaged => self.damaged,
            LegendFeature::Uncertain => self.uncertain,
            LegendFeature::Broken => self.broken,
            LegendFeature::Translation => self.translation,
        }
    }
}

/// Build the legend for a document's surfaces.
pub fn generate_legend(surfaces: &[Surface]) -> Vec<LegendEntry> {
    let mut flags = FeatureFlags::default();

    let lines = surfaces
        .iter()
        .flat_map(|s| s.columns.iter())
        .flat_map(|c| c.lines.iter());
    for line in lines {
        if let StructuredLine::Content {
            words, translation, ..
        } = line
        {
            words.iter().for_each(|token| flags.observe_token(token));
            flags.translation |= translation.is_some();
        }
    }

    LegendFeature::BASELINE
        .iter()
        .chain(LegendFeature::DETECTED.iter())
        .filter(|feature| flags.has(**feature))
        .map(LegendFeature::entry)
        .collect()
}
