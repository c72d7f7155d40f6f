//! Line-reference extraction from free-text translations.
//!
//! Extraction runs in two phases. Phase A recognizes text that is not a
//! per-line translation at all (broken passages, placeholders, metadata and
//! section headers) and stops there. Phase B tries an ordered list of
//! pattern tiers; the first tier that matches produces the reference and
//! fixes its confidence.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::catalogue::normalize_line_number;
use crate::atf::{canonical_surface, normalize_surface};

/// Why a translation cannot be aligned to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchableReason {
    /// Contains an ellipsis marking a broken passage.
    Broken,
    /// Consists only of `x` placeholders.
    Placeholder,
    /// Archival metadata such as a basket label.
    Metadata,
    /// A total or receipt summary.
    Summary,
    /// A bare surface heading such as `Obverse:`.
    SectionHeader,
}

impl UnmatchableReason {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            UnmatchableReason::Broken => "Broken passage",
            UnmatchableReason::Placeholder => "Placeholder",
            UnmatchableReason::Metadata => "Metadata",
            UnmatchableReason::Summary => "Summary",
            UnmatchableReason::SectionHeader => "Section header",
        }
    }
}

/// Pattern tiers of phase B, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTier {
    /// `1.a. text`, `o 2.b text`
    SubLine,
    /// `o 5. text`, `rev. ii 3. text`
    SurfaceLine,
    /// `5. text`
    BareLine,
    /// `obverse 5. text`
    FullSurfaceLine,
    /// `5 o. text`
    ReversedSurface,
    /// `5' text`
    PrimedBare,
}

impl PatternTier {
    /// All tiers in evaluation order.
    pub const ALL: [PatternTier; 6] = [
        PatternTier::SubLine,
        PatternTier::SurfaceLine,
        PatternTier::BareLine,
        PatternTier::FullSurfaceLine,
        PatternTier::ReversedSurface,
        PatternTier::PrimedBare,
    ];

    /// Confidence assigned to references found by this tier.
    ///
    /// Sub-lines score lowest: several sub-lines can map onto one catalogue
    /// line.
    pub fn confidence(&self) -> f64 {
        match self {
            PatternTier::SubLine => 0.7,
            PatternTier::SurfaceLine => 1.0,
            PatternTier::BareLine => 0.8,
            PatternTier::FullSurfaceLine => 1.0,
            PatternTier::ReversedSurface => 0.9,
            PatternTier::PrimedBare => 0.75,
        }
    }

    fn reference(&self, caps: &Captures<'_>) -> Option<LineReference> {
        let line = caps.name("line")?.as_str();
        let line_number = normalize_line_number(line);
        if line_number.is_empty() {
            return None;
        }
        let surface = caps.name("surface").map(|m| resolve_surface(m.as_str()));

        Some(LineReference {
            surface,
            line_number,
            confidence: self.confidence(),
            tier: *self,
        })
    }
}

/// A line reference found in a translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineReference {
    /// Canonical surface name, when the text names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    /// Normalized line number (`5`, `3'`, `1.a`).
    pub line_number: String,
    /// Confidence in (0, 1].
    pub confidence: f64,
    /// Tier that produced the reference.
    pub tier: PatternTier,
}

/// Outcome of extracting a reference from one translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Not a per-line translation; no line matching is attempted.
    Unmatchable(UnmatchableReason),
    /// A reference was found.
    Reference(LineReference),
    /// Nothing recognizable; the caller may fall back to position.
    NotFound,
}

// =============================================================================
// PATTERNS
// =============================================================================

/// Surface abbreviations accepted before a line number.
const SURFACE_ABBR: &str = r"obv\.?|rev\.?|lo\.\s?e\.?|[ulrbt]\.\s?e\.?|le\.?|[ors]\.|o|r|s";

/// Full surface names.
const SURFACE_FULL: &str =
    r"obverse|reverse|(?:left|right|top|bottom|upper|lower)\s+edge|edge|seal\s+\d+|seal|envelope";

/// Optional column designation between surface and line number.
const COLUMN: &str = r"(?:(?:col(?:umn)?\.?\s*(?:\d+|[ivx]+)|[ivx]+)\s+)?";

static ELLIPSIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}|…").unwrap());

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^x(?:[\s\-.,]*x)*[\s.]*$").unwrap());

static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:{full}|{abbr})\s*(?:(?:col(?:umn)?\.?\s*)?(?:\d+|[ivx]+))?\s*:$",
        full = SURFACE_FULL,
        abbr = SURFACE_ABBR,
    ))
    .unwrap()
});

/// Literal prefixes of non-line text.
const UNMATCHABLE_PREFIXES: &[(&str, UnmatchableReason)] = &[
    ("basket-of-tablets:", UnmatchableReason::Metadata),
    ("total:", UnmatchableReason::Summary),
    ("received.", UnmatchableReason::Summary),
];

static TIER_PATTERNS: Lazy<Vec<(PatternTier, Regex)>> = Lazy::new(|| {
    let pattern = |tier: PatternTier| -> String {
        match tier {
            PatternTier::SubLine => format!(
                r"(?i)^(?:(?P<surface>{full}|{abbr})\s+)?(?P<line>\d+\.[a-z]\d?)\.?(?:\s+|$)",
                full = SURFACE_FULL,
                abbr = SURFACE_ABBR,
            ),
            PatternTier::SurfaceLine => format!(
                r"(?i)^(?P<surface>{abbr})\s+{column}(?P<line>\d+'?)\.(?:\s+|$)",
                abbr = SURFACE_ABBR,
                column = COLUMN,
            ),
            PatternTier::BareLine => r"^(?P<line>\d+'?)\.(?:\s+|$)".to_string(),
            PatternTier::FullSurfaceLine => format!(
                r"(?i)^(?P<surface>{full})\s+{column}(?P<line>\d+'?)\.(?:\s+|$)",
                full = SURFACE_FULL,
                column = COLUMN,
            ),
            PatternTier::ReversedSurface => {
                r"(?i)^(?P<line>\d+'?)\s+(?P<surface>obv|rev|lo\.e|[ulrbt]\.e|le|o|r|s)\.(?:\s+|$)"
                    .to_string()
            }
            PatternTier::PrimedBare => r"^(?P<line>\d+')(?:\s+|$)".to_string(),
        }
    };

    PatternTier::ALL
        .iter()
        .map(|&tier| (tier, Regex::new(&pattern(tier)).unwrap()))
        .collect()
});

/// Canonical surface for a matched surface token. Numbered seals such as
/// `seal 1` have no alias and compare the way line records store them.
fn resolve_surface(token: &str) -> String {
    let compact: String = token.split_whitespace().collect();
    canonical_surface(token)
        .or_else(|| canonical_surface(&compact))
        .map(str::to_string)
        .unwrap_or_else(|| normalize_surface(token))
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Phase A: classify text that is not a per-line translation.
pub fn classify_unmatchable(text: &str) -> Option<UnmatchableReason> {
    let text = text.trim();

    if ELLIPSIS.is_match(text) {
        return Some(UnmatchableReason::Broken);
    }
    if PLACEHOLDER.is_match(text) {
        return Some(UnmatchableReason::Placeholder);
    }

    let lowered = text.to_lowercase();
    if let Some((_, reason)) = UNMATCHABLE_PREFIXES
        .iter()
        .find(|(prefix, _)| lowered.starts_with(prefix))
    {
        return Some(*reason);
    }

    if SECTION_HEADER.is_match(text) {
        return Some(UnmatchableReason::SectionHeader);
    }
    None
}

/// Phase B: the first pattern tier matching the text.
pub fn find_reference(text: &str) -> Option<LineReference> {
    let text = text.trim();
    TIER_PATTERNS
        .iter()
        .filter_map(|(tier, regex)| regex.captures(text).map(|caps| (tier, caps)))
        .find_map(|(tier, caps)| tier.reference(&caps))
}

/// Extract a line reference from a translation.
///
/// Phase A wins unconditionally: a text with a valid-looking line prefix
/// that also contains an ellipsis is classified as broken.
pub fn extract_reference(text: &str) -> Extraction {
    if let Some(reason) = classify_unmatchable(text) {
        return Extraction::Unmatchable(reason);
    }
    match find_reference(text) {
        Some(reference) => Extraction::Reference(reference),
        None => Extraction::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(text: &str) -> LineReference {
        match extract_reference(text) {
            Extraction::Reference(r) => r,
            other => panic!("expected reference for {:?}, got {:?}", text, other),
        }
    }

    fn unmatchable(text: &str) -> UnmatchableReason {
        match extract_reference(text) {
            Extraction::Unmatchable(reason) => reason,
            other => panic!("expected unmatchable for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_ellipsis_is_broken() {
        assert_eq!(unmatchable("..."), UnmatchableReason::Broken);
        assert_eq!(unmatchable("... the king"), UnmatchableReason::Broken);
        assert_eq!(unmatchable("the king ...."), UnmatchableReason::Broken);
        assert_eq!(unmatchable("the … king"), UnmatchableReason::Broken);
    }

    #[test]
    fn test_phase_a_beats_line_prefix() {
        assert_eq!(unmatchable("o 5. the king ..."), UnmatchableReason::Broken);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(unmatchable("x"), UnmatchableReason::Placeholder);
        assert_eq!(unmatchable("x x x"), UnmatchableReason::Placeholder);
        assert_eq!(unmatchable("X-x"), UnmatchableReason::Placeholder);
        assert!(matches!(extract_reference("xenon"), Extraction::NotFound));
    }

    #[test]
    fn test_literal_prefixes() {
        assert_eq!(unmatchable("Basket-of-tablets: Puzriš-Dagan"), UnmatchableReason::Metadata);
        assert_eq!(unmatchable("total: 5 sheep"), UnmatchableReason::Summary);
        assert_eq!(unmatchable("Received. from Lugal"), UnmatchableReason::Summary);
    }

    #[test]
    fn test_section_header() {
        assert_eq!(unmatchable("Obverse:"), UnmatchableReason::SectionHeader);
        assert_eq!(unmatchable("rev. :"), UnmatchableReason::SectionHeader);
        assert_eq!(unmatchable("left edge:"), UnmatchableReason::SectionHeader);
        assert_eq!(unmatchable("reverse column ii:"), UnmatchableReason::SectionHeader);
        assert_eq!(unmatchable("seal 1:"), UnmatchableReason::SectionHeader);
    }

    #[test]
    fn test_sub_line_tier() {
        let r = reference("1.a. the king");
        assert_eq!(r.line_number, "1.a");
        assert_eq!(r.surface, None);
        assert_eq!(r.tier, PatternTier::SubLine);
        assert_eq!(r.confidence, 0.7);

        let r = reference("rev. 2.b1 text");
        assert_eq!(r.line_number, "2.b1");
        assert_eq!(r.surface.as_deref(), Some("reverse"));

        let r = reference("o. 1.a. x");
        assert_eq!(r.line_number, "1.a");
        assert_eq!(r.surface.as_deref(), Some("obverse"));
        assert_eq!(r.tier, PatternTier::SubLine);
    }

    #[test]
    fn test_surface_line_tier() {
        let r = reference("o 5. the king went");
        assert_eq!(r.surface.as_deref(), Some("obverse"));
        assert_eq!(r.line_number, "5");
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.tier, PatternTier::SurfaceLine);

        let r = reference("rev. ii 3'. broken");
        assert_eq!(r.surface.as_deref(), Some("reverse"));
        assert_eq!(r.line_number, "3'");

        let r = reference("l.e. 1. seal of");
        assert_eq!(r.surface.as_deref(), Some("left edge"));

        let r = reference("r. 5. the king went");
        assert_eq!(r.surface.as_deref(), Some("reverse"));
        assert_eq!(r.line_number, "5");
        assert_eq!(r.tier, PatternTier::SurfaceLine);

        let r = reference("O. 5. the king");
        assert_eq!(r.surface.as_deref(), Some("obverse"));

        let r = reference("s. 2. cylinder seal");
        assert_eq!(r.surface.as_deref(), Some("seal"));

        // The edge abbreviation still wins over the dotted single letter.
        let r = reference("r.e. 2. month");
        assert_eq!(r.surface.as_deref(), Some("right edge"));
    }

    #[test]
    fn test_bare_line_tier() {
        let r = reference("12. barley rations");
        assert_eq!(r.line_number, "12");
        assert_eq!(r.surface, None);
        assert_eq!(r.confidence, 0.8);
    }

    #[test]
    fn test_full_surface_tier() {
        let r = reference("Obverse 5. the king");
        assert_eq!(r.surface.as_deref(), Some("obverse"));
        assert_eq!(r.tier, PatternTier::FullSurfaceLine);
        assert_eq!(r.confidence, 1.0);

        let r = reference("upper edge 1. month");
        assert_eq!(r.surface.as_deref(), Some("top edge"));

        let r = reference("seal 1 1. Lugal, scribe");
        assert_eq!(r.surface.as_deref(), Some("seal 1"));
        assert_eq!(r.line_number, "1");
        assert_eq!(r.tier, PatternTier::FullSurfaceLine);

        let r = reference("Seal 2. Lugal");
        assert_eq!(r.surface.as_deref(), Some("seal"));
        assert_eq!(r.line_number, "2");
    }

    #[test]
    fn test_reversed_tier() {
        let r = reference("5 o. the king");
        assert_eq!(r.surface.as_deref(), Some("obverse"));
        assert_eq!(r.line_number, "5");
        assert_eq!(r.confidence, 0.9);
    }

    #[test]
    fn test_primed_bare_tier() {
        let r = reference("5' the king");
        assert_eq!(r.line_number, "5'");
        assert_eq!(r.tier, PatternTier::PrimedBare);
        assert_eq!(r.confidence, 0.75);

        // With a dot it is a bare line.
        assert_eq!(reference("5'. the king").tier, PatternTier::BareLine);
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_reference("some text"), Extraction::NotFound);
        assert_eq!(extract_reference("o king, hear me"), Extraction::NotFound);
        assert_eq!(extract_reference("5 sheep"), Extraction::NotFound);
    }

    #[test]
    fn test_confidence_ordering() {
        let c = |t: PatternTier| t.confidence();
        assert!(c(PatternTier::SurfaceLine) >= c(PatternTier::ReversedSurface));
        assert!(c(PatternTier::FullSurfaceLine) >= c(PatternTier::ReversedSurface));
        assert!(c(PatternTier::ReversedSurface) >= c(PatternTier::BareLine));
        assert!(c(PatternTier::BareLine) >= c(PatternTier::PrimedBare));
        assert!(c(PatternTier::PrimedBare) >= c(PatternTier::SubLine));
    }
}
