//! Resolution of extracted references against a line catalogue.

use serde::{Deserialize, Serialize};

use super::catalogue::LineCatalogue;
use super::reference::LineReference;

/// Multiplier applied when a line number matches on several surfaces and
/// the reference does not say which.
pub const AMBIGUITY_PENALTY: f64 = 0.7;

/// Confidence of a positional (ordinal) match.
pub const POSITIONAL_CONFIDENCE: f64 = 0.5;

/// How a translation was matched to its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Line number and surface both matched.
    SurfaceExact,
    /// Line number matched a single line.
    LineNumber,
    /// Line number matched several lines; the first was taken.
    AmbiguousSurface,
    /// Fallback on the translation's position.
    Positional,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 4] = [
        MatchMethod::SurfaceExact,
        MatchMethod::LineNumber,
        MatchMethod::AmbiguousSurface,
        MatchMethod::Positional,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchMethod::SurfaceExact => "surface + line",
            MatchMethod::LineNumber => "line number",
            MatchMethod::AmbiguousSurface => "ambiguous surface",
            MatchMethod::Positional => "positional",
        }
    }
}

/// A resolved line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMatch {
    pub line_id: u64,
    pub confidence: f64,
    pub method: MatchMethod,
}

/// Matches references against the catalogue of one tablet.
pub struct LineMatcher<'a> {
    catalogue: &'a LineCatalogue,
}

impl<'a> LineMatcher<'a> {
    pub fn new(catalogue: &'a LineCatalogue) -> Self {
        Self { catalogue }
    }

    /// Resolve a reference to a line.
    ///
    /// A reference naming a surface first tries that surface exactly. When
    /// that fails, or no surface was named, the line number alone is used;
    /// if it occurs on several surfaces the first in catalogue order is
    /// taken at reduced confidence.
    pub fn match_reference(&self, reference: &LineReference) -> Option<LineMatch> {
        if let Some(surface) = reference.surface.as_deref() {
            if let Some(line) = self.catalogue.on_surface(&reference.line_number, surface) {
                return Some(LineMatch {
                    line_id: line.id,
                    confidence: reference.confidence,
                    method: MatchMethod::SurfaceExact,
                });
            }
        }

        let mut candidates = self.catalogue.with_number(&reference.line_number);
        let first = candidates.next()?;
        let (confidence, method) = if candidates.next().is_some() {
            (
                reference.confidence * AMBIGUITY_PENALTY,
                MatchMethod::AmbiguousSurface,
            )
        } else {
            (reference.confidence, MatchMethod::LineNumber)
        };

        Some(LineMatch {
            line_id: first.id,
            confidence,
            method,
        })
    }

    /// Match the translation at `ordinal` to the content line at the same
    /// position. `None` when the tablet has fewer lines.
    pub fn match_position(&self, ordinal: usize) -> Option<LineMatch> {
        self.catalogue.line_at(ordinal).map(|line| LineMatch {
            line_id: line.id,
            confidence: POSITIONAL_CONFIDENCE,
            method: MatchMethod::Positional,
        })
    }
}
