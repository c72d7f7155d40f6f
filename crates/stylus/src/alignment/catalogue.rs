//! The per-tablet catalogue of content lines that translations align to.

use serde::{Deserialize, Serialize};

use crate::atf::normalize_surface;
use crate::input::FlatLineRecord;

/// Normalize a line number for comparison: trimmed, trailing dots removed,
/// lowercased.
pub fn normalize_line_number(line_number: &str) -> String {
    line_number
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_lowercase()
}

/// One content line of a tablet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueLine {
    pub id: u64,
    /// Normalized line number.
    pub line_number: String,
    /// Canonical surface name.
    pub surface: String,
}

/// Content lines of one tablet, in record order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineCatalogue {
    tablet_id: String,
    lines: Vec<CatalogueLine>,
}

impl LineCatalogue {
    /// Build a catalogue from a tablet's line records. Rulings, blank lines
    /// and `$` state lines are not alignment targets.
    pub fn from_records(tablet_id: impl Into<String>, records: &[FlatLineRecord]) -> Self {
        let lines = records
            .iter()
            .filter(|record| record.is_content())
            .map(|record| CatalogueLine {
                id: record.id,
                line_number: normalize_line_number(&record.line_number),
                surface: normalize_surface(record.surface_name()),
            })
            .collect();

        Self {
            tablet_id: tablet_id.into(),
            lines,
        }
    }

    pub fn tablet_id(&self) -> &str {
        &self.tablet_id
    }

    pub fn lines(&self) -> &[CatalogueLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at a zero-based position, if it exists.
    pub fn line_at(&self, ordinal: usize) -> Option<&CatalogueLine> {
        self.lines.get(ordinal)
    }

    /// Lines whose number equals `line_number` (already normalized), in
    /// catalogue order.
    pub fn with_number<'a>(
        &'a self,
        line_number: &str,
    ) -> impl Iterator<Item = &'a CatalogueLine> {
        self.lines
            .iter()
            .filter(move |line| line.line_number == line_number)
    }

    /// The first line with the given number on the given canonical surface.
    pub fn on_surface(&self, line_number: &str, surface: &str) -> Option<&CatalogueLine> {
        self.with_number(line_number)
            .find(|line| line.surface == surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<FlatLineRecord> {
        vec![
            FlatLineRecord::content(1, "1.", "lugal"),
            FlatLineRecord::content(2, "2", "e2"),
            FlatLineRecord::ruling(3),
            FlatLineRecord::content(4, "1", "{d}utu").with_surface("r"),
            FlatLineRecord::blank(5, "$ rest broken"),
            FlatLineRecord::content(6, "3'", "x").with_surface("Reverse"),
        ]
    }

    #[test]
    fn test_normalize_line_number() {
        assert_eq!(normalize_line_number(" 5. "), "5");
        assert_eq!(normalize_line_number("1.A."), "1.a");
        assert_eq!(normalize_line_number("3'"), "3'");
    }

    #[test]
    fn test_catalogue_keeps_content_only() {
        let catalogue = LineCatalogue::from_records("P1", &records());
        let ids: Vec<u64> = catalogue.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 6]);
        assert_eq!(catalogue.tablet_id(), "P1");
    }

    #[test]
    fn test_surfaces_are_canonical() {
        let catalogue = LineCatalogue::from_records("P1", &records());
        assert_eq!(catalogue.lines()[0].surface, "obverse");
        assert_eq!(catalogue.lines()[2].surface, "reverse");
        assert_eq!(catalogue.lines()[3].surface, "reverse");
    }

    #[test]
    fn test_lookup() {
        let catalogue = LineCatalogue::from_records("P1", &records());
        assert_eq!(catalogue.with_number("1").count(), 2);
        assert_eq!(catalogue.on_surface("1", "reverse").map(|l| l.id), Some(4));
        assert_eq!(catalogue.on_surface("2", "reverse"), None);
        assert_eq!(catalogue.line_at(3).map(|l| l.id), Some(6));
        assert_eq!(catalogue.line_at(4), None);
    }
}
