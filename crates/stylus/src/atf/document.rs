//! Structured document model and the structurer that builds it.
//!
//! Flat line records are grouped into surface → column → line. Surfaces and
//! columns keep the order in which they first appear in the input; a
//! surface seen again later in the stream appends to its existing group.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::surface::surface_label;
use super::tokenizer::{WordToken, tokenize};
use crate::input::FlatLineRecord;

static COMPOSITE: Lazy<Regex> = Lazy::new(|| Regex::new(r">>(Q\d+)(?:\s+(.*))?$").unwrap());

/// Text used for ruling lines.
pub const RULING_TEXT: &str = "ruling";

/// Reference from a tablet line to a line of a composite text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRef {
    /// Composite identifier (`Q000123`).
    pub q_number: String,
    /// Composite line the tablet line corresponds to.
    pub line_text: String,
}

/// One line of a structured document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredLine {
    /// Transliterated text.
    Content {
        /// Storage id of the source record.
        id: u64,
        /// Display label, always ending in a single `.`.
        number: String,
        is_prime: bool,
        words: Vec<WordToken>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        composite: Option<CompositeRef>,
        /// Translation aligned to this line, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<String>,
    },
    /// A state annotation: ruling, break description, blank space.
    State { text: String },
}

impl StructuredLine {
    /// Tokens of a content line; empty for state lines.
    pub fn words(&self) -> &[WordToken] {
        match self {
            StructuredLine::Content { words, .. } => words,
            StructuredLine::State { .. } => &[],
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, StructuredLine::Content { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column number, 0 when the tablet has no column division.
    pub number: u32,
    pub lines: Vec<StructuredLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Surface name as stored (obverse, reverse, ...).
    pub name: String,
    pub display_label: String,
    pub columns: Vec<Column>,
}

/// A tablet's transliteration as a surface → column → line tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub surfaces: Vec<Surface>,
    pub has_multiple_surfaces: bool,
    /// True iff any surface has more than one column.
    pub has_multiple_columns: bool,
}

impl StructuredDocument {
    /// Iterate over all lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &StructuredLine> {
        self.surfaces
            .iter()
            .flat_map(|s| s.columns.iter())
            .flat_map(|c| c.lines.iter())
    }

    /// Number of content lines.
    pub fn content_line_count(&self) -> usize {
        self.lines().filter(|l| l.is_content()).count()
    }

    /// Attach translation texts to content lines by line id.
    ///
    /// Several translations aligned to the same line are joined with a space.
    /// Returns the number of translations attached.
    pub fn attach_translations<'a>(
        &mut self,
        translations: impl IntoIterator<Item = (u64, &'a str)>,
    ) -> usize {
        let mut by_line: IndexMap<u64, Vec<&str>> = IndexMap::new();
        for (line_id, text) in translations {
            let text = text.trim();
            if !text.is_empty() {
                by_line.entry(line_id).or_default().push(text);
            }
        }

        let mut attached = 0;
        let lines = self
            .surfaces
            .iter_mut()
            .flat_map(|s| s.columns.iter_mut())
            .flat_map(|c| c.lines.iter_mut());
        for line in lines {
            if let StructuredLine::Content {
                id, translation, ..
            } = line
            {
                if let Some(texts) = by_line.get(&*id) {
                    attached += texts.len();
                    *translation = Some(texts.join(" "));
                }
            }
        }
        attached
    }
}

/// Build the structured document for one tablet.
pub fn structure_document(records: &[FlatLineRecord]) -> StructuredDocument {
    let mut groups: IndexMap<&str, IndexMap<u32, Vec<StructuredLine>>> = IndexMap::new();

    for record in records {
        // The group is registered even when the record itself is dropped.
        let lines = groups
            .entry(record.surface_name())
            .or_default()
            .entry(record.column_number)
            .or_default();
        if let Some(line) = structure_line(record) {
            lines.push(line);
        }
    }

    let has_multiple_surfaces = groups.len() > 1;
    let has_multiple_columns = groups.values().any(|columns| columns.len() > 1);

    let surfaces = groups
        .into_iter()
        .map(|(name, columns)| Surface {
            name: name.to_string(),
            display_label: surface_label(name),
            columns: columns
                .into_iter()
                .map(|(number, lines)| Column { number, lines })
                .collect(),
        })
        .collect();

    StructuredDocument {
        surfaces,
        has_multiple_surfaces,
        has_multiple_columns,
    }
}

/// Classify one record. Blank records without text produce nothing.
pub fn structure_line(record: &FlatLineRecord) -> Option<StructuredLine> {
    let raw = record.raw_text.trim();

    if let Some(rest) = raw.strip_prefix('$') {
        return Some(StructuredLine::State {
            text: rest.trim().to_string(),
        });
    }

    if record.is_blank {
        if raw.is_empty() {
            return None;
        }
        return Some(StructuredLine::State {
            text: raw.trim_start_matches(['$', ' ']).to_string(),
        });
    }

    if record.is_ruling {
        return Some(StructuredLine::State {
            text: RULING_TEXT.to_string(),
        });
    }

    let (content, composite) = split_composite(raw);
    Some(StructuredLine::Content {
        id: record.id,
        number: display_number(&record.line_number),
        is_prime: record.line_number.contains('\''),
        words: tokenize(content),
        composite,
        translation: None,
    })
}

/// Separate an embedded `>>Q<digits> ...` composite reference.
fn split_composite(raw: &str) -> (&str, Option<CompositeRef>) {
    let Some(caps) = COMPOSITE.captures(raw) else {
        return (raw, None);
    };
    let Some(whole) = caps.get(0) else {
        return (raw, None);
    };

    let composite = CompositeRef {
        q_number: caps[1].to_string(),
        line_text: caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    };
    (raw[..whole.start()].trim(), Some(composite))
}

/// Line label with exactly one trailing `.`.
fn display_number(label: &str) -> String {
    let base = label.trim().trim_end_matches('.');
    if base.is_empty() {
        String::new()
    } else {
        format!("{}.", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atf::DeterminativePosition;

    fn surface_names(doc: &StructuredDocument) -> Vec<&str> {
        doc.surfaces.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_prime_line_with_determinative() {
        let record = FlatLineRecord::content(7, "3'.", "lugal {d}inana-me-en#").with_surface("obverse");
        let doc = structure_document(&[record]);

        let line = &doc.surfaces[0].columns[0].lines[0];
        let StructuredLine::Content {
            id,
            number,
            is_prime,
            words,
            ..
        } = line
        else {
            panic!("expected content line, got {:?}", line);
        };
        assert_eq!(*id, 7);
        assert_eq!(number, "3'.");
        assert!(*is_prime);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].lookup_key(), Some("lugal"));
        match &words[1] {
            WordToken::Determinative {
                text,
                determinative,
                det_type,
                position,
                damaged,
                ..
            } => {
                assert_eq!(text, "inana-me-en");
                assert_eq!(determinative, "d");
                assert_eq!(det_type, "divine");
                assert_eq!(*position, DeterminativePosition::Prefix);
                assert!(*damaged);
            }
            other => panic!("expected determinative, got {:?}", other),
        }
    }

    #[test]
    fn test_first_appearance_order() {
        let records = vec![
            FlatLineRecord::content(1, "1", "a").with_surface("reverse"),
            FlatLineRecord::content(2, "1", "b").with_surface("obverse"),
            FlatLineRecord::content(3, "2", "c").with_surface("reverse"),
            FlatLineRecord::content(4, "1", "d").with_surface("left edge"),
        ];
        let doc = structure_document(&records);

        assert_eq!(surface_names(&doc), vec!["reverse", "obverse", "left edge"]);
        assert_eq!(doc.surfaces[0].columns[0].lines.len(), 2);
        assert_eq!(doc.surfaces[2].display_label, "Left Edge");
        assert!(doc.has_multiple_surfaces);
        assert!(!doc.has_multiple_columns);

        // Re-running yields the same order.
        assert_eq!(structure_document(&records), doc);
    }

    #[test]
    fn test_columns_and_flags() {
        let records = vec![
            FlatLineRecord::content(1, "1", "a").with_column(2),
            FlatLineRecord::content(2, "1", "b").with_column(1),
            FlatLineRecord::content(3, "2", "c").with_column(2),
        ];
        let doc = structure_document(&records);

        assert!(!doc.has_multiple_surfaces);
        assert!(doc.has_multiple_columns);
        let numbers: Vec<u32> = doc.surfaces[0].columns.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn test_state_lines() {
        let records = vec![
            FlatLineRecord::content(1, "", "$ rest of obverse broken"),
            FlatLineRecord::ruling(2),
            FlatLineRecord::blank(3, "$ blank space"),
            FlatLineRecord::blank(4, ""),
            FlatLineRecord::blank(5, "traces"),
        ];
        let doc = structure_document(&records);
        let lines = &doc.surfaces[0].columns[0].lines;

        let texts: Vec<&str> = lines
            .iter()
            .map(|l| match l {
                StructuredLine::State { text } => text.as_str(),
                StructuredLine::Content { .. } => panic!("unexpected content line"),
            })
            .collect();
        assert_eq!(
            texts,
            vec!["rest of obverse broken", "ruling", "blank space", "traces"]
        );
    }

    #[test]
    fn test_dropped_blank_still_registers_group() {
        let records = vec![
            FlatLineRecord::blank(1, "").with_surface("reverse"),
            FlatLineRecord::content(2, "1", "a"),
        ];
        let doc = structure_document(&records);
        assert_eq!(surface_names(&doc), vec!["reverse", "obverse"]);
        assert!(doc.surfaces[0].columns[0].lines.is_empty());
    }

    #[test]
    fn test_composite_reference() {
        let record = FlatLineRecord::content(1, "4", "a-na lugal >>Q000123 o 5");
        let line = structure_line(&record);
        let Some(StructuredLine::Content {
            number,
            words,
            composite,
            ..
        }) = line
        else {
            panic!("expected content line");
        };
        assert_eq!(number, "4.");
        assert_eq!(words.len(), 2);
        assert_eq!(
            composite,
            Some(CompositeRef {
                q_number: "Q000123".to_string(),
                line_text: "o 5".to_string(),
            })
        );
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number("1"), "1.");
        assert_eq!(display_number("1.."), "1.");
        assert_eq!(display_number("2'."), "2'.");
        assert_eq!(display_number("1.a"), "1.a.");
        assert_eq!(display_number(""), "");
    }

    #[test]
    fn test_attach_translations() {
        let records = vec![
            FlatLineRecord::content(10, "1", "a"),
            FlatLineRecord::content(11, "2", "b"),
        ];
        let mut doc = structure_document(&records);
        let attached = doc.attach_translations(vec![(11, "first"), (11, "second"), (99, "x")]);

        assert_eq!(attached, 2);
        let lines: Vec<&StructuredLine> = doc.lines().collect();
        assert!(matches!(
            lines[0],
            StructuredLine::Content { translation: None, .. }
        ));
        match lines[1] {
            StructuredLine::Content { translation, .. } => {
                assert_eq!(translation.as_deref(), Some("first second"));
            }
            other => panic!("expected content line, got {:?}", other),
        }
    }
}
