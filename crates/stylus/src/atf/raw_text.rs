//! Canonical ATF text regenerated from flat line records.
//!
//! This is a display reconstruction of the records, not the file the
//! records were originally imported from.

use indexmap::IndexMap;

use crate::input::FlatLineRecord;

/// Text emitted for a ruling record without its own description.
pub const DEFAULT_RULING: &str = "single ruling";
/// Text emitted for a blank record without its own description.
pub const DEFAULT_BLANK: &str = "blank space";

/// Regenerate the transliteration text for one tablet.
///
/// Records are grouped by surface and column in first-appearance order.
/// Each surface gets an `@<surface>` marker; `@column N` is only emitted
/// for columns numbered above zero.
pub fn reconstruct_raw_text(records: &[FlatLineRecord]) -> String {
    let mut groups: IndexMap<&str, IndexMap<u32, Vec<&FlatLineRecord>>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.surface_name())
            .or_default()
            .entry(record.column_number)
            .or_default()
            .push(record);
    }

    let mut out: Vec<String> = Vec::with_capacity(records.len() + groups.len() * 2);
    for (surface, columns) in &groups {
        out.push(format!("@{}", surface));
        for (column, lines) in columns {
            if *column > 0 {
                out.push(format!("@column {}", column));
            }
            out.extend(lines.iter().map(|record| raw_line(record)));
        }
    }
    out.join("\n")
}

/// One record as an ATF line.
pub fn raw_line(record: &FlatLineRecord) -> String {
    let raw = record.raw_text.trim();

    if raw.starts_with('$') {
        return raw.to_string();
    }
    if record.is_ruling || record.is_blank {
        let text = match raw {
            "" if record.is_ruling => DEFAULT_RULING,
            "" => DEFAULT_BLANK,
            text => text,
        };
        return format!("$ {}", text);
    }

    let number = record.line_number.trim();
    if number.is_empty() {
        raw.to_string()
    } else {
        format!("{} {}", number, raw)
    }
}
