//! Determinative lookup table.
//!
//! Maps a determinative code (the text between `{` and `}`) to its semantic
//! class, a human-readable label and the superscript glyph shown in viewers.
//! Both the Unicode (`lu₂`, `giš`) and ASCII (`lu2`, `gesz`) spellings of a
//! code are registered.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Resolved information about a determinative code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminativeInfo {
    /// Semantic class (divine, place, wood, ...).
    pub det_type: String,
    /// Human-readable label.
    pub label: String,
    /// Display glyph.
    pub display: String,
}

/// Semantic class used for codes missing from the table.
pub const UNKNOWN_DETERMINATIVE_TYPE: &str = "other";

static DETERMINATIVES: Lazy<HashMap<&'static str, (&'static str, &'static str, &'static str)>> =
    Lazy::new(|| {
        let entries: &[(&[&str], (&str, &str, &str))] = &[
            (&["d", "dingir"], ("divine", "Divine name", "ᵈ")),
            (&["ki"], ("place", "Place name", "ᵏⁱ")),
            (&["uru"], ("place", "City", "ᵘʳᵘ")),
            (&["kur"], ("place", "Land / mountain", "ᵏᵘʳ")),
            (&["id₂", "id2", "i₇", "i7"], ("water", "River / canal", "ⁱᵈ")),
            (&["giš", "gis", "gesz", "ĝiš", "ŋiš"], ("wood", "Wooden object", "ᵍⁱˢ")),
            (&["lu₂", "lu2", "lú"], ("person", "Person / profession", "ˡᵘ")),
            (&["m", "1", "diš"], ("person", "Male personal name", "ᵐ")),
            (&["munus", "f", "mi₂", "mi2"], ("female", "Female name", "ᶠ")),
            (&["na₄", "na4"], ("stone", "Stone object", "ⁿᵃ")),
            (&["tug₂", "tug2", "túg"], ("textile", "Textile", "ᵗᵘᵍ")),
            (&["dug"], ("vessel", "Vessel", "ᵈᵘᵍ")),
            (&["urudu"], ("metal", "Copper object", "ᵘʳᵘᵈᵘ")),
            (&["zabar"], ("metal", "Bronze object", "ᶻᵃᵇᵃʳ")),
            (&["kuš", "kusz", "kus"], ("leather", "Leather object", "ᵏᵘˢ")),
            (&["gi"], ("reed", "Reed object", "ᵍⁱ")),
            (&["u₂", "u2", "ú"], ("plant", "Plant", "ᵘ")),
            (&["sar"], ("plant", "Vegetable / garden plant", "ˢᵃʳ")),
            (&["še", "sze"], ("grain", "Grain", "ˢᵉ")),
            (&["ku₆", "ku6"], ("fish", "Fish", "ᵏᵘ")),
            (&["mušen", "muszen", "musen"], ("bird", "Bird", "ᵐᵘˢᵉⁿ")),
            (&["anše", "ansze"], ("animal", "Equid", "ᵃⁿˢᵉ")),
            (&["iti", "itu"], ("month", "Month name", "ⁱᵗⁱ")),
            (&["mul"], ("star", "Star / constellation", "ᵐᵘˡ")),
            (&["e₂", "e2", "é"], ("building", "Building", "ᵉ")),
        ];

        let mut table = HashMap::new();
        for (codes, info) in entries {
            for code in *codes {
                table.insert(*code, *info);
            }
        }
        table
    });

/// Resolve a determinative code.
///
/// Lookup is case-insensitive. Unknown codes resolve to
/// `{other, <code>, (<code>)}`.
pub fn lookup_determinative(code: &str) -> DeterminativeInfo {
    let key = code.trim().to_lowercase();
    match DETERMINATIVES.get(key.as_str()) {
        Some((det_type, label, display)) => DeterminativeInfo {
            det_type: det_type.to_string(),
            label: label.to_string(),
            display: display.to_string(),
        },
        None => DeterminativeInfo {
            det_type: UNKNOWN_DETERMINATIVE_TYPE.to_string(),
            label: code.to_string(),
            display: format!("({})", code),
        },
    }
}
