//! Surface names, abbreviations and display labels.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Abbreviation or alias → canonical surface name.
static SURFACE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let entries: &[(&[&str], &str)] = &[
        (&["obverse", "obv", "obv.", "o", "o."], "obverse"),
        (&["reverse", "rev", "rev.", "r", "r."], "reverse"),
        (&["left edge", "l.e.", "l.e", "le", "le.", "left"], "left edge"),
        (&["right edge", "r.e.", "r.e", "re.", "right"], "right edge"),
        (
            &["top edge", "upper edge", "u.e.", "u.e", "ue", "t.e.", "t.e", "top"],
            "top edge",
        ),
        (
            &["bottom edge", "lower edge", "lo.e.", "lo.e", "lo.", "b.e.", "b.e", "bottom"],
            "bottom edge",
        ),
        (&["edge", "e."], "edge"),
        (&["seal", "s", "s."], "seal"),
        (&["envelope", "env."], "envelope"),
    ];

    let mut table = HashMap::new();
    for (aliases, canonical) in entries {
        for alias in *aliases {
            table.insert(*alias, *canonical);
        }
    }
    table
});

/// Canonical surface name → display label.
static SURFACE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("obverse", "Obverse"),
        ("reverse", "Reverse"),
        ("left edge", "Left Edge"),
        ("right edge", "Right Edge"),
        ("top edge", "Top Edge"),
        ("bottom edge", "Bottom Edge"),
        ("edge", "Edge"),
        ("seal", "Seal"),
        ("envelope", "Envelope"),
    ])
});

/// Canonical name for a surface token, if it is a known surface or alias.
pub fn canonical_surface(token: &str) -> Option<&'static str> {
    let key = collapse_whitespace(token).to_lowercase();
    SURFACE_ALIASES.get(key.as_str()).copied()
}

/// Canonical name for a surface as stored on a line record. Unknown names
/// pass through lowercased so that they still compare consistently.
pub fn normalize_surface(name: &str) -> String {
    match canonical_surface(name) {
        Some(canonical) => canonical.to_string(),
        None => collapse_whitespace(name).to_lowercase(),
    }
}

/// Display label for a surface name ("left edge" → "Left Edge").
pub fn surface_label(name: &str) -> String {
    if let Some(label) = canonical_surface(name).and_then(|c| SURFACE_LABELS.get(c)) {
        return label.to_string();
    }
    collapse_whitespace(name)
        .split(' ')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
