//! CLI command implementations.

pub mod align;
pub mod extract;
pub mod legend;
pub mod raw;
pub mod status;
pub mod structure;

use std::path::Path;

use stylus::input::{FlatLineRecord, LineTable};
use stylus::{Stylus, StylusConfig};

/// Load a line file and select the requested tablets, in file order.
pub(crate) fn load_tablets(
    config: StylusConfig,
    lines: &Path,
    tablet: Option<&str>,
) -> Result<(Stylus, LineTable), Box<dyn std::error::Error>> {
    if !lines.exists() {
        return Err(format!("File not found: {}", lines.display()).into());
    }

    let stylus = Stylus::with_config(config);
    let (table, _) = stylus.load_lines(lines)?;

    if let Some(id) = tablet {
        if table.get(id).is_none() {
            return Err(format!("Tablet '{}' not found in {}", id, lines.display()).into());
        }
    }
    Ok((stylus, table))
}

/// Tablets of a table, optionally restricted to one id.
pub(crate) fn selected<'a>(
    table: &'a LineTable,
    tablet: Option<&'a str>,
) -> impl Iterator<Item = (&'a str, &'a [FlatLineRecord])> {
    table
        .iter()
        .filter(move |(id, _)| tablet.is_none_or(|wanted| wanted == *id))
}
