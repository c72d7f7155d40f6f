//! Legend command - list the display features used by tablets.

use std::path::PathBuf;

use colored::Colorize;
use stylus::StylusConfig;

use super::{load_tablets, selected};

pub fn run(
    config: StylusConfig,
    lines: PathBuf,
    tablet: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (stylus, table) = load_tablets(config, &lines, tablet.as_deref())?;

    let legends: Vec<_> = selected(&table, tablet.as_deref())
        .map(|(tablet_id, records)| {
            let view = stylus.view_tablet(tablet_id, records);
            (view.tablet_id, view.legend)
        })
        .collect();

    if json_output {
        let output: Vec<_> = legends
            .iter()
            .map(|(tablet_id, legend)| {
                serde_json::json!({
                    "tablet_id": tablet_id,
                    "legend": legend,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (tablet_id, legend) in &legends {
        println!("{}", tablet_id.cyan().bold());
        for entry in legend {
            println!(
                "  {:8} {:32} {}",
                entry.symbol.white().bold(),
                entry.label,
                entry.class.dimmed()
            );
        }
        println!();
    }
    Ok(())
}
