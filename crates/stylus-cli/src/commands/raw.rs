//! Raw command - reconstruct ATF-like text from line rows.

use std::path::PathBuf;

use colored::Colorize;
use stylus::StylusConfig;
use stylus::atf::reconstruct_raw_text;

use super::{load_tablets, selected};

pub fn run(
    config: StylusConfig,
    lines: PathBuf,
    tablet: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, table) = load_tablets(config, &lines, tablet.as_deref())?;

    for (tablet_id, records) in selected(&table, tablet.as_deref()) {
        println!("{}", format!("&{}", tablet_id).cyan().bold());
        println!("{}", reconstruct_raw_text(records));
        println!();
    }
    Ok(())
}
