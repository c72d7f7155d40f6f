//! Align command - align translations to lines and save a report.

use std::path::PathBuf;

use colored::Colorize;
use stylus::alignment::{MatchMethod, report_path};
use stylus::{Stylus, StylusConfig};

pub fn run(
    mut config: StylusConfig,
    lines: PathBuf,
    translations: PathBuf,
    output: Option<PathBuf>,
    language: Option<String>,
    no_positional: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for file in [&lines, &translations] {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
    }

    // Flags override the config file.
    if language.is_some() {
        config.alignment.language = language;
    }
    if no_positional {
        config.alignment.positional_fallback = false;
    }

    println!(
        "{} {} {} {}",
        "Aligning".cyan().bold(),
        translations.display().to_string().white(),
        "to".cyan().bold(),
        lines.display().to_string().white()
    );

    let stylus = Stylus::with_config(config);
    let report = stylus.align_files(&lines, &translations)?;
    let summary = &report.summary;

    if verbose {
        println!();
        println!("{}", "Tablets:".yellow().bold());
        for tablet in &report.tablets {
            println!(
                "  {:12} {:4} lines {:4}/{:<4} matched",
                tablet.tablet_id,
                tablet.line_count,
                tablet.summary.matched,
                tablet.summary.total
            );
        }
        println!();
    }

    println!(
        "Aligned {} translations across {} tablets ({} matched, {} unmatched, {} unmatchable)",
        summary.total.to_string().white().bold(),
        report.tablets.len(),
        summary.matched.to_string().green(),
        summary.unmatched.to_string().red(),
        summary.unmatchable.to_string().yellow()
    );
    for method in MatchMethod::ALL {
        if let Some(count) = summary.by_method.get(&method) {
            println!("  {:20} {}", method.label(), count);
        }
    }
    if let Some(mean) = summary.mean_confidence {
        println!("Mean confidence: {:.2}", mean);
    }

    let output_path = output.unwrap_or_else(|| report_path(&translations));
    report.save(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    let unresolved = summary.unmatched + summary.unmatchable;
    if unresolved > 0 {
        println!(
            "Run {} to list {} translations for review",
            format!("stylus status --unresolved {}", output_path.display())
                .cyan()
                .bold(),
            unresolved
        );
    }
    Ok(())
}
