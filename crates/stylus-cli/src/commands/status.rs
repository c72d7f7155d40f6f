//! Status command - show the summary of a saved alignment report.

use std::path::PathBuf;

use colored::Colorize;
use stylus::AlignmentReport;
use stylus::alignment::{MatchMethod, report_path};

pub fn run(
    file: PathBuf,
    unresolved: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = if file.extension().map(|e| e == "json").unwrap_or(false) {
        file.clone()
    } else {
        // Assume it's a translation file, look for .alignment.json
        report_path(&file)
    };

    if !path.exists() {
        return Err(format!(
            "Alignment report not found: {}\nRun 'stylus align <LINES> {}' first.",
            path.display(),
            file.display()
        )
        .into());
    }

    let report = AlignmentReport::load(&path)?;
    let summary = &report.summary;

    if json_output {
        let mut status = serde_json::json!({
            "report": path.display().to_string(),
            "created_at": report.created_at,
            "tablets": report.tablets.len(),
            "summary": summary,
            "match_rate": summary.match_rate(),
        });
        if unresolved {
            let items: Vec<_> = report
                .unresolved()
                .map(|(tablet_id, m)| {
                    serde_json::json!({
                        "tablet_id": tablet_id,
                        "translation_id": m.translation_id,
                        "reason": m.unmatchable_reason,
                    })
                })
                .collect();
            status["unresolved"] = serde_json::Value::Array(items);
        }
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Alignment report".cyan().bold(),
        path.display().to_string().white()
    );
    if let Some(source) = &report.translations_source {
        println!("Translations: {} ({} rows)", source.file, source.row_count);
    }
    if let Some(source) = &report.lines_source {
        println!("Lines:        {} ({} rows)", source.file, source.row_count);
    }
    println!("Created:      {}", report.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!();

    let bar_width = 30;
    let filled = (summary.match_rate() * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    println!(
        "Matched: {} {}/{} ({:.0}%)",
        bar.cyan(),
        summary.matched.to_string().white().bold(),
        summary.total,
        summary.match_rate() * 100.0
    );
    println!();

    println!("{}", "By method:".yellow().bold());
    for method in MatchMethod::ALL {
        let count = summary.by_method.get(&method).copied().unwrap_or(0);
        println!("  {:20} {}", method.label(), count);
    }
    println!("  {:20} {}", "unmatched", summary.unmatched.to_string().red());

    if !summary.by_reason.is_empty() {
        println!();
        println!("{}", "Unmatchable:".yellow().bold());
        for (reason, count) in &summary.by_reason {
            println!("  {:20} {}", reason.label(), count);
        }
    }

    if unresolved {
        println!();
        println!("{}", "Needs review:".yellow().bold());
        for (tablet_id, m) in report.unresolved() {
            let why = m
                .unmatchable_reason
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| "no matching line".to_string());
            println!("  {:12} #{:<8} {}", tablet_id, m.translation_id, why.dimmed());
        }
    }
    Ok(())
}
