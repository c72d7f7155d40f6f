//! Extract command - show the line reference found in translation texts.

use colored::Colorize;
use stylus::alignment::{Extraction, extract_reference};

pub fn run(texts: Vec<String>, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        let output: Vec<_> = texts
            .iter()
            .map(|text| {
                let outcome = match extract_reference(text) {
                    Extraction::Unmatchable(reason) => serde_json::json!({
                        "outcome": "unmatchable",
                        "reason": reason,
                    }),
                    Extraction::Reference(reference) => serde_json::json!({
                        "outcome": "reference",
                        "reference": reference,
                    }),
                    Extraction::NotFound => serde_json::json!({ "outcome": "not_found" }),
                };
                serde_json::json!({ "text": text, "result": outcome })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for text in &texts {
        println!("{}", text.white().bold());
        match extract_reference(text) {
            Extraction::Unmatchable(reason) => {
                println!("  {} {}", "unmatchable:".yellow(), reason.label());
            }
            Extraction::Reference(reference) => {
                println!(
                    "  {} line {} on {} (confidence {:.2}, {:?})",
                    "reference:".green(),
                    reference.line_number.white().bold(),
                    reference.surface.as_deref().unwrap_or("any surface"),
                    reference.confidence,
                    reference.tier
                );
            }
            Extraction::NotFound => {
                println!("  {}", "no reference (positional fallback applies)".dimmed());
            }
        }
    }
    Ok(())
}
