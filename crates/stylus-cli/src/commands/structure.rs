//! Structure command - show tablets as surfaces, columns and lines.

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use stylus::atf::{StructuredLine, WordToken};
use stylus::{StylusConfig, TabletView};

use super::{load_tablets, selected};

pub fn run(
    config: StylusConfig,
    lines: PathBuf,
    tablet: Option<String>,
    translations: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (stylus, table) = load_tablets(config, &lines, tablet.as_deref())?;

    let translation_table = match &translations {
        Some(path) => Some(stylus.load_translations(path)?.0),
        None => None,
    };

    let mut views: Vec<TabletView> = Vec::new();
    for (tablet_id, records) in selected(&table, tablet.as_deref()) {
        let rows = translation_table.as_ref().and_then(|t| t.get(tablet_id));
        let view = match rows {
            Some(rows) => {
                let (view, alignment) = stylus.view_aligned_tablet(tablet_id, records, rows);
                if verbose {
                    eprintln!(
                        "{}: {}/{} translations aligned",
                        tablet_id,
                        alignment.summary.matched,
                        alignment.summary.total
                    );
                }
                view
            }
            None => stylus.view_tablet(tablet_id, records),
        };
        views.push(view);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for view in &views {
        print_view(view, verbose);
    }
    Ok(())
}

fn print_view(view: &TabletView, verbose: bool) {
    println!("{}", view.tablet_id.cyan().bold());

    for surface in &view.document.surfaces {
        println!("  {}", surface.display_label.yellow().bold());

        for column in &surface.columns {
            let indent = if column.number > 0 {
                println!("    {}", format!("Column {}", column.number).yellow());
                "      "
            } else {
                "    "
            };

            for line in &column.lines {
                print_line(line, indent, verbose);
            }
        }
    }
    println!();
}

fn print_line(line: &StructuredLine, indent: &str, verbose: bool) {
    match line {
        StructuredLine::State { text } => {
            println!("{}{}", indent, format!("({})", text).dimmed().italic());
        }
        StructuredLine::Content {
            number,
            words,
            composite,
            translation,
            ..
        } => {
            let rendered: Vec<String> = words.iter().map(|w| paint(w).to_string()).collect();
            print!("{}{:6} {}", indent, number.white().bold(), rendered.join(" "));
            if let Some(composite) = composite {
                print!(" {}", format!(">>{} {}", composite.q_number, composite.line_text).blue());
            }
            println!();

            if let Some(translation) = translation {
                println!("{}       {}", indent, translation.green());
            }

            if verbose {
                let keys: Vec<&str> = words.iter().filter_map(|w| w.lookup_key()).collect();
                if !keys.is_empty() {
                    println!("{}       {}", indent, keys.join(" ").dimmed());
                }
            }
        }
    }
}

fn paint(token: &WordToken) -> ColoredString {
    match token {
        WordToken::Punctuation { text, .. } => text.as_str().dimmed(),
        WordToken::Broken { text, .. } => text.as_str().bright_black(),
        WordToken::Logogram { display, .. } => display.as_str().magenta(),
        WordToken::Determinative { det_type, .. } if det_type == "divine" => {
            token.to_atf().bright_cyan()
        }
        WordToken::Determinative { det_type, .. } if det_type == "place" => {
            token.to_atf().bright_green()
        }
        WordToken::Determinative { .. } => token.to_atf().cyan(),
        WordToken::Numeric { text, .. } => text.as_str().bright_blue(),
        WordToken::Word {
            text,
            damaged,
            uncertain,
            ..
        } => {
            if *damaged {
                text.as_str().red()
            } else if *uncertain {
                text.as_str().yellow()
            } else {
                text.as_str().normal()
            }
        }
    }
}
