//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stylus: ATF transliteration structuring and translation alignment
#[derive(Parser)]
#[command(name = "stylus")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the structured surface/column/line view of tablets
    Structure {
        /// Path to the line file (CSV/TSV)
        #[arg(value_name = "LINES")]
        lines: PathBuf,

        /// Only show this tablet (default: all tablets)
        #[arg(short, long)]
        tablet: Option<String>,

        /// Translation file to align and show inline
        #[arg(long, value_name = "TRANSLATIONS")]
        translations: Option<PathBuf>,

        /// Output the tablet views as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reconstruct ATF-like raw text for tablets
    Raw {
        /// Path to the line file (CSV/TSV)
        #[arg(value_name = "LINES")]
        lines: PathBuf,

        /// Only show this tablet (default: all tablets)
        #[arg(short, long)]
        tablet: Option<String>,
    },

    /// Show the display legend for tablets
    Legend {
        /// Path to the line file (CSV/TSV)
        #[arg(value_name = "LINES")]
        lines: PathBuf,

        /// Only show this tablet (default: all tablets)
        #[arg(short, long)]
        tablet: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract line references from translation texts
    Extract {
        /// Translation texts to analyze
        #[arg(value_name = "TEXT", required = true)]
        texts: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Align translations to lines and save an alignment report
    Align {
        /// Path to the line file (CSV/TSV)
        #[arg(value_name = "LINES")]
        lines: PathBuf,

        /// Path to the translation file (CSV/TSV)
        #[arg(value_name = "TRANSLATIONS")]
        translations: PathBuf,

        /// Output path for the report (default: <translations>.alignment.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only align translations in this language
        #[arg(short, long)]
        language: Option<String>,

        /// Disable the positional fallback
        #[arg(long)]
        no_positional: bool,
    },

    /// Show the summary of a saved alignment report
    Status {
        /// Path to the report or the translation file it was built from
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// List translations that need manual review
        #[arg(short, long)]
        unresolved: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
