//! Stylus CLI - ATF structuring and translation alignment.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use stylus::StylusConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<StylusConfig, Box<dyn std::error::Error>> {
    match &cli.config {
        Some(path) => {
            let config = StylusConfig::from_file(path)?;
            debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(StylusConfig::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Structure {
            lines,
            tablet,
            translations,
            json,
        } => commands::structure::run(config, lines, tablet, translations, json, cli.verbose),

        Commands::Raw { lines, tablet } => commands::raw::run(config, lines, tablet),

        Commands::Legend {
            lines,
            tablet,
            json,
        } => commands::legend::run(config, lines, tablet, json),

        Commands::Extract { texts, json } => commands::extract::run(texts, json),

        Commands::Align {
            lines,
            translations,
            output,
            language,
            no_positional,
        } => commands::align::run(
            config,
            lines,
            translations,
            output,
            language,
            no_positional,
            cli.verbose,
        ),

        Commands::Status {
            file,
            unresolved,
            json,
        } => commands::status::run(file, unresolved, json),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
