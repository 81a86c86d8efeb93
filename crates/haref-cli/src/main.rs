//! haref CLI
//!
//! Command-line interface for the Home Assistant reference validator

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "haref")]
#[command(
    about = "Validate entity, device, area and service references in a Home Assistant config",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate every document of a config directory
    Validate(commands::validate::ValidateArgs),
    /// Show the entities available per domain
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Summary(args) => commands::summary::execute(args).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
