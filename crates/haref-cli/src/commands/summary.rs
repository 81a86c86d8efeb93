//! Summary command
//!
//! Usage: haref summary [CONFIG_DIR] [--format text|json]

use std::path::PathBuf;

use clap::Args;
use haref_store::{entity_summary, load_registry};

use super::{init_logging, OutputFormat};

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Path to the Home Assistant config directory
    #[arg(default_value = "config")]
    pub config_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute summary command
pub fn execute(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.verbose, false);

    let registry = load_registry(&args.config_dir)?;
    let summary = entity_summary(&registry);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("AVAILABLE ENTITIES BY DOMAIN:");
            for (domain, info) in &summary {
                println!(
                    "  {}: {} enabled, {} disabled",
                    domain, info.enabled, info.disabled
                );
                if !info.examples.is_empty() {
                    println!("    Examples: {}", info.examples.join(", "));
                }
            }
        }
    }
    Ok(())
}
