//! Validate command
//!
//! Usage: haref validate [CONFIG_DIR] [-v] [--strict] [--format text|json]

use std::path::PathBuf;

use clap::Args;
use haref_core::{BlueprintCache, Validator};
use haref_store::config::CONFIG_FILE;
use haref_store::{
    discover_documents, load_documents, load_registry, BlueprintDirectory, ValidatorConfig,
};

use super::output::{DocumentResult, RunSummary};
use super::{init_logging, OutputFormat};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the Home Assistant config directory
    #[arg(default_value = "config")]
    pub config_dir: PathBuf,

    /// Show info findings and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Validator configuration file (default: ./validation_config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to stderr as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// Execute validate command; `Ok(false)` when the run fails
pub fn execute(args: ValidateArgs) -> Result<bool, Box<dyn std::error::Error>> {
    init_logging(args.verbose, args.log_json);

    let settings =
        ValidatorConfig::load(&args.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE)));
    let documents = discover_documents(&args.config_dir, &settings)?;
    let registry = load_registry(&args.config_dir)?;
    let blueprints = BlueprintDirectory::open(&args.config_dir)?;

    let options = settings.to_options(args.verbose);
    let validator = Validator::new(&registry, &options);

    let mut results = Vec::new();
    for (source, loaded) in load_documents(documents) {
        let result = match loaded {
            Ok(document) => {
                let mut cache = BlueprintCache::new(&blueprints);
                let report = validator.validate(&document.root, document.context, &mut cache);
                DocumentResult::validated(document.name, report)
            }
            Err(err) => DocumentResult::failed(source.name, err),
        };
        results.push(result);
    }

    let summary = RunSummary::new(results, args.strict);
    match args.format {
        OutputFormat::Text => print!("{}", summary.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(summary.passed)
}
