pub mod output;
pub mod summary;
pub mod validate;

use clap::ValueEnum;
use haref_core::logging_facility::{init, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Install a log subscriber only when asked; default output stays quiet
pub fn init_logging(verbose: bool, log_json: bool) {
    if log_json {
        init(Profile::Production);
    } else if verbose {
        init(Profile::Development);
    }
}
