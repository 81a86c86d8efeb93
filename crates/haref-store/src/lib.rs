//! haref store - filesystem adapters for the reference validator
//!
//! Provides:
//! - Home Assistant YAML loading (`!include*`, `!input`, `!secret`)
//! - Registry snapshots from `.storage/core.*` registries
//! - A blueprint source over `<config>/blueprints`
//! - The validator configuration file
//! - Discovery of the documents in a configuration directory

pub mod blueprints;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod registry;
pub mod walk;
pub mod yaml;

// Re-export key types
pub use blueprints::BlueprintDirectory;
pub use config::ValidatorConfig;
pub use discovery::{
    discover_documents, load_documents, Document, DocumentFormat, DocumentSource,
};
pub use errors::Result;
pub use registry::{entity_summary, load_registry, DomainSummary};
pub use yaml::{load_yaml_file, load_yaml_tree, parse_yaml_str, YamlTree};
