//! haref core - reference-consistency validation engine
//!
//! This crate checks that a loaded Home Assistant configuration tree only
//! refers to things that exist, including:
//! - Stable pre-order document walk with inherited context (automation,
//!   script, scene, dashboard, blueprint)
//! - Reference extraction from keyed values and templated strings
//! - Blueprint `!input` substitution with a run-scoped cache
//! - Registry cross-checks and context-sensitive severity
//!
//! The crate performs no I/O. Documents, registries and blueprints are
//! handed in already loaded; findings are returned as plain data.

pub mod blueprint;
pub mod errors;
pub mod extract;
pub mod logging_facility;
pub mod model;
pub mod report;
pub mod rules;
pub mod traversal;
pub mod validate;

pub use haref_core_types::schema;

// Re-export commonly used types
pub use blueprint::{BlueprintCache, BlueprintSource, NoBlueprints};
pub use errors::{ExError, ExErrorKind, HarefError, Result};
pub use model::{
    BlueprintDefinition, ConfigNode, ContextKind, Finding, FindingCode, InputSpec, NodePath,
    RegistrySnapshot, Severity,
};
pub use report::ValidationReport;
pub use validate::{validate, ValidationOptions, Validator, DEFAULT_BUILTIN_DOMAINS};
