//! Error helpers for haref-store
//!
//! Adapters report failures as core `HarefError` values so that the
//! validator and the CLI share one error type.

use std::path::Path;

use haref_core::errors::HarefError;

/// Result type alias using HarefError
pub type Result<T> = std::result::Result<T, HarefError>;

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Create a missing config directory error
pub fn config_dir_not_found(path: &Path) -> HarefError {
    HarefError::ConfigDirNotFound {
        path: display(path),
    }
}

/// Create a missing registry file error
pub fn registry_not_found(path: &Path) -> HarefError {
    HarefError::RegistryNotFound {
        path: display(path),
    }
}

/// Create an undecodable registry file error
pub fn invalid_registry(path: &Path, reason: impl std::fmt::Display) -> HarefError {
    HarefError::InvalidRegistry {
        path: display(path),
        reason: reason.to_string(),
    }
}

/// Create a YAML parse error
pub fn yaml_parse(path: &Path, reason: impl std::fmt::Display) -> HarefError {
    HarefError::YamlParse {
        path: display(path),
        reason: reason.to_string(),
    }
}

/// Create a missing include target error
pub fn include_not_found(path: &Path, from: &Path) -> HarefError {
    HarefError::IncludeNotFound {
        path: display(path),
        from: display(from),
    }
}

/// Create an include cycle error
pub fn include_cycle(path: &Path) -> HarefError {
    HarefError::IncludeCycle {
        path: display(path),
    }
}

/// Create a blueprint lookup error
pub fn blueprint_not_found(name: &str) -> HarefError {
    HarefError::BlueprintNotFound {
        name: name.to_string(),
    }
}

/// Create an unusable blueprint error
pub fn invalid_blueprint(name: &str, reason: impl std::fmt::Display) -> HarefError {
    HarefError::InvalidBlueprint {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> HarefError {
    HarefError::Io {
        op: operation.to_string(),
        path: display(path),
        message: err.to_string(),
    }
}
