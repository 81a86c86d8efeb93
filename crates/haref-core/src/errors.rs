use thiserror::Error;

use crate::schema::{OP_DISCOVER_DOCUMENTS, OP_LOAD_BLUEPRINT, OP_LOAD_REGISTRY, OP_LOAD_YAML};

/// Result type alias using HarefError
pub type Result<T> = std::result::Result<T, HarefError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Reference problems found in a configuration tree are never errors: they
/// become findings. This taxonomy covers the failures of the collaborators
/// that feed the validator (loading documents, registries and blueprints).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    NotFound,
    IncludeCycle,

    // Registry / blueprint sources
    InvalidRegistry,
    BlueprintUnavailable,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::IncludeCycle => "ERR_INCLUDE_CYCLE",
            ExErrorKind::InvalidRegistry => "ERR_INVALID_REGISTRY",
            ExErrorKind::BlueprintUnavailable => "ERR_BLUEPRINT_UNAVAILABLE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the
/// operation and file path that produced it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Concrete failures raised by document, registry and blueprint sources
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarefError {
    /// Configuration directory does not exist
    #[error("Config directory {path} does not exist")]
    ConfigDirNotFound { path: String },

    /// Required registry file is missing
    #[error("Registry not found: {path}")]
    RegistryNotFound { path: String },

    /// Registry file exists but could not be decoded
    #[error("Invalid JSON in registry {path}: {reason}")]
    InvalidRegistry { path: String, reason: String },

    /// YAML document could not be parsed
    #[error("Failed to load YAML {path}: {reason}")]
    YamlParse { path: String, reason: String },

    /// `!include` target does not exist
    #[error("Included path {path} not found (included from {from})")]
    IncludeNotFound { path: String, from: String },

    /// `!include` chain leads back to a file that is still being loaded
    #[error("Include cycle detected: {path} includes itself")]
    IncludeCycle { path: String },

    /// No blueprint with this name exists in the source
    #[error("Blueprint not found: {name}")]
    BlueprintNotFound { name: String },

    /// Blueprint file exists but has no usable definition
    #[error("Invalid blueprint {name}: {reason}")]
    InvalidBlueprint { name: String, reason: String },

    /// Filesystem failure
    #[error("I/O error during {op} on {path}: {message}")]
    Io {
        op: String,
        path: String,
        message: String,
    },

    /// Serialization failure (report digests, JSON output)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from HarefError to ExError
///
/// Maps each concrete failure to its stable kind.
impl From<HarefError> for ExError {
    fn from(err: HarefError) -> Self {
        let message = err.to_string();
        match err {
            HarefError::ConfigDirNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_op(OP_DISCOVER_DOCUMENTS)
                .with_path(path)
                .with_message(message),

            HarefError::RegistryNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_op(OP_LOAD_REGISTRY)
                .with_path(path)
                .with_message(message),

            HarefError::InvalidRegistry { path, .. } => {
                ExError::new(ExErrorKind::InvalidRegistry)
                    .with_op(OP_LOAD_REGISTRY)
                    .with_path(path)
                    .with_message(message)
            }

            HarefError::YamlParse { path, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op(OP_LOAD_YAML)
                .with_path(path)
                .with_message(message),

            HarefError::IncludeNotFound { path, .. } => ExError::new(ExErrorKind::NotFound)
                .with_op(OP_LOAD_YAML)
                .with_path(path)
                .with_message(message),

            HarefError::IncludeCycle { path } => ExError::new(ExErrorKind::IncludeCycle)
                .with_op(OP_LOAD_YAML)
                .with_path(path)
                .with_message(message),

            HarefError::BlueprintNotFound { .. } => {
                ExError::new(ExErrorKind::BlueprintUnavailable)
                    .with_op(OP_LOAD_BLUEPRINT)
                    .with_message(message)
            }

            HarefError::InvalidBlueprint { .. } => {
                ExError::new(ExErrorKind::BlueprintUnavailable)
                    .with_op(OP_LOAD_BLUEPRINT)
                    .with_message(message)
            }

            HarefError::Io { op, path, .. } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_path(path)
                .with_message(message),

            HarefError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to HarefError
impl From<serde_json::Error> for HarefError {
    fn from(err: serde_json::Error) -> Self {
        HarefError::Serialization {
            message: err.to_string(),
        }
    }
}
