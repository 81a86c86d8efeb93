use serde::Serialize;

use super::{NodePath, Scope};

/// What a reference names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Entity,
    Device,
    Area,
    Service,
    BlueprintInput,
}

impl ReferenceKind {
    /// Human-readable name used in finding messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Entity => "entity",
            ReferenceKind::Device => "device",
            ReferenceKind::Area => "area",
            ReferenceKind::Service => "service",
            ReferenceKind::BlueprintInput => "blueprint input",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the node a reference came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Value of a reference-bearing key (`entity_id`, `service`, ...)
    Key(String),
    /// Literal recovered from a templated string
    Template,
    /// Entity implied by a `script.<name>` / `scene.<name>` service call
    ServiceTarget,
    /// Blueprint input with no value after substitution
    Placeholder { required: bool },
}

/// A reference extracted from a configuration tree, before any lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub kind: ReferenceKind,
    /// Value looked up in the registry; trimmed and non-empty.
    /// For services this is the domain.
    pub value: String,
    /// Text as written, when it differs from `value` (full service name)
    pub literal: Option<String>,
    pub path: NodePath,
    pub scope: Scope,
    pub origin: Origin,
}

impl RawReference {
    /// Create a reference, or `None` if the trimmed value is empty
    ///
    /// # Arguments
    ///
    /// * `kind` - What the value names
    /// * `value` - Raw text; surrounding whitespace is removed
    /// * `path` - Location of the node the value came from
    /// * `scope` - Scope in effect at that node
    /// * `origin` - How the value was found
    pub fn new(
        kind: ReferenceKind,
        value: &str,
        path: NodePath,
        scope: Scope,
        origin: Origin,
    ) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            value: value.to_string(),
            literal: None,
            path,
            scope,
            origin,
        })
    }

    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    /// Text shown to users: the literal if present, else the value
    pub fn display_value(&self) -> &str {
        self.literal.as_deref().unwrap_or(&self.value)
    }
}
