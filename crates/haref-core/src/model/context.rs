use serde::Serialize;

/// Kind of document a node belongs to
///
/// Inherited from the nearest ancestor whose shape declares a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Automation,
    Script,
    Scene,
    Dashboard,
    /// Blueprint-backed automation (`use_blueprint`)
    Blueprint,
    Unknown,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Automation => "automation",
            ContextKind::Script => "script",
            ContextKind::Scene => "scene",
            ContextKind::Dashboard => "dashboard",
            ContextKind::Blueprint => "blueprint",
            ContextKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State inherited by every node of a subtree during a walk
///
/// Passed down by value; a child never changes its parent's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub context: ContextKind,
    /// Set below a `use_blueprint` node whose blueprint could not be loaded
    pub unavailable_blueprint: Option<String>,
}

impl Scope {
    pub fn new(context: ContextKind) -> Self {
        Self {
            context,
            unavailable_blueprint: None,
        }
    }

    /// Same scope with a different context kind
    pub fn with_context(&self, context: ContextKind) -> Self {
        Self {
            context,
            unavailable_blueprint: self.unavailable_blueprint.clone(),
        }
    }

    /// Same scope marked as lying under an unavailable blueprint
    ///
    /// The outermost unavailable blueprint is kept.
    pub fn quarantined(&self, blueprint: impl Into<String>) -> Self {
        Self {
            context: self.context,
            unavailable_blueprint: self
                .unavailable_blueprint
                .clone()
                .or_else(|| Some(blueprint.into())),
        }
    }

    pub fn is_quarantined(&self) -> bool {
        self.unavailable_blueprint.is_some()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(ContextKind::Unknown)
    }
}
