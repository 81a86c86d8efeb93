use serde::Serialize;

use super::{NodePath, ReferenceKind};

/// Severity of a finding, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable classification of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FindingCode {
    MalformedReference,
    UnknownRegistryEntry,
    DisabledEntity,
    UnresolvedBlueprintInput,
    UnexpectedBlueprintInput,
    BlueprintUnavailable,
    StructuralError,
}

impl FindingCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCode::MalformedReference => "MalformedReference",
            FindingCode::UnknownRegistryEntry => "UnknownRegistryEntry",
            FindingCode::DisabledEntity => "DisabledEntity",
            FindingCode::UnresolvedBlueprintInput => "UnresolvedBlueprintInput",
            FindingCode::UnexpectedBlueprintInput => "UnexpectedBlueprintInput",
            FindingCode::BlueprintUnavailable => "BlueprintUnavailable",
            FindingCode::StructuralError => "StructuralError",
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified validation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    /// Absent for findings that are not about a single reference
    pub reference_kind: Option<ReferenceKind>,
    pub value: String,
    pub path: NodePath,
    pub message: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}
