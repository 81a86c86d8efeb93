//! Ordered findings of one validation run

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::model::{Finding, Severity};

/// Findings of one run in traversal order, never reordered by severity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// Info findings dropped because the run was not verbose
    pub suppressed_info: usize,
}

impl ValidationReport {
    pub fn new(findings: Vec<Finding>, suppressed_info: usize) -> Self {
        Self {
            findings,
            suppressed_info,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether the run fails: any error, or any warning when `strict`
    pub fn is_failure(&self, strict: bool) -> bool {
        self.has_errors() || (strict && self.warning_count() > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// SHA-256 of the canonical JSON of the findings.
    ///
    /// Two runs over the same tree and registry yield the same digest.
    ///
    /// ## Returns
    ///
    /// Hex-encoded digest (64 characters)
    ///
    /// ## Errors
    ///
    /// Returns `HarefError::Serialization` if JSON serialization fails.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_string(&self.findings)?;
        Ok(hash_string(&canonical))
    }
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FindingCode, NodePath, ReferenceKind};

    fn finding(severity: Severity, value: &str) -> Finding {
        Finding {
            severity,
            code: FindingCode::UnknownRegistryEntry,
            reference_kind: Some(ReferenceKind::Entity),
            value: value.to_string(),
            path: NodePath::new().key("entity_id"),
            message: format!("unknown entity reference '{}' at entity_id", value),
        }
    }

    #[test]
    fn test_failure_strictness() {
        let warnings = ValidationReport::new(vec![finding(Severity::Warning, "light.a")], 0);
        assert!(!warnings.is_failure(false));
        assert!(warnings.is_failure(true));

        let errors = ValidationReport::new(vec![finding(Severity::Error, "light.a")], 0);
        assert!(errors.is_failure(false));

        assert!(!ValidationReport::default().is_failure(true));
    }

    #[test]
    fn test_digest_is_order_sensitive() {
        let a = finding(Severity::Error, "light.a");
        let b = finding(Severity::Error, "light.b");
        let ab = ValidationReport::new(vec![a.clone(), b.clone()], 0);
        let ba = ValidationReport::new(vec![b, a], 0);
        let digest = ab.digest().unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, ab.clone().digest().unwrap());
        assert_ne!(digest, ba.digest().unwrap());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(finding(Severity::Warning, "light.a")).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["code"], "UnknownRegistryEntry");
        assert_eq!(json["reference_kind"], "entity");
        assert_eq!(json["path"], "entity_id");
    }
}
