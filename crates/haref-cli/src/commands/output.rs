//! Aggregated results of a multi-document run and their rendering

use std::fmt::Write;

use haref_core::model::{Finding, Severity};
use haref_core::ValidationReport;
use serde::Serialize;

/// Result for one discovered document
#[derive(Debug, Serialize)]
pub struct DocumentResult {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub findings: Vec<Finding>,
    pub suppressed_info: usize,
}

impl DocumentResult {
    pub fn validated(document: String, report: ValidationReport) -> Self {
        Self {
            document,
            load_error: None,
            findings: report.findings,
            suppressed_info: report.suppressed_info,
        }
    }

    pub fn failed(document: String, error: impl std::fmt::Display) -> Self {
        Self {
            document,
            load_error: Some(error.to_string()),
            findings: Vec::new(),
            suppressed_info: 0,
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Totals over all documents of a run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub documents: Vec<DocumentResult>,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub suppressed_info: usize,
    pub load_failures: usize,
    pub passed: bool,
}

impl RunSummary {
    /// Load failures count as errors; warnings fail the run only when strict
    pub fn new(documents: Vec<DocumentResult>, strict: bool) -> Self {
        let sum = |f: &dyn Fn(&DocumentResult) -> usize| documents.iter().map(f).sum::<usize>();
        let errors = sum(&|d| d.count(Severity::Error));
        let warnings = sum(&|d| d.count(Severity::Warning));
        let infos = sum(&|d| d.count(Severity::Info));
        let suppressed_info = sum(&|d| d.suppressed_info);
        let load_failures = documents.iter().filter(|d| d.load_error.is_some()).count();
        let passed = errors == 0 && load_failures == 0 && !(strict && warnings > 0);
        Self {
            documents,
            errors,
            warnings,
            infos,
            suppressed_info,
            load_failures,
            passed,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for document in &self.documents {
            if document.load_error.is_none() && document.findings.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{}:", document.document);
            if let Some(error) = &document.load_error {
                let _ = writeln!(out, "  ❌ {}", error);
            }
            for finding in &document.findings {
                let _ = writeln!(out, "  {} {}", marker(finding.severity), finding.message);
            }
            let _ = writeln!(out);
        }

        let _ = write!(
            out,
            "{} documents: {} errors, {} warnings, {} info",
            self.documents.len(),
            self.errors + self.load_failures,
            self.warnings,
            self.infos
        );
        if self.suppressed_info > 0 {
            let _ = write!(out, " ({} info suppressed, use -v)", self.suppressed_info);
        }
        let _ = writeln!(out);

        let verdict = if !self.passed {
            "❌ Invalid entity/device references found"
        } else if self.warnings > 0 {
            "✅ Entity/device references are valid (with warnings)"
        } else {
            "✅ All entity/device references are valid!"
        };
        let _ = writeln!(out, "{}", verdict);
        out
    }
}

fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️ ",
        Severity::Info => "ℹ️ ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haref_core::model::{FindingCode, NodePath};

    fn finding(severity: Severity) -> Finding {
        Finding {
            severity,
            code: FindingCode::UnknownRegistryEntry,
            reference_kind: None,
            value: "light.garage".to_string(),
            path: NodePath::new().index(0),
            message: "unknown entity reference 'light.garage' at [0]".to_string(),
        }
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let documents = || {
            vec![DocumentResult::validated(
                "automations.yaml".to_string(),
                ValidationReport::new(vec![finding(Severity::Warning)], 0),
            )]
        };
        assert!(RunSummary::new(documents(), false).passed);
        assert!(!RunSummary::new(documents(), true).passed);
    }

    #[test]
    fn test_load_failure_fails_run() {
        let summary = RunSummary::new(
            vec![DocumentResult::failed(
                "broken.yaml".to_string(),
                "Failed to load YAML broken.yaml: bad indentation",
            )],
            false,
        );
        assert!(!summary.passed);
        let text = summary.render_text();
        assert!(text.contains("broken.yaml:"));
        assert!(text.contains("1 documents: 1 errors"));
    }

    #[test]
    fn test_clean_run_text() {
        let summary = RunSummary::new(
            vec![DocumentResult::validated(
                "configuration.yaml".to_string(),
                ValidationReport::new(Vec::new(), 2),
            )],
            false,
        );
        let text = summary.render_text();
        assert!(!text.contains("configuration.yaml:"));
        assert!(text.contains("(2 info suppressed, use -v)"));
        assert!(text.ends_with("✅ All entity/device references are valid!\n"));
    }
}
