use crate::model::{
    ContextKind, Finding, FindingCode, Origin, RawReference, ReferenceKind, Severity,
};

use super::checker::Outcome;

/// Turn a lookup outcome into a finding, or `None` when the reference is
/// valid
///
/// Severity for an unknown reference depends on where it occurs:
///
/// | Situation | Severity |
/// |---|---|
/// | below an unavailable blueprint | Info |
/// | dashboard | Warning |
/// | anywhere else | Error |
///
/// Malformed services are errors everywhere.
pub fn classify(reference: &RawReference, outcome: &Outcome) -> Option<Finding> {
    let quarantined = reference.scope.is_quarantined();
    let (severity, code, message) = match outcome {
        Outcome::Found => return None,
        Outcome::Malformed => (
            Severity::Error,
            FindingCode::MalformedReference,
            format!(
                "malformed {} reference '{}' at {}: expected 'domain.service'",
                reference.kind,
                reference.display_value(),
                reference.path
            ),
        ),
        Outcome::NotFound => (
            unknown_severity(reference),
            FindingCode::UnknownRegistryEntry,
            format!(
                "unknown {} reference '{}' at {}",
                reference.kind,
                reference.display_value(),
                reference.path
            ),
        ),
        Outcome::Disabled { entity_id } => (
            if quarantined {
                Severity::Info
            } else {
                Severity::Warning
            },
            FindingCode::DisabledEntity,
            format!(
                "{} reference '{}' at {} targets disabled entity '{}'",
                reference.kind, reference.value, reference.path, entity_id
            ),
        ),
        Outcome::UnresolvedInput { required } => (
            if *required && !quarantined {
                Severity::Error
            } else {
                Severity::Info
            },
            FindingCode::UnresolvedBlueprintInput,
            format!(
                "{}blueprint input '{}' at {} has no value and no default",
                if *required { "required " } else { "" },
                reference.value,
                reference.path
            ),
        ),
    };

    Some(Finding {
        severity,
        code,
        reference_kind: Some(reference.kind),
        value: reference.value.clone(),
        path: reference.path.clone(),
        message: annotate(message, reference),
    })
}

fn unknown_severity(reference: &RawReference) -> Severity {
    if reference.scope.is_quarantined() {
        return Severity::Info;
    }
    match reference.scope.context {
        ContextKind::Dashboard => Severity::Warning,
        ContextKind::Automation
        | ContextKind::Script
        | ContextKind::Scene
        | ContextKind::Blueprint
        | ContextKind::Unknown => Severity::Error,
    }
}

fn annotate(message: String, reference: &RawReference) -> String {
    let mut message = message;
    if reference.kind == ReferenceKind::Entity && reference.origin == Origin::ServiceTarget {
        message.push_str(" (called as a service)");
    }
    if let Some(blueprint) = &reference.scope.unavailable_blueprint {
        message.push_str(&format!(" (inside unavailable blueprint '{}')", blueprint));
    }
    message
}
