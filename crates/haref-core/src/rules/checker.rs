use std::collections::BTreeSet;

use crate::extract::shape::{is_registry_id, is_service_shaped};
use crate::model::{Origin, RawReference, ReferenceKind, RegistrySnapshot};

/// Result of looking one reference up in the registry snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found,
    /// Known but disabled; `entity_id` is the resolved id for registry ids
    Disabled { entity_id: String },
    NotFound,
    /// Service text that is not `domain.service`
    Malformed,
    /// Blueprint input without a value
    UnresolvedInput { required: bool },
}

/// Look `reference` up in `registry`
///
/// Services are known if their domain is built in, registered as a service
/// domain, or the domain of a registered entity.
pub fn check(
    reference: &RawReference,
    registry: &RegistrySnapshot,
    builtin_domains: &BTreeSet<String>,
) -> Outcome {
    let value = reference.value.as_str();
    match reference.kind {
        ReferenceKind::Entity => check_entity(value, registry),
        ReferenceKind::Device => found_if(registry.has_device(value)),
        ReferenceKind::Area => found_if(registry.has_area(value)),
        ReferenceKind::Service => {
            if !is_service_shaped(reference.display_value()) {
                Outcome::Malformed
            } else {
                found_if(
                    builtin_domains.contains(value)
                        || registry.service_domains.contains(value)
                        || registry.has_entity_domain(value),
                )
            }
        }
        ReferenceKind::BlueprintInput => match reference.origin {
            Origin::Placeholder { required } => Outcome::UnresolvedInput { required },
            _ => Outcome::UnresolvedInput { required: false },
        },
    }
}

fn check_entity(value: &str, registry: &RegistrySnapshot) -> Outcome {
    if is_registry_id(value) {
        return match registry.entity_for_registry_id(value) {
            Some(entity_id) if registry.is_disabled(entity_id) => Outcome::Disabled {
                entity_id: entity_id.to_string(),
            },
            Some(_) => Outcome::Found,
            None => Outcome::NotFound,
        };
    }
    if registry.has_entity(value) {
        Outcome::Found
    } else if registry.is_disabled(value) {
        Outcome::Disabled {
            entity_id: value.to_string(),
        }
    } else {
        Outcome::NotFound
    }
}

fn found_if(known: bool) -> Outcome {
    if known {
        Outcome::Found
    } else {
        Outcome::NotFound
    }
}
