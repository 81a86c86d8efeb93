use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of the known entities, devices, areas and domains
///
/// Owned by the caller and borrowed read-only for a validation run.
/// `disabled_entities` and `entities` are disjoint: a disabled entity is
/// known but is not a valid target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub entities: BTreeSet<String>,
    pub devices: BTreeSet<String>,
    pub areas: BTreeSet<String>,
    pub service_domains: BTreeSet<String>,
    #[serde(default)]
    pub disabled_entities: BTreeSet<String>,
    /// Entity registry id (32 hex chars) to entity id
    #[serde(default)]
    pub entity_registry_ids: BTreeMap<String, String>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enabled entity; removes it from the disabled set
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        self.disabled_entities.remove(&entity_id);
        self.entities.insert(entity_id);
        self
    }

    /// Add a disabled entity; removes it from the enabled set
    pub fn with_disabled_entity(mut self, entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        self.entities.remove(&entity_id);
        self.disabled_entities.insert(entity_id);
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.devices.insert(device_id.into());
        self
    }

    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.areas.insert(area_id.into());
        self
    }

    pub fn with_service_domain(mut self, domain: impl Into<String>) -> Self {
        self.service_domains.insert(domain.into());
        self
    }

    pub fn with_registry_id(
        mut self,
        registry_id: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_registry_ids
            .insert(registry_id.into(), entity_id.into());
        self
    }

    pub fn has_entity(&self, entity_id: &str) -> bool {
        self.entities.contains(entity_id)
    }

    pub fn is_disabled(&self, entity_id: &str) -> bool {
        self.disabled_entities.contains(entity_id)
    }

    pub fn has_device(&self, device_id: &str) -> bool {
        self.devices.contains(device_id)
    }

    pub fn has_area(&self, area_id: &str) -> bool {
        self.areas.contains(area_id)
    }

    /// Entity id registered under a registry id
    pub fn entity_for_registry_id(&self, registry_id: &str) -> Option<&str> {
        self.entity_registry_ids.get(registry_id).map(String::as_str)
    }

    /// Whether any enabled or disabled entity belongs to `domain`
    pub fn has_entity_domain(&self, domain: &str) -> bool {
        self.entities
            .iter()
            .chain(self.disabled_entities.iter())
            .any(|e| e.split_once('.').is_some_and(|(d, _)| d == domain))
    }
}
