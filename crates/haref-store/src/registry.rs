//! Registry snapshot loading from `.storage`
//!
//! Reads the JSON stores Home Assistant keeps under `<config>/.storage`
//! into one [`RegistrySnapshot`]. The entity and device registries must
//! exist; area registry and config entries are optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use haref_core::model::RegistrySnapshot;
use haref_core::schema::OP_LOAD_REGISTRY;
use haref_core::{log_op_end, log_op_error, log_op_start};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{invalid_registry, io_error, registry_not_found, Result};

pub const ENTITY_REGISTRY: &str = "core.entity_registry";
pub const DEVICE_REGISTRY: &str = "core.device_registry";
pub const AREA_REGISTRY: &str = "core.area_registry";
pub const CONFIG_ENTRIES: &str = "core.config_entries";

const EXAMPLES_PER_DOMAIN: usize = 3;

/// Envelope shared by all `.storage` files
#[derive(Debug, Deserialize)]
struct StorageFile<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct EntityData {
    #[serde(default)]
    entities: Vec<EntityEntry>,
}

#[derive(Debug, Deserialize)]
struct EntityEntry {
    entity_id: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    disabled_by: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DeviceData {
    #[serde(default)]
    devices: Vec<IdEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct AreaData {
    #[serde(default)]
    areas: Vec<IdEntry>,
}

#[derive(Debug, Deserialize)]
struct IdEntry {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigEntriesData {
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    domain: String,
}

fn storage_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(".storage")
}

/// Load the registry snapshot for a configuration directory
///
/// # Errors
///
/// `RegistryNotFound` if the entity or device registry is missing,
/// `InvalidRegistry` if any registry file is not valid JSON of the expected
/// shape, `Io` if a file exists but cannot be read.
pub fn load_registry(config_dir: &Path) -> Result<RegistrySnapshot> {
    let start = Instant::now();
    log_op_start!(OP_LOAD_REGISTRY, path = %config_dir.display());

    let result = read_snapshot(&storage_dir(config_dir));
    match &result {
        Ok(snapshot) => {
            log_op_end!(
                OP_LOAD_REGISTRY,
                duration_ms = start.elapsed().as_millis() as u64,
                entities = snapshot.entities.len() + snapshot.disabled_entities.len(),
                devices = snapshot.devices.len(),
                areas = snapshot.areas.len()
            );
        }
        Err(err) => {
            log_op_error!(
                OP_LOAD_REGISTRY,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn read_snapshot(storage: &Path) -> Result<RegistrySnapshot> {
    let entities: EntityData = read_required(&storage.join(ENTITY_REGISTRY))?;
    let devices: DeviceData = read_required(&storage.join(DEVICE_REGISTRY))?;
    let areas: AreaData = read_optional(&storage.join(AREA_REGISTRY));
    let config_entries: ConfigEntriesData = read_optional(&storage.join(CONFIG_ENTRIES));

    let mut snapshot = RegistrySnapshot::new();
    for entity in entities.entities {
        if let Some(domain) = entity.entity_id.split_once('.').map(|(d, _)| d) {
            snapshot.service_domains.insert(domain.to_string());
        }
        if let Some(id) = entity.id {
            snapshot
                .entity_registry_ids
                .insert(id, entity.entity_id.clone());
        }
        snapshot = if entity.disabled_by.is_some() {
            snapshot.with_disabled_entity(entity.entity_id)
        } else {
            snapshot.with_entity(entity.entity_id)
        };
    }
    snapshot
        .devices
        .extend(devices.devices.into_iter().map(|d| d.id));
    snapshot.areas.extend(areas.areas.into_iter().map(|a| a.id));
    snapshot
        .service_domains
        .extend(config_entries.entries.into_iter().map(|e| e.domain));
    Ok(snapshot)
}

fn read_required<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(registry_not_found(path));
    }
    let content = fs::read_to_string(path).map_err(|e| io_error(OP_LOAD_REGISTRY, path, e))?;
    let file: StorageFile<T> =
        serde_json::from_str(&content).map_err(|e| invalid_registry(path, e))?;
    Ok(file.data)
}

/// Optional registries fall back to empty with a warning
fn read_optional<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        tracing::warn!(
            component = module_path!(),
            op = OP_LOAD_REGISTRY,
            path = %path.display(),
            "optional registry not found, treating as empty"
        );
        return T::default();
    }
    read_required(path).unwrap_or_else(|err| {
        tracing::warn!(
            component = module_path!(),
            op = OP_LOAD_REGISTRY,
            path = %path.display(),
            "{}",
            err
        );
        T::default()
    })
}

/// Entity counts for one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub count: usize,
    pub enabled: usize,
    pub disabled: usize,
    /// Up to three entity ids of the domain, in id order
    pub examples: Vec<String>,
}

/// Per-domain entity counts of a snapshot, keyed by domain
pub fn entity_summary(snapshot: &RegistrySnapshot) -> BTreeMap<String, DomainSummary> {
    let mut all: Vec<(&String, bool)> = snapshot
        .entities
        .iter()
        .map(|e| (e, false))
        .chain(snapshot.disabled_entities.iter().map(|e| (e, true)))
        .collect();
    all.sort();

    let mut summary: BTreeMap<String, DomainSummary> = BTreeMap::new();
    for (entity_id, disabled) in all {
        let domain = entity_id.split('.').next().unwrap_or_default();
        let entry = summary.entry(domain.to_string()).or_default();
        entry.count += 1;
        if disabled {
            entry.disabled += 1;
        } else {
            entry.enabled += 1;
        }
        if entry.examples.len() < EXAMPLES_PER_DOMAIN {
            entry.examples.push(entity_id.clone());
        }
    }
    summary
}
