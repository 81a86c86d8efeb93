//! Config-directory document discovery
//!
//! A configuration directory contributes its top-level YAML files plus the
//! dashboards Home Assistant stores as JSON under `.storage/lovelace*`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use haref_core::model::{ConfigNode, ContextKind};
use haref_core::schema::OP_DISCOVER_DOCUMENTS;
use haref_core::{log_op_end, log_op_error, log_op_start};

use crate::config::ValidatorConfig;
use crate::errors::{config_dir_not_found, invalid_registry, io_error, Result};
use crate::yaml::load_yaml_tree;

/// How a discovered document is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    /// `.storage/lovelace*` JSON envelope; the tree is `data.config`
    LovelaceStorage,
}

/// A document found in a configuration directory, not yet loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Path relative to the configuration directory
    pub name: String,
    pub path: PathBuf,
    pub format: DocumentFormat,
    /// Context the document's root is validated under
    pub context: ContextKind,
}

/// A loaded document ready for validation
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub root: ConfigNode,
    pub context: ContextKind,
    /// Canonical paths of the files this document includes
    pub included: BTreeSet<PathBuf>,
}

/// List the documents of a configuration directory in validation order
///
/// # Errors
///
/// `ConfigDirNotFound` if `config_dir` is not a directory, `Io` if it
/// cannot be listed.
pub fn discover_documents(
    config_dir: &Path,
    config: &ValidatorConfig,
) -> Result<Vec<DocumentSource>> {
    let start = Instant::now();
    log_op_start!(OP_DISCOVER_DOCUMENTS, path = %config_dir.display());

    let result = list_documents(config_dir, config);
    match &result {
        Ok(documents) => {
            log_op_end!(
                OP_DISCOVER_DOCUMENTS,
                duration_ms = start.elapsed().as_millis() as u64,
                documents = documents.len()
            );
        }
        Err(err) => {
            log_op_error!(
                OP_DISCOVER_DOCUMENTS,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn list_documents(config_dir: &Path, config: &ValidatorConfig) -> Result<Vec<DocumentSource>> {
    if !config_dir.is_dir() {
        return Err(config_dir_not_found(config_dir));
    }

    let mut documents = Vec::new();
    for name in sorted_file_names(config_dir)? {
        let is_yaml = name.ends_with(".yaml") || name.ends_with(".yml");
        if !is_yaml || config.is_skipped(&name) {
            continue;
        }
        let context = if config.is_dashboard(&name) {
            ContextKind::Dashboard
        } else {
            ContextKind::Unknown
        };
        documents.push(DocumentSource {
            path: config_dir.join(&name),
            name,
            format: DocumentFormat::Yaml,
            context,
        });
    }

    let storage = config_dir.join(".storage");
    if storage.is_dir() {
        for name in sorted_file_names(&storage)? {
            if name == "lovelace" || name.starts_with("lovelace.") {
                documents.push(DocumentSource {
                    path: storage.join(&name),
                    name: format!(".storage/{}", name),
                    format: DocumentFormat::LovelaceStorage,
                    context: ContextKind::Dashboard,
                });
            }
        }
    }
    Ok(documents)
}

fn sorted_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| io_error(OP_DISCOVER_DOCUMENTS, dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error(OP_DISCOVER_DOCUMENTS, dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Load every source, dropping documents another document includes
///
/// A file pulled into `configuration.yaml` by `!include` is validated as
/// part of that tree, under the context its include site gives it. Listing
/// it again on its own would report each of its references twice. A source
/// is only dropped when the including document loaded successfully.
pub fn load_documents(sources: Vec<DocumentSource>) -> Vec<(DocumentSource, Result<Document>)> {
    let loaded: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let document = source.load();
            (source, document)
        })
        .collect();
    let reached: BTreeSet<PathBuf> = loaded
        .iter()
        .filter_map(|(_, document)| document.as_ref().ok())
        .flat_map(|document| document.included.iter().cloned())
        .collect();

    loaded
        .into_iter()
        .filter(|(source, _)| {
            let included = fs::canonicalize(&source.path).is_ok_and(|p| reached.contains(&p));
            if included {
                tracing::debug!(
                    component = module_path!(),
                    document = %source.name,
                    "validated through an including document"
                );
            }
            !included
        })
        .collect()
}

impl DocumentSource {
    /// Load the document tree
    ///
    /// # Errors
    ///
    /// The YAML loader's errors for YAML documents; `Io` or
    /// `InvalidRegistry` for unreadable dashboard storage.
    pub fn load(&self) -> Result<Document> {
        let (root, included) = match self.format {
            DocumentFormat::Yaml => {
                let tree = load_yaml_tree(&self.path)?;
                (tree.root, tree.included)
            }
            DocumentFormat::LovelaceStorage => {
                let content = fs::read_to_string(&self.path)
                    .map_err(|e| io_error("load_dashboard", &self.path, e))?;
                let mut value: serde_json::Value = serde_json::from_str(&content)
                    .map_err(|e| invalid_registry(&self.path, e))?;
                let config = value
                    .pointer_mut("/data/config")
                    .map(serde_json::Value::take)
                    .unwrap_or_default();
                (ConfigNode::from(config), BTreeSet::new())
            }
        };
        Ok(Document {
            name: self.name.clone(),
            root,
            context: self.context,
            included,
        })
    }
}
