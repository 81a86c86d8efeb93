//! Blueprint directory source
//!
//! Serves blueprint definitions from `<config>/blueprints`. Files are
//! indexed by their path relative to that directory, with `/` separators,
//! and parsed only when a run asks for them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use haref_core::model::{BlueprintDefinition, ConfigNode, InputSpec};
use haref_core::BlueprintSource;

use crate::errors::{blueprint_not_found, invalid_blueprint, Result};
use crate::walk::yaml_files;
use crate::yaml::load_yaml_file;

pub const BLUEPRINTS_DIR: &str = "blueprints";

/// Blueprint files found under one directory
#[derive(Debug, Clone, Default)]
pub struct BlueprintDirectory {
    index: BTreeMap<String, PathBuf>,
}

impl BlueprintDirectory {
    /// Index `<config_dir>/blueprints`; a missing directory gives an empty index
    ///
    /// # Errors
    ///
    /// `Io` if the directory exists but cannot be listed.
    pub fn open(config_dir: &Path) -> Result<Self> {
        let root = config_dir.join(BLUEPRINTS_DIR);
        if !root.is_dir() {
            tracing::debug!(
                component = module_path!(),
                path = %root.display(),
                "no blueprints directory"
            );
            return Ok(Self::default());
        }
        Ok(Self {
            index: index_dir(&root)?,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Indexed names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// File for a `use_blueprint.path`: exact match first, then the first
    /// indexed name ending in `/<name>`
    pub fn locate(&self, name: &str) -> Option<&Path> {
        let name = name.trim_start_matches('/');
        if let Some(path) = self.index.get(name) {
            return Some(path);
        }
        let suffix = format!("/{}", name);
        self.index
            .iter()
            .find(|(indexed, _)| indexed.ends_with(&suffix))
            .map(|(_, path)| path.as_path())
    }
}

impl BlueprintSource for BlueprintDirectory {
    fn load_blueprint(&self, name: &str) -> Result<BlueprintDefinition> {
        let path = self.locate(name).ok_or_else(|| blueprint_not_found(name))?;
        let document = load_yaml_file(path).map_err(|e| invalid_blueprint(name, e))?;
        parse_definition(name, document)
    }
}

fn index_dir(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut index = BTreeMap::new();
    for path in yaml_files(root, "index_blueprints")? {
        if let Ok(relative) = path.strip_prefix(root) {
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            index.insert(name, path);
        }
    }
    Ok(index)
}

/// Split a blueprint document into its input schema and its body
///
/// The body is the document without its `blueprint:` header.
///
/// # Errors
///
/// `InvalidBlueprint` if the document is not a mapping with a `blueprint`
/// key.
pub fn parse_definition(name: &str, document: ConfigNode) -> Result<BlueprintDefinition> {
    let ConfigNode::Mapping(entries) = document else {
        return Err(invalid_blueprint(name, "document is not a mapping"));
    };
    let (header, body): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|(key, _)| key == "blueprint");
    let Some((_, header)) = header.into_iter().next() else {
        return Err(invalid_blueprint(name, "missing 'blueprint' section"));
    };

    let mut definition = BlueprintDefinition::new(name, ConfigNode::Mapping(body));
    if let Some(inputs) = header.get("input").and_then(ConfigNode::entries) {
        collect_inputs(inputs, &mut definition);
    }
    Ok(definition)
}

/// Input sections hold a nested `input:` mapping and are flattened
fn collect_inputs(inputs: &[(String, ConfigNode)], definition: &mut BlueprintDefinition) {
    for (input, spec) in inputs {
        if let Some(section) = spec.get("input").and_then(ConfigNode::entries) {
            collect_inputs(section, definition);
            continue;
        }
        let spec = match spec.get("default") {
            Some(default) => InputSpec::with_default(default.clone()),
            None => InputSpec::required(),
        };
        definition.input_schema.insert(input.clone(), spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(names: &[&str]) -> BlueprintDirectory {
        BlueprintDirectory {
            index: names
                .iter()
                .map(|n| (n.to_string(), PathBuf::from(n)))
                .collect(),
        }
    }

    #[test]
    fn test_locate_exact_before_suffix() {
        let dir = directory(&[
            "automation/homeassistant/motion_light.yaml",
            "motion_light.yaml",
        ]);
        assert_eq!(
            dir.locate("motion_light.yaml"),
            Some(Path::new("motion_light.yaml"))
        );
        assert_eq!(
            dir.locate("homeassistant/motion_light.yaml"),
            Some(Path::new("automation/homeassistant/motion_light.yaml"))
        );
    }

    #[test]
    fn test_locate_requires_segment_boundary() {
        let dir = directory(&["automation/motion_light.yaml"]);
        assert!(dir.locate("light.yaml").is_none());
    }

    #[test]
    fn test_parse_definition_flattens_sections() {
        let document = ConfigNode::from(serde_json::json!({
            "blueprint": {
                "name": "Motion light",
                "input": {
                    "motion_entity": {"selector": {"entity": {}}},
                    "timing": {
                        "name": "Timing",
                        "input": {
                            "no_motion_wait": {"default": 120}
                        }
                    }
                }
            },
            "trigger": [{"platform": "state"}],
            "action": []
        }));

        let definition = parse_definition("motion_light.yaml", document).unwrap();
        assert!(definition.input_schema["motion_entity"].required);
        assert!(!definition.input_schema["no_motion_wait"].required);
        assert!(!definition.declares("timing"));
        assert!(!definition.body.contains_key("blueprint"));
        assert!(definition.body.contains_key("trigger"));
    }

    #[test]
    fn test_parse_definition_without_header_is_invalid() {
        let err = parse_definition(
            "plain.yaml",
            ConfigNode::from(serde_json::json!({"trigger": []})),
        )
        .unwrap_err();
        assert!(matches!(err, haref_core::HarefError::InvalidBlueprint { .. }));
    }
}
