use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use haref_core::model::{ConfigNode, Scalar};
use haref_core::schema::OP_LOAD_YAML;
use haref_core::{log_op_end, log_op_error, log_op_start};
use serde_yaml::Value;

use crate::errors::{include_cycle, include_not_found, io_error, yaml_parse, Result};
use crate::walk::yaml_files;

/// Files never picked up by the `!include_dir_*` tags
const DIR_INCLUDE_SKIP: &[&str] = &["secrets.yaml"];

/// A loaded YAML file together with the files its include tags pulled in
#[derive(Debug, Clone, PartialEq)]
pub struct YamlTree {
    pub root: ConfigNode,
    /// Canonical paths of every file reached through `!include*`, at any depth
    pub included: BTreeSet<PathBuf>,
}

/// Load one YAML file, resolving include tags relative to it
///
/// # Errors
///
/// `Io` if the file cannot be read, `YamlParse` for malformed YAML,
/// `IncludeNotFound` / `IncludeCycle` for broken include chains.
pub fn load_yaml_file(path: &Path) -> Result<ConfigNode> {
    load_yaml_tree(path).map(|tree| tree.root)
}

/// Like [`load_yaml_file`], also reporting which files were included
///
/// # Errors
///
/// As for [`load_yaml_file`].
pub fn load_yaml_tree(path: &Path) -> Result<YamlTree> {
    let start = Instant::now();
    log_op_start!(OP_LOAD_YAML, path = %path.display());

    let mut loader = Loader::default();
    match loader.load_file(path, None) {
        Ok(root) => {
            log_op_end!(
                OP_LOAD_YAML,
                duration_ms = start.elapsed().as_millis() as u64,
                path = %path.display(),
                included = loader.included.len()
            );
            Ok(YamlTree {
                root,
                included: loader.included,
            })
        }
        Err(err) => {
            log_op_error!(
                OP_LOAD_YAML,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                path = %path.display()
            );
            Err(err)
        }
    }
}

/// Parse YAML text as if it had been read from `source`
///
/// Include tags resolve relative to the directory of `source`, which need
/// not exist itself.
///
/// # Errors
///
/// As for [`load_yaml_file`], minus the read of `source`.
pub fn parse_yaml_str(content: &str, source: &Path) -> Result<ConfigNode> {
    let value = parse_value(content, source)?;
    Loader::default().convert(value, source)
}

fn parse_value(content: &str, source: &Path) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(content).map_err(|e| yaml_parse(source, e))
}

/// Tracks the chain of files being loaded for cycle detection
#[derive(Debug, Default)]
struct Loader {
    stack: Vec<PathBuf>,
    included: BTreeSet<PathBuf>,
}

impl Loader {
    fn load_file(&mut self, path: &Path, from: Option<&Path>) -> Result<ConfigNode> {
        let canonical = match (fs::canonicalize(path), from) {
            (Ok(canonical), _) => canonical,
            (Err(_), Some(from)) => return Err(include_not_found(path, from)),
            (Err(e), None) => return Err(io_error(OP_LOAD_YAML, path, e)),
        };
        if self.stack.contains(&canonical) {
            return Err(include_cycle(path));
        }

        let content = fs::read_to_string(path).map_err(|e| io_error(OP_LOAD_YAML, path, e))?;
        let value = parse_value(&content, path)?;

        if from.is_some() {
            self.included.insert(canonical.clone());
        }
        self.stack.push(canonical);
        let node = self.convert(value, path);
        self.stack.pop();
        node
    }

    fn convert(&mut self, value: Value, file: &Path) -> Result<ConfigNode> {
        Ok(match value {
            Value::Null => ConfigNode::null(),
            Value::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigNode::Scalar(Scalar::Int(i)),
                None => ConfigNode::Scalar(Scalar::Float(n.as_f64().unwrap_or_default())),
            },
            Value::String(s) => ConfigNode::string(s),
            Value::Sequence(items) => ConfigNode::Sequence(
                items
                    .into_iter()
                    .map(|item| self.convert(item, file))
                    .collect::<Result<_>>()?,
            ),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    entries.push((key_string(&key), self.convert(value, file)?));
                }
                ConfigNode::Mapping(entries)
            }
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                self.convert_tagged(tag.trim_start_matches('!'), tagged.value, file)?
            }
        })
    }

    fn convert_tagged(&mut self, tag: &str, value: Value, file: &Path) -> Result<ConfigNode> {
        match tag {
            "input" => Ok(ConfigNode::input(tag_argument(tag, value, file)?)),
            "secret" | "env_var" => Ok(ConfigNode::secret(tag_argument(tag, value, file)?)),
            "include" => {
                let target = relative_to(file, &tag_argument(tag, value, file)?);
                self.load_file(&target, Some(file))
            }
            "include_dir_list" => {
                let files = self.dir_files(file, tag, value)?;
                let mut items = Vec::with_capacity(files.len());
                for path in files {
                    items.push(self.load_file(&path, Some(file))?);
                }
                Ok(ConfigNode::Sequence(items))
            }
            "include_dir_named" => {
                let files = self.dir_files(file, tag, value)?;
                let mut entries = Vec::with_capacity(files.len());
                for path in files {
                    let name = file_stem(&path);
                    entries.push((name, self.load_file(&path, Some(file))?));
                }
                Ok(ConfigNode::Mapping(entries))
            }
            "include_dir_merge_list" => {
                let mut items = Vec::new();
                for path in self.dir_files(file, tag, value)? {
                    if let ConfigNode::Sequence(loaded) = self.load_file(&path, Some(file))? {
                        items.extend(loaded);
                    }
                }
                Ok(ConfigNode::Sequence(items))
            }
            "include_dir_merge_named" => {
                let mut entries: Vec<(String, ConfigNode)> = Vec::new();
                for path in self.dir_files(file, tag, value)? {
                    if let ConfigNode::Mapping(loaded) = self.load_file(&path, Some(file))? {
                        for (key, node) in loaded {
                            match entries.iter_mut().find(|(k, _)| *k == key) {
                                Some(existing) => existing.1 = node,
                                None => entries.push((key, node)),
                            }
                        }
                    }
                }
                Ok(ConfigNode::Mapping(entries))
            }
            _ => self.convert(value, file),
        }
    }

    /// Sorted `*.yaml` files below the directory named by an include_dir tag
    fn dir_files(&self, file: &Path, tag: &str, value: Value) -> Result<Vec<PathBuf>> {
        let dir = relative_to(file, &tag_argument(tag, value, file)?);
        if !dir.is_dir() {
            return Err(include_not_found(&dir, file));
        }
        let mut files = yaml_files(&dir, "read_include_dir")?;
        files.retain(|path| !DIR_INCLUDE_SKIP.contains(&file_name(path).as_str()));
        Ok(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn tag_argument(tag: &str, value: Value, file: &Path) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(yaml_parse(
            file,
            format!("!{} expects a scalar argument, got {:?}", tag, other),
        )),
    }
}

fn relative_to(file: &Path, target: &str) -> PathBuf {
    file.parent().unwrap_or_else(|| Path::new(".")).join(target)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ConfigNode {
        parse_yaml_str(content, Path::new("/nonexistent/configuration.yaml")).unwrap()
    }

    #[test]
    fn test_placeholders_from_tags() {
        let node = parse(
            "light: !input target_light\npassword: !secret router_pw\nhost: !env_var HOST\n",
        );
        assert_eq!(node.get("light"), Some(&ConfigNode::input("target_light")));
        assert_eq!(node.get("password"), Some(&ConfigNode::secret("router_pw")));
        assert_eq!(node.get("host"), Some(&ConfigNode::secret("HOST")));
    }

    #[test]
    fn test_unknown_tag_resolves_to_inner_value() {
        let node = parse("when: !custom light.kitchen\n");
        assert_eq!(node.get("when"), Some(&ConfigNode::string("light.kitchen")));
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let node = parse("1: one\ntrue: yes\n");
        assert!(node.contains_key("1"));
        assert!(node.contains_key("true"));
    }

    #[test]
    fn test_include_of_missing_file_names_both_paths() {
        let err = parse_yaml_str(
            "automation: !include automations.yaml\n",
            Path::new("/nonexistent/configuration.yaml"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            haref_core::HarefError::IncludeNotFound { ref path, ref from }
                if path.ends_with("automations.yaml") && from.ends_with("configuration.yaml")
        ));
    }

    #[test]
    fn test_input_tag_requires_scalar() {
        let err = parse_yaml_str("x: !input [a, b]\n", Path::new("bp.yaml")).unwrap_err();
        assert!(err.to_string().contains("!input"));
    }
}
