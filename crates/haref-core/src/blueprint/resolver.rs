use std::collections::BTreeMap;
use std::time::Instant;

use crate::model::{ConfigNode, InputSpec};
use crate::schema::OP_RESOLVE_BLUEPRINT;
use crate::{log_op_degraded, log_op_end, log_op_start};

use super::cache::BlueprintCache;

/// A blueprint use site with its placeholders substituted
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlueprint {
    pub name: String,
    pub body: ConfigNode,
    /// Inputs the use site supplies that the blueprint does not declare
    pub unexpected_inputs: Vec<String>,
    /// Required inputs without a default that the use site leaves out
    pub missing_inputs: Vec<String>,
}

/// Outcome of resolving a node
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The node has no `use_blueprint` key
    NotBlueprint,
    /// `use_blueprint` without a usable `path`
    MissingPath,
    Resolved(ResolvedBlueprint),
    /// The blueprint could not be loaded
    Unavailable { name: String, reason: String },
}

/// Resolve a `use_blueprint: {path, input}` node against the run's cache
///
/// Load failures are returned as [`Resolution::Unavailable`]; they never
/// abort the run.
pub fn resolve(node: &ConfigNode, cache: &mut BlueprintCache<'_>) -> Resolution {
    let Some(use_site) = node.get("use_blueprint") else {
        return Resolution::NotBlueprint;
    };
    let Some(name) = use_site
        .get("path")
        .and_then(ConfigNode::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    else {
        return Resolution::MissingPath;
    };

    let start = Instant::now();
    log_op_start!(OP_RESOLVE_BLUEPRINT, blueprint = name);

    let definition = match cache.get(name) {
        Ok(definition) => definition,
        Err(err) => {
            log_op_degraded!(
                OP_RESOLVE_BLUEPRINT,
                &err,
                duration_ms = start.elapsed().as_millis() as u64,
                blueprint = name
            );
            return Resolution::Unavailable {
                name: name.to_string(),
                reason: err.to_string(),
            };
        }
    };

    let supplied = use_site
        .get("input")
        .and_then(ConfigNode::entries)
        .unwrap_or_default();
    let body = substitute(&definition.body, &definition.input_schema, supplied);
    let unexpected_inputs: Vec<String> = supplied
        .iter()
        .filter(|(key, _)| !definition.declares(key))
        .map(|(key, _)| key.clone())
        .collect();
    let missing_inputs: Vec<String> = definition
        .input_schema
        .iter()
        .filter(|(_, spec)| spec.required && spec.default.is_none())
        .filter(|(input, _)| !supplied.iter().any(|(key, _)| key == *input))
        .map(|(input, _)| input.clone())
        .collect();

    log_op_end!(
        OP_RESOLVE_BLUEPRINT,
        duration_ms = start.elapsed().as_millis() as u64,
        blueprint = name,
        unexpected_inputs = unexpected_inputs.len(),
        missing_inputs = missing_inputs.len()
    );

    Resolution::Resolved(ResolvedBlueprint {
        name: name.to_string(),
        body,
        unexpected_inputs,
        missing_inputs,
    })
}

/// Copy of `body` with every `!input` placeholder replaced
///
/// A placeholder takes the supplied value, else the schema default, else
/// becomes [`ConfigNode::Unresolved`]. Inputs missing from the schema are
/// treated as optional. A required input is reported once per use site
/// through [`ResolvedBlueprint::missing_inputs`], not per placeholder.
pub fn substitute(
    body: &ConfigNode,
    schema: &BTreeMap<String, InputSpec>,
    supplied: &[(String, ConfigNode)],
) -> ConfigNode {
    match body {
        ConfigNode::Input(input) => {
            if let Some((_, value)) = supplied.iter().find(|(key, _)| key == input) {
                return value.clone();
            }
            let spec = schema.get(input);
            match spec.and_then(|s| s.default.as_ref()) {
                Some(default) => default.clone(),
                None => ConfigNode::Unresolved {
                    input: input.clone(),
                    required: spec.is_some_and(|s| s.required),
                },
            }
        }
        ConfigNode::Mapping(entries) => ConfigNode::Mapping(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), substitute(value, schema, supplied)))
                .collect(),
        ),
        ConfigNode::Sequence(items) => ConfigNode::Sequence(
            items
                .iter()
                .map(|item| substitute(item, schema, supplied))
                .collect(),
        ),
        other => other.clone(),
    }
}
