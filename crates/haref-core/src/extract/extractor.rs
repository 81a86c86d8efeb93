use crate::model::{
    ConfigNode, ContextKind, NodePath, Origin, PathSegment, RawReference, ReferenceKind, Scope,
};

use super::shape::{is_entity_id, is_service_shaped, is_template};
use super::template;

/// Values that name no single target
const SPECIAL_KEYWORDS: &[&str] = &["all", "none"];

/// `script.*` services that act on the integration rather than a script
const SCRIPT_SERVICES: &[&str] = &["reload", "turn_on", "turn_off", "toggle"];
/// `scene.*` services that act on the integration rather than a scene
const SCENE_SERVICES: &[&str] = &["reload", "apply", "create", "turn_on", "delete"];

/// References found at one node, and whether its children carry no more
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub references: Vec<RawReference>,
    /// The node is the value of a reference key; do not descend
    pub terminal: bool,
}

/// How the key governing a node is related to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Via {
    /// `key: <node>`
    Direct,
    /// `key: [..., <node>, ...]`
    Element,
}

/// Key whose value is `path`'s node, directly or as a list element
fn governing_key(path: &NodePath) -> Option<(&str, Via)> {
    match path.segments() {
        [.., PathSegment::Key(key)] => Some((key.as_str(), Via::Direct)),
        [.., PathSegment::Key(key), PathSegment::Index(_)] => Some((key.as_str(), Via::Element)),
        _ => None,
    }
}

/// Reference kind named by the values of `key`
fn keyed_kind(key: &str, via: Via, node: &ConfigNode, scope: &Scope) -> Option<ReferenceKind> {
    match key {
        "entity_id" | "entity_ids" | "entities" => Some(ReferenceKind::Entity),
        "entity" if scope.context == ContextKind::Dashboard => Some(ReferenceKind::Entity),
        "device_id" | "device_ids" => Some(ReferenceKind::Device),
        "area_id" | "area_ids" => Some(ReferenceKind::Area),
        "service" | "perform_action" if via == Via::Direct => Some(ReferenceKind::Service),
        "action" if via == Via::Direct && node.as_str().is_some_and(|s| s.contains('.')) => {
            Some(ReferenceKind::Service)
        }
        _ => None,
    }
}

/// Extract the references made by `node`
///
/// The node's own path decides what it is: a value (or list element) of
/// `entity_id`, `device_id`, `area_id`, `entities`, `service`, ... is a
/// reference; a templated string anywhere else is scanned; a blueprint
/// input left without a value becomes a blueprint input reference.
///
/// # Arguments
///
/// * `node` - Node being visited
/// * `path` - Its location; the last key names what the value means
/// * `scope` - Scope in effect at the node
pub fn extract(node: &ConfigNode, path: &NodePath, scope: &Scope) -> Extraction {
    let mut out = Extraction::default();

    if let Some((key, via)) = governing_key(path) {
        if let Some(kind) = keyed_kind(key, via, node, scope) {
            keyed(node, kind, key, path, scope, &mut out);
            return out;
        }
    }

    dynamic(node, path, scope, Origin::Template, &mut out.references);
    out
}

fn keyed(
    node: &ConfigNode,
    kind: ReferenceKind,
    key: &str,
    path: &NodePath,
    scope: &Scope,
    out: &mut Extraction,
) {
    match node {
        ConfigNode::Scalar(scalar) => {
            out.terminal = true;
            let Some(text) = scalar.as_str() else {
                return;
            };
            if is_template(text) {
                dynamic(node, path, scope, Origin::Template, &mut out.references);
            } else if kind == ReferenceKind::Service {
                service(text, key, path, scope, &mut out.references);
            } else {
                literal(text, kind, key, path, scope, &mut out.references);
            }
        }
        ConfigNode::Unresolved { .. } | ConfigNode::Input(_) | ConfigNode::Secret(_) => {
            out.terminal = true;
            dynamic(node, path, scope, Origin::Template, &mut out.references);
        }
        ConfigNode::Sequence(_) => {}
        ConfigNode::Mapping(entries) => {
            // Scene: `entities: {light.tv: off, ...}`
            if key == "entities" && scope.context == ContextKind::Scene {
                for (entity_id, _) in entries {
                    literal(
                        entity_id,
                        ReferenceKind::Entity,
                        key,
                        &path.key(entity_id.as_str()),
                        scope,
                        &mut out.references,
                    );
                }
            }
            // dashboard rows (`entities: [{entity: ...}]`) carry their own keys
            out.terminal = key != "entities";
        }
    }
}

/// Templated string or placeholder; plain values yield nothing
fn dynamic(
    node: &ConfigNode,
    path: &NodePath,
    scope: &Scope,
    origin: Origin,
    refs: &mut Vec<RawReference>,
) {
    match node {
        ConfigNode::Scalar(scalar) => {
            let Some(text) = scalar.as_str().filter(|t| is_template(t)) else {
                return;
            };
            for found in template::scan(text) {
                let reference = RawReference::new(
                    found.kind,
                    &found.value,
                    path.clone(),
                    scope.clone(),
                    origin.clone(),
                );
                if let Some(reference) = reference {
                    refs.push(match found.literal {
                        Some(lit) => reference.with_literal(lit),
                        None => reference,
                    });
                }
            }
        }
        // Required inputs are reported once at their use site
        ConfigNode::Unresolved {
            input,
            required: false,
        } => {
            refs.extend(RawReference::new(
                ReferenceKind::BlueprintInput,
                input,
                path.clone(),
                scope.clone(),
                Origin::Placeholder { required: false },
            ));
        }
        _ => {}
    }
}

/// Literal entity/device/area value, possibly comma-separated
fn literal(
    text: &str,
    kind: ReferenceKind,
    key: &str,
    path: &NodePath,
    scope: &Scope,
    refs: &mut Vec<RawReference>,
) {
    for part in text.split(',').map(str::trim) {
        if part.is_empty() || part.starts_with('!') || SPECIAL_KEYWORDS.contains(&part) {
            continue;
        }
        refs.extend(RawReference::new(
            kind,
            part,
            path.clone(),
            scope.clone(),
            Origin::Key(key.to_string()),
        ));
    }
}

/// `domain.service` value: a service reference by domain, plus the script
/// or scene it targets
fn service(text: &str, key: &str, path: &NodePath, scope: &Scope, refs: &mut Vec<RawReference>) {
    let text = text.trim();
    let value = if is_service_shaped(text) {
        text.split_once('.').map_or(text, |(domain, _)| domain)
    } else {
        text
    };
    let Some(reference) = RawReference::new(
        ReferenceKind::Service,
        value,
        path.clone(),
        scope.clone(),
        Origin::Key(key.to_string()),
    ) else {
        return;
    };
    refs.push(reference.with_literal(text));

    if !is_entity_id(text) {
        return;
    }
    let target = match text.split_once('.') {
        Some(("script", name)) if !SCRIPT_SERVICES.contains(&name) => Some(text),
        Some(("scene", name)) if !SCENE_SERVICES.contains(&name) => Some(text),
        _ => None,
    };
    if let Some(entity_id) = target {
        refs.extend(RawReference::new(
            ReferenceKind::Entity,
            entity_id,
            path.clone(),
            scope.clone(),
            Origin::ServiceTarget,
        ));
    }
}
