use haref_core::model::{
    BlueprintDefinition, ConfigNode, ContextKind, InputSpec, RegistrySnapshot,
};
use haref_core::{BlueprintCache, HarefError, ValidationOptions, ValidationReport, Validator};
use serde_json::Value;

/// Build a config tree from JSON
#[allow(dead_code)]
pub fn node(value: Value) -> ConfigNode {
    ConfigNode::from(value)
}

/// A small home: kitchen and hallway lights, a door sensor, one disabled
/// entity, one device and two areas
#[allow(dead_code)]
pub fn home_registry() -> RegistrySnapshot {
    RegistrySnapshot::new()
        .with_entity("light.kitchen")
        .with_entity("light.hallway")
        .with_entity("binary_sensor.front_door")
        .with_entity("sensor.outdoor_temp")
        .with_entity("script.bedtime")
        .with_disabled_entity("light.attic")
        .with_device("8f3a0c2e5b7d4f1a9c6e2b8d0f4a7c31")
        .with_area("kitchen")
        .with_area("hallway")
        .with_service_domain("hue")
        .with_registry_id("0123456789abcdef0123456789abcdef", "light.kitchen")
}

/// Blueprint turning on `target_light` when `motion_sensor` sees motion
#[allow(dead_code)]
pub fn motion_light_blueprint() -> BlueprintDefinition {
    let body = node(serde_json::json!({
        "trigger": [{"platform": "state", "entity_id": "__motion__", "to": "on"}],
        "action": [{
            "service": "light.turn_on",
            "target": {"entity_id": "__light__"},
            "data": {"transition": "__transition__"}
        }]
    }));
    BlueprintDefinition::new("motion_light.yaml", place_inputs(body))
        .with_input("motion_sensor", InputSpec::required())
        .with_input("target_light", InputSpec::required())
        .with_input(
            "transition",
            InputSpec::with_default(ConfigNode::from(serde_json::json!(1))),
        )
}

/// Blueprint switching `target` on at sunset and off again; `target` is
/// used twice in the body and `notify_device` is never used
#[allow(dead_code)]
pub fn porch_blueprint() -> BlueprintDefinition {
    let body = node(serde_json::json!({
        "trigger": [{"platform": "sun", "event": "sunset"}],
        "action": [
            {"service": "light.turn_on", "target": {"entity_id": "__target__"}},
            {"delay": 600},
            {"service": "light.turn_off", "target": {"entity_id": "__target__"}}
        ]
    }));
    BlueprintDefinition::new("porch.yaml", place_inputs(body))
        .with_input("target", InputSpec::required())
        .with_input("notify_device", InputSpec::required())
}

/// Replace `__name__` marker strings with `!input` placeholders
fn place_inputs(body: ConfigNode) -> ConfigNode {
    match body {
        ConfigNode::Mapping(entries) => ConfigNode::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k, place_inputs(v)))
                .collect(),
        ),
        ConfigNode::Sequence(items) => {
            ConfigNode::Sequence(items.into_iter().map(place_inputs).collect())
        }
        ConfigNode::Scalar(s) => {
            let input = match s.as_str() {
                Some("__motion__") => Some("motion_sensor"),
                Some("__light__") => Some("target_light"),
                Some("__transition__") => Some("transition"),
                Some("__target__") => Some("target"),
                _ => None,
            };
            match input {
                Some(name) => ConfigNode::input(name),
                None => ConfigNode::Scalar(s),
            }
        }
        other => other,
    }
}

/// Blueprint source knowing `motion_light.yaml` and `porch.yaml`
#[allow(dead_code)]
pub fn blueprints(name: &str) -> haref_core::Result<BlueprintDefinition> {
    match name {
        "motion_light.yaml" => Ok(motion_light_blueprint()),
        "porch.yaml" => Ok(porch_blueprint()),
        _ => Err(HarefError::BlueprintNotFound {
            name: name.to_string(),
        }),
    }
}

/// Run one validation with the test blueprint source
#[allow(dead_code)]
pub fn run(
    root: &ConfigNode,
    registry: &RegistrySnapshot,
    context: ContextKind,
    options: &ValidationOptions,
) -> ValidationReport {
    let source = blueprints;
    let mut cache = BlueprintCache::new(&source);
    Validator::new(registry, options).validate(root, context, &mut cache)
}
