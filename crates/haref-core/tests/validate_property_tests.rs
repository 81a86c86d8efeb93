#![allow(clippy::unwrap_used, clippy::expect_used)]

use haref_core::model::{ConfigNode, RegistrySnapshot, Scalar, Severity};
use haref_core::validate;
use proptest::prelude::*;

/// Keys that never carry a reference
fn arb_plain_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alias".to_string()),
        Just("mode".to_string()),
        Just("delay".to_string()),
        Just("brightness".to_string()),
        "[a-z]{3,8}_note",
    ]
}

fn arb_plain_scalar() -> impl Strategy<Value = ConfigNode> {
    prop_oneof![
        any::<i64>().prop_map(|i| ConfigNode::Scalar(Scalar::Int(i))),
        any::<bool>().prop_map(|b| ConfigNode::Scalar(Scalar::Bool(b))),
        "[A-Za-z0-9 .:_-]{0,20}".prop_map(ConfigNode::string),
        Just(ConfigNode::null()),
    ]
}

/// Trees whose keys never name a reference and whose strings hold no
/// template region
fn arb_reference_free_tree() -> impl Strategy<Value = ConfigNode> {
    arb_plain_scalar().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigNode::Sequence),
            prop::collection::vec((arb_plain_key(), inner), 0..4).prop_map(ConfigNode::Mapping),
        ]
    })
}

fn arb_entity_id() -> impl Strategy<Value = String> {
    ("[a-z]{1,6}", "[a-z0-9_]{1,10}").prop_map(|(d, o)| format!("{}.{}", d, o))
}

fn automation_targeting(entity_ids: &[String]) -> ConfigNode {
    ConfigNode::mapping([
        ("trigger", ConfigNode::sequence([])),
        (
            "action",
            ConfigNode::sequence(entity_ids.iter().map(|e| {
                ConfigNode::mapping([
                    ("service", ConfigNode::string("homeassistant.turn_on")),
                    ("entity_id", ConfigNode::string(e.as_str())),
                ])
            })),
        ),
    ])
}

proptest! {
    #[test]
    fn reference_free_tree_has_no_findings(tree in arb_reference_free_tree()) {
        let registry = RegistrySnapshot::new().with_entity("light.kitchen");
        prop_assert!(validate(&tree, &registry).is_empty());
    }

    #[test]
    fn registered_entities_are_silent(ids in prop::collection::btree_set(arb_entity_id(), 1..6)) {
        let ids: Vec<String> = ids.into_iter().collect();
        let registry = ids
            .iter()
            .fold(RegistrySnapshot::new(), |r, id| r.with_entity(id.as_str()));
        prop_assert!(validate(&automation_targeting(&ids), &registry).is_empty());
    }

    #[test]
    fn each_unknown_entity_is_one_error(ids in prop::collection::vec(arb_entity_id(), 1..6)) {
        let findings = validate(&automation_targeting(&ids), &RegistrySnapshot::new());
        prop_assert_eq!(findings.len(), ids.len());
        for (finding, id) in findings.iter().zip(&ids) {
            prop_assert_eq!(finding.severity, Severity::Error);
            prop_assert_eq!(&finding.value, id);
        }
    }

    #[test]
    fn validation_is_idempotent(ids in prop::collection::vec(arb_entity_id(), 0..6)) {
        let tree = automation_targeting(&ids);
        let registry = RegistrySnapshot::new().with_entity("light.kitchen");
        let first = serde_json::to_string(&validate(&tree, &registry)).unwrap();
        let second = serde_json::to_string(&validate(&tree, &registry)).unwrap();
        prop_assert_eq!(first, second);
    }
}
