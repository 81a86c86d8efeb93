// Integration tests for the Home Assistant YAML loader
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::ConfigDir;
use haref_core::{ConfigNode, HarefError};
use haref_store::{load_yaml_file, load_yaml_tree};

#[test]
fn test_include_resolves_relative_to_including_file() {
    let config = ConfigDir::new();
    config.write(
        "configuration.yaml",
        "homeassistant:\n  name: Home\nautomation: !include automations.yaml\n",
    );
    config.write(
        "automations.yaml",
        concat!(
            "- alias: Hall light\n",
            "  trigger: []\n",
            "  action:\n",
            "    - service: light.turn_on\n",
            "      target:\n",
            "        entity_id: light.hallway\n",
        ),
    );

    let root = load_yaml_file(&config.path().join("configuration.yaml")).unwrap();

    let automations = root.get("automation").unwrap();
    let ConfigNode::Sequence(items) = automations else {
        panic!("expected a sequence, got {:?}", automations);
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("alias").and_then(ConfigNode::as_str), Some("Hall light"));
}

#[test]
fn test_nested_include_uses_nested_directory() {
    let config = ConfigDir::new();
    config.write("configuration.yaml", "script: !include scripts/index.yaml\n");
    config.write("scripts/index.yaml", "good_night: !include good_night.yaml\n");
    config.write("scripts/good_night.yaml", "sequence: []\n");

    let root = load_yaml_file(&config.path().join("configuration.yaml")).unwrap();

    assert!(root
        .get("script")
        .and_then(|s| s.get("good_night"))
        .is_some_and(|s| s.contains_key("sequence")));
}

#[test]
fn test_tree_lists_every_included_file() {
    let config = ConfigDir::new();
    config.write(
        "configuration.yaml",
        "script: !include scripts/index.yaml
automation: !include_dir_merge_list automations
",
    );
    config.write("scripts/index.yaml", "good_night: !include good_night.yaml
");
    config.write("scripts/good_night.yaml", "sequence: []
");
    config.write("automations/lights.yaml", "[]
");
    config.write("automations/.hidden/old.yaml", "[]
");

    let tree = load_yaml_tree(&config.path().join("configuration.yaml")).unwrap();

    let root = std::fs::canonicalize(config.path()).unwrap();
    let expected: Vec<_> = [
        "automations/lights.yaml",
        "scripts/good_night.yaml",
        "scripts/index.yaml",
    ]
    .iter()
    .map(|relative| root.join(relative))
    .collect();
    assert_eq!(tree.included.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_include_cycle_is_an_error() {
    let config = ConfigDir::new();
    config.write("a.yaml", "next: !include b.yaml\n");
    config.write("b.yaml", "next: !include a.yaml\n");

    let err = load_yaml_file(&config.path().join("a.yaml")).unwrap_err();

    assert!(
        matches!(err, HarefError::IncludeCycle { ref path } if path.ends_with("a.yaml")),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_same_file_included_twice_is_not_a_cycle() {
    let config = ConfigDir::new();
    config.write(
        "configuration.yaml",
        "first: !include shared.yaml\nsecond: !include shared.yaml\n",
    );
    config.write("shared.yaml", "value: 1\n");

    let root = load_yaml_file(&config.path().join("configuration.yaml")).unwrap();
    assert_eq!(root.get("first"), root.get("second"));
}

#[test]
fn test_include_dir_variants() {
    let config = ConfigDir::new();
    config.write(
        "configuration.yaml",
        concat!(
            "listed: !include_dir_list parts\n",
            "named: !include_dir_named parts\n",
            "merged_list: !include_dir_merge_list lists\n",
            "merged_named: !include_dir_merge_named maps\n",
        ),
    );
    config.write("parts/b.yaml", "alias: B\n");
    config.write("parts/a.yaml", "alias: A\n");
    config.write("parts/secrets.yaml", "password: hunter2\n");
    config.write("lists/one.yaml", "- alias: one\n");
    config.write("lists/two.yaml", "- alias: two\n- alias: three\n");
    config.write("maps/one.yaml", "kitchen: {sequence: []}\n");
    config.write("maps/sub/two.yaml", "hallway: {sequence: []}\n");

    let root = load_yaml_file(&config.path().join("configuration.yaml")).unwrap();

    let ConfigNode::Sequence(listed) = root.get("listed").unwrap() else {
        panic!("include_dir_list must give a sequence");
    };
    let aliases: Vec<_> = listed
        .iter()
        .filter_map(|n| n.get("alias").and_then(ConfigNode::as_str))
        .collect();
    assert_eq!(aliases, vec!["A", "B"]);

    let named = root.get("named").unwrap();
    assert!(named.contains_key("a") && named.contains_key("b"));
    assert!(!named.contains_key("secrets"));

    let ConfigNode::Sequence(merged) = root.get("merged_list").unwrap() else {
        panic!("include_dir_merge_list must give a sequence");
    };
    assert_eq!(merged.len(), 3);

    let merged_named = root.get("merged_named").unwrap();
    assert!(merged_named.contains_key("kitchen"));
    assert!(merged_named.contains_key("hallway"));
}

#[test]
fn test_missing_include_dir() {
    let config = ConfigDir::new();
    config.write("configuration.yaml", "automation: !include_dir_list nowhere\n");

    let err = load_yaml_file(&config.path().join("configuration.yaml")).unwrap_err();
    assert!(matches!(err, HarefError::IncludeNotFound { .. }));
}

#[test]
fn test_malformed_yaml_reports_file() {
    let config = ConfigDir::new();
    let path = config.write("broken.yaml", "automation: [unclosed\n");

    let err = load_yaml_file(&path).unwrap_err();
    match err {
        HarefError::YamlParse { path: reported, .. } => {
            assert!(reported.ends_with("broken.yaml"))
        }
        other => panic!("expected YamlParse, got {:?}", other),
    }
}

#[test]
fn test_empty_file_is_null() {
    let config = ConfigDir::new();
    let path = config.write("empty.yaml", "");
    assert_eq!(load_yaml_file(&path).unwrap(), ConfigNode::null());
}
