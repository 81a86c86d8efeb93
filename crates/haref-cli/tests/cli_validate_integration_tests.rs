//! CLI integration tests
//!
//! These tests run the built binary against a config directory laid out in
//! a temp dir and check its output and exit code.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_storage(root: &Path, name: &str, data: Value) {
    let envelope = json!({"version": 1, "key": name, "data": data});
    write(root, &format!(".storage/{}", name), &envelope.to_string());
}

fn setup_config_dir(temp_dir: &TempDir) {
    let root = temp_dir.path();
    write_storage(
        root,
        "core.entity_registry",
        json!({"entities": [
            {"entity_id": "light.kitchen", "id": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "disabled_by": null},
            {"entity_id": "binary_sensor.door", "id": "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", "disabled_by": null},
            {"entity_id": "sensor.old_meter", "id": "cccccccccccccccccccccccccccccccc", "disabled_by": "user"}
        ]}),
    );
    write_storage(root, "core.device_registry", json!({"devices": []}));
    write(
        root,
        "configuration.yaml",
        "homeassistant:\n  name: Home\nautomation: !include automations.yaml\n",
    );
}

fn run(args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_haref-cli");
    Command::new(cli_bin)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_validate_clean_config_passes() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);
    write(
        temp_dir.path(),
        "automations.yaml",
        concat!(
            "- alias: Door light\n",
            "  trigger:\n",
            "    - platform: state\n",
            "      entity_id: binary_sensor.door\n",
            "  action:\n",
            "    - service: light.turn_on\n",
            "      target:\n",
            "        entity_id: light.kitchen\n",
        ),
    );

    let output = run(&["validate", temp_dir.path().to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("All entity/device references are valid!"));
}

#[test]
fn test_validate_unknown_entity_fails() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);
    write(
        temp_dir.path(),
        "automations.yaml",
        concat!(
            "- alias: Garage\n",
            "  trigger: []\n",
            "  action:\n",
            "    - service: light.turn_on\n",
            "      target:\n",
            "        entity_id: light.garage\n",
        ),
    );

    let output = run(&["validate", temp_dir.path().to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("unknown entity reference 'light.garage'"));
    assert!(stdout.contains("configuration.yaml:"));
    assert_eq!(stdout.matches("light.garage").count(), 1, "stdout: {}", stdout);
    assert!(stdout.contains("Invalid entity/device references found"));
}

#[test]
fn test_validate_strict_fails_on_disabled_entity() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);
    write(
        temp_dir.path(),
        "automations.yaml",
        concat!(
            "- alias: Meter\n",
            "  trigger:\n",
            "    - platform: state\n",
            "      entity_id: sensor.old_meter\n",
            "  action: []\n",
        ),
    );
    let dir = temp_dir.path().to_str().unwrap();

    let lenient = run(&["validate", dir]);
    assert!(lenient.status.success());
    assert!(String::from_utf8_lossy(&lenient.stdout).contains("(with warnings)"));

    let strict = run(&["validate", dir, "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_validate_json_output() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);
    write(
        temp_dir.path(),
        "automations.yaml",
        concat!(
            "- alias: Garage\n",
            "  trigger: []\n",
            "  action:\n",
            "    - service: light.turn_on\n",
            "      target:\n",
            "        entity_id: light.garage\n",
        ),
    );

    let output = run(&[
        "validate",
        temp_dir.path().to_str().unwrap(),
        "--format",
        "json",
    ]);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], json!(false));
    assert_eq!(report["errors"], json!(1));
    let documents = report["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["document"], json!("configuration.yaml"));
    let finding = &documents[0]["findings"][0];
    assert_eq!(finding["severity"], json!("error"));
    assert_eq!(finding["code"], json!("UnknownRegistryEntry"));
    assert_eq!(
        finding["path"],
        json!("automation[0].action[0].target.entity_id")
    );
}

#[test]
fn test_validate_reports_unloadable_document() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);
    write(temp_dir.path(), "automations.yaml", "- alias: [unclosed\n");

    let output = run(&["validate", temp_dir.path().to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Failed to load YAML"));
}

#[test]
fn test_validate_missing_config_dir() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let output = run(&["validate", missing.to_str().unwrap()]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.starts_with("Error: Config directory"));
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_summary_lists_domains() {
    let temp_dir = TempDir::new().unwrap();
    setup_config_dir(&temp_dir);

    let output = run(&["summary", temp_dir.path().to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("AVAILABLE ENTITIES BY DOMAIN:"));
    assert!(stdout.contains("  sensor: 0 enabled, 1 disabled"));
    assert!(stdout.contains("    Examples: light.kitchen"));
}
