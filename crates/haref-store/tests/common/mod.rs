// Shared builders for store integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// A Home Assistant configuration directory in a temp dir
pub struct ConfigDir {
    dir: TempDir,
}

impl ConfigDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the config dir, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a `.storage` file wrapped in the usual `data` envelope
    pub fn write_storage(&self, name: &str, data: Value) -> PathBuf {
        let envelope = json!({"version": 1, "minor_version": 1, "key": name, "data": data});
        self.write(
            &format!(".storage/{}", name),
            &serde_json::to_string_pretty(&envelope).unwrap(),
        )
    }

    /// Entity, device and area registries of a small home
    pub fn with_home_registries(self) -> Self {
        self.write_storage(
            "core.entity_registry",
            json!({"entities": [
                {"entity_id": "light.kitchen", "id": "0123456789abcdef0123456789abcdef", "disabled_by": null},
                {"entity_id": "light.hallway", "id": "11111111111111111111111111111111", "disabled_by": null},
                {"entity_id": "binary_sensor.hall_motion", "id": "22222222222222222222222222222222", "disabled_by": null},
                {"entity_id": "sensor.old_meter", "id": "33333333333333333333333333333333", "disabled_by": "user"},
                {"entity_id": "script.good_night", "id": "44444444444444444444444444444444", "disabled_by": null}
            ]}),
        );
        self.write_storage(
            "core.device_registry",
            json!({"devices": [{"id": "d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1", "name": "Hue bridge"}]}),
        );
        self.write_storage(
            "core.area_registry",
            json!({"areas": [{"id": "kitchen", "name": "Kitchen"}]}),
        );
        self
    }

    pub fn with_motion_light_blueprint(self) -> Self {
        self.write(
            "blueprints/automation/homeassistant/motion_light.yaml",
            MOTION_LIGHT_BLUEPRINT,
        );
        self
    }
}

pub const MOTION_LIGHT_BLUEPRINT: &str = r#"blueprint:
  name: Motion-activated Light
  domain: automation
  input:
    motion_entity:
      name: Motion Sensor
      selector:
        entity:
          domain: binary_sensor
    light_target:
      name: Light
      selector:
        target:
          entity:
            domain: light
    timing:
      name: Timing
      input:
        no_motion_wait:
          name: Wait time
          default: 120
trigger:
  platform: state
  entity_id: !input motion_entity
  from: "off"
  to: "on"
action:
  - service: light.turn_on
    target: !input light_target
  - delay: !input no_motion_wait
"#;
