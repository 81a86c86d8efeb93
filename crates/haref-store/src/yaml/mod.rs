//! Home Assistant flavoured YAML loading
//!
//! Turns YAML documents into [`ConfigNode`](haref_core::ConfigNode) trees:
//! include tags are resolved against the filesystem, `!input` and `!secret`
//! survive as placeholders.

mod loader;

pub use loader::{load_yaml_file, load_yaml_tree, parse_yaml_str, YamlTree};
