use std::collections::BTreeMap;

use super::ConfigNode;

/// Declared blueprint input
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    /// An input is required when it declares no default
    pub required: bool,
    pub default: Option<ConfigNode>,
}

impl InputSpec {
    pub fn required() -> Self {
        Self {
            required: true,
            default: None,
        }
    }

    pub fn with_default(default: ConfigNode) -> Self {
        Self {
            required: false,
            default: Some(default),
        }
    }
}

/// A loaded blueprint: its input schema and the body that `!input`
/// placeholders are substituted into
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintDefinition {
    pub name: String,
    pub input_schema: BTreeMap<String, InputSpec>,
    pub body: ConfigNode,
}

impl BlueprintDefinition {
    pub fn new(name: impl Into<String>, body: ConfigNode) -> Self {
        Self {
            name: name.into(),
            input_schema: BTreeMap::new(),
            body,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, spec: InputSpec) -> Self {
        self.input_schema.insert(name.into(), spec);
        self
    }

    pub fn declares(&self, input: &str) -> bool {
        self.input_schema.contains_key(input)
    }
}
