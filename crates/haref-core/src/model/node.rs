use haref_core_types::Sensitive;

/// A leaf value of a configuration document
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// String content, if this scalar is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

/// A loaded configuration tree
///
/// Include tags have already been resolved by the loader. `!input` and
/// `!secret` survive as distinguishable placeholders so that they are never
/// mistaken for literal references. Mapping entries keep document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Mapping(Vec<(String, ConfigNode)>),
    Sequence(Vec<ConfigNode>),
    Scalar(Scalar),
    /// `!input <name>` blueprint placeholder
    Input(String),
    /// `!secret <name>` (or `!env_var`) placeholder
    Secret(Sensitive<String>),
    /// Blueprint input left without a value after substitution
    Unresolved { input: String, required: bool },
}

impl ConfigNode {
    /// String scalar
    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Scalar::String(value.into()))
    }

    /// Null scalar
    pub fn null() -> Self {
        ConfigNode::Scalar(Scalar::Null)
    }

    /// `!input` placeholder
    pub fn input(name: impl Into<String>) -> Self {
        ConfigNode::Input(name.into())
    }

    /// `!secret` placeholder
    pub fn secret(name: impl Into<String>) -> Self {
        ConfigNode::Secret(Sensitive::new(name.into()))
    }

    /// Mapping from (key, value) pairs, keeping their order
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigNode)>,
    {
        ConfigNode::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Sequence of nodes
    pub fn sequence(items: impl IntoIterator<Item = ConfigNode>) -> Self {
        ConfigNode::Sequence(items.into_iter().collect())
    }

    /// Look up a key in a mapping node; `None` for any other node
    ///
    /// If a key occurs twice, the first occurrence wins.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether this is a mapping containing `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Mapping entries, if this is a mapping
    pub fn entries(&self) -> Option<&[(String, ConfigNode)]> {
        match self {
            ConfigNode::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// String content, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(s) => s.as_str(),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigNode::Mapping(_))
    }

    /// Whether this node stands in for a value that is not known statically
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            ConfigNode::Input(_) | ConfigNode::Secret(_) | ConfigNode::Unresolved { .. }
        )
    }
}

impl From<serde_json::Value> for ConfigNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigNode::Scalar(Scalar::Null),
            Value::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigNode::Scalar(Scalar::Int(i)),
                None => ConfigNode::Scalar(Scalar::Float(n.as_f64().unwrap_or_default())),
            },
            Value::String(s) => ConfigNode::Scalar(Scalar::String(s)),
            Value::Array(items) => {
                ConfigNode::Sequence(items.into_iter().map(ConfigNode::from).collect())
            }
            Value::Object(map) => ConfigNode::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigNode::from(v)))
                    .collect(),
            ),
        }
    }
}
