use serde::{Serialize, Serializer};

/// One step from a parent node to a child node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
    /// Expansion of a blueprint body in place of its `use_blueprint` node
    Blueprint(String),
}

/// Location of a node inside a configuration tree
///
/// Renders as `automation[0].action[1].target.entity_id`; a blueprint
/// expansion renders as `@<blueprint path>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of this path extended by one segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Copy of this path extended by a mapping key
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// Copy of this path extended by a sequence index
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Whether the path already passes through an expansion of `blueprint`
    pub fn expands(&self, blueprint: &str) -> bool {
        self.0
            .iter()
            .any(|s| matches!(s, PathSegment::Blueprint(name) if name == blueprint))
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Blueprint(name) if i == 0 => write!(f, "@{}", name)?,
                PathSegment::Blueprint(name) => write!(f, ".@{}", name)?,
            }
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
