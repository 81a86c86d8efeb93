use crate::model::{ConfigNode, NodePath, PathSegment, Scope};

use super::classify::classify;

/// Default nesting limit; deeper subtrees are reported and not walked
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What the walker does after visiting a node
#[derive(Debug, Clone, Default)]
pub struct Flow {
    skip_children: bool,
    scope: Option<Scope>,
    replacement: Option<(PathSegment, ConfigNode)>,
}

impl Flow {
    /// Visit the children normally
    pub fn descend() -> Self {
        Self::default()
    }

    /// Do not visit any child of this node
    pub fn skip() -> Self {
        Self {
            skip_children: true,
            ..Self::default()
        }
    }

    /// Walk `node` under `segment` instead of this node's children
    pub fn replace(segment: PathSegment, node: ConfigNode) -> Self {
        Self {
            replacement: Some((segment, node)),
            ..Self::default()
        }
    }

    /// Walk the children under `scope` instead of the current one
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Callback interface for [`Walker`]
pub trait Visitor {
    /// Called once per node, parent before children
    fn visit(&mut self, node: &ConfigNode, path: &NodePath, scope: &Scope) -> Flow;

    /// Called instead of `visit` for a node nested deeper than the limit
    fn depth_exceeded(&mut self, _path: &NodePath, _scope: &Scope, _limit: usize) {}
}

/// Depth-first pre-order traversal of a configuration tree
///
/// The context kind is re-derived at every mapping from its keys and passed
/// down by value; the walker keeps no state between calls other than the
/// current path. Mapping entries are visited in document order and
/// sequence elements in index order, so the visit order is stable.
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    max_depth: usize,
}

impl Walker {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Walk `root` with `scope` as the inherited scope of the root node
    pub fn walk<V: Visitor + ?Sized>(&self, root: &ConfigNode, scope: &Scope, visitor: &mut V) {
        let mut path = NodePath::new();
        self.walk_node(root, &mut path, scope, visitor);
    }

    fn walk_node<V: Visitor + ?Sized>(
        &self,
        node: &ConfigNode,
        path: &mut NodePath,
        inherited: &Scope,
        visitor: &mut V,
    ) {
        if path.len() > self.max_depth {
            visitor.depth_exceeded(path, inherited, self.max_depth);
            return;
        }

        let context = classify(node, inherited.context);
        let scope = if context == inherited.context {
            inherited.clone()
        } else {
            inherited.with_context(context)
        };

        let flow = visitor.visit(node, path, &scope);
        let scope = flow.scope.unwrap_or(scope);

        if let Some((segment, replacement)) = flow.replacement {
            path.push(segment);
            self.walk_node(&replacement, path, &scope, visitor);
            path.pop();
            return;
        }
        if flow.skip_children {
            return;
        }

        match node {
            ConfigNode::Mapping(entries) => {
                for (key, value) in entries {
                    path.push(PathSegment::Key(key.clone()));
                    self.walk_node(value, path, &scope, visitor);
                    path.pop();
                }
            }
            ConfigNode::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    self.walk_node(item, path, &scope, visitor);
                    path.pop();
                }
            }
            _ => {}
        }
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

struct FnVisitor<F>(F);

impl<F> Visitor for FnVisitor<F>
where
    F: FnMut(&ConfigNode, &NodePath, &Scope),
{
    fn visit(&mut self, node: &ConfigNode, path: &NodePath, scope: &Scope) -> Flow {
        (self.0)(node, path, scope);
        Flow::descend()
    }
}

/// Walk every node of `root` with a plain callback
///
/// # Example
///
/// ```
/// use haref_core::model::{ConfigNode, Scope};
/// use haref_core::traversal::walk_fn;
///
/// let root = ConfigNode::sequence([ConfigNode::string("a"), ConfigNode::string("b")]);
/// let mut paths = Vec::new();
/// walk_fn(&root, &Scope::default(), |_, path, _| paths.push(path.to_string()));
/// assert_eq!(paths, vec!["<root>", "[0]", "[1]"]);
/// ```
pub fn walk_fn<F>(root: &ConfigNode, scope: &Scope, callback: F)
where
    F: FnMut(&ConfigNode, &NodePath, &Scope),
{
    Walker::new().walk(root, scope, &mut FnVisitor(callback));
}
