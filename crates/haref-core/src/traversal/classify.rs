use crate::model::{ConfigNode, ContextKind};

/// Decide the context kind a mapping declares, if any
///
/// Only mappings declare a kind. Checked in order:
///
/// 1. `use_blueprint` → Blueprint
/// 2. `trigger`/`triggers` together with `action`/`actions` → Automation
/// 3. `sequence` → Script, unless already inside an automation or script
///    (`repeat`, `parallel` and `choose` blocks carry their own `sequence`)
/// 4. `views` → Dashboard
/// 5. `name` with a mapping-valued `entities` → Scene
pub fn declared_kind(node: &ConfigNode, current: ContextKind) -> Option<ContextKind> {
    if !node.is_mapping() {
        return None;
    }
    if node.contains_key("use_blueprint") {
        return Some(ContextKind::Blueprint);
    }
    let has_trigger = node.contains_key("trigger") || node.contains_key("triggers");
    let has_action = node.contains_key("action") || node.contains_key("actions");
    if has_trigger && has_action {
        return Some(ContextKind::Automation);
    }
    if node.contains_key("sequence")
        && !matches!(current, ContextKind::Automation | ContextKind::Script)
    {
        return Some(ContextKind::Script);
    }
    if node.contains_key("views") {
        return Some(ContextKind::Dashboard);
    }
    if node.contains_key("name") && node.get("entities").is_some_and(ConfigNode::is_mapping) {
        return Some(ContextKind::Scene);
    }
    None
}

/// Context kind in effect at `node`, given the inherited one
pub fn classify(node: &ConfigNode, inherited: ContextKind) -> ContextKind {
    declared_kind(node, inherited).unwrap_or(inherited)
}
