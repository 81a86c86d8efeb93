//! Restricted scanner for templated strings
//!
//! The scanner never evaluates a template. It matches a fixed set of
//! patterns against the content of each `{{ }}` and `{% %}` region and
//! recovers literal, reference-shaped values:
//!
//! * a quoted `domain.object_id` literal, whether it is the argument of
//!   `states(`, `is_state(`, `state_attr(`, `is_state_attr(`, `has_value(`
//!   or stands alone (lists, `expand(`, comparisons)
//! * `states.domain.object_id` attribute access
//! * `device_id('...')` / `area_id('...')` with a literal argument that is
//!   not itself an entity id
//! * `service('domain.name')` / `action('domain.name')` with a single
//!   literal argument
//!
//! Anything that is not a literal (`trigger.entity_id`, loop variables,
//! filters, arithmetic) is never emitted. Literals are considered at every
//! nesting depth. `{# #}` comments are skipped.

use std::sync::LazyLock;

use regex::{Match, Regex};

use crate::model::ReferenceKind;

use super::shape::{is_entity_id, is_service_shaped};

/// Expression, statement and comment regions; comments have no capture
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{(?P<expr>.*?)\}\}|\{%(?P<stmt>.*?)%\}|\{#.*?#\}")
        .expect("region pattern")
});

/// Single or double quoted string literal, backslash escapes allowed
static LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*""#).expect("literal pattern")
});

/// Helper call whose first argument is a literal
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?P<helper>states|is_state|state_attr|is_state_attr|has_value",
        r"|device_id|area_id|service|action)",
        r"\s*\(\s*",
        r#"(?P<lit>'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")"#,
    ))
    .expect("call pattern")
});

/// `states.<domain>.<object_id>` attribute access
static STATES_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstates\.(\w+)\.(\w+)").expect("states attribute pattern"));

/// A reference recovered from a templated string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub kind: ReferenceKind,
    /// Registry lookup value; the domain for services
    pub value: String,
    /// Full literal, for services
    pub literal: Option<String>,
}

impl TemplateRef {
    fn new(kind: ReferenceKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            literal: None,
        }
    }
}

/// Scan `text` for references; empty if it holds no template region
///
/// Results are de-duplicated by (kind, value), in first-seen order.
///
/// # Example
///
/// ```
/// use haref_core::extract::template::scan;
///
/// let refs = scan("{{ states('light.kitchen') }}");
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].value, "light.kitchen");
///
/// assert!(scan("{{ trigger.entity_id }}").is_empty());
/// ```
pub fn scan(text: &str) -> Vec<TemplateRef> {
    let mut found: Vec<TemplateRef> = Vec::new();
    for captures in REGION_RE.captures_iter(text) {
        if let Some(region) = captures.name("expr").or_else(|| captures.name("stmt")) {
            scan_region(region.as_str(), &mut found);
        }
    }
    found
}

fn push_unique(found: &mut Vec<TemplateRef>, reference: TemplateRef) {
    if !found
        .iter()
        .any(|r| r.kind == reference.kind && r.value == reference.value)
    {
        found.push(reference);
    }
}

/// Literal content with quotes removed and escapes resolved
fn literal_text(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => text.extend(chars.next()),
            other => text.push(other),
        }
    }
    text.trim().to_string()
}

/// A name match that is not the tail of a dotted chain (`x.states(`)
fn stands_alone(region: &str, m: &Match<'_>) -> bool {
    !region[..m.start()].ends_with('.')
}

fn scan_region(region: &str, found: &mut Vec<TemplateRef>) {
    let literals: Vec<Match<'_>> = LITERAL_RE.find_iter(region).collect();
    let in_literal = |pos: usize| literals.iter().any(|l| l.start() < pos && pos < l.end());

    // (position, reference) for helper calls and attribute access
    let mut located: Vec<(usize, TemplateRef)> = Vec::new();
    let mut consumed: Vec<usize> = Vec::new();

    for captures in CALL_RE.captures_iter(region) {
        let (Some(helper), Some(lit)) = (captures.name("helper"), captures.name("lit")) else {
            continue;
        };
        if in_literal(helper.start()) || !stands_alone(region, &helper) {
            continue;
        }
        let value = literal_text(lit.as_str());
        let reference = match helper.as_str() {
            "service" | "action" => {
                let sole = region[lit.end()..].trim_start().starts_with(')');
                match value.split_once('.') {
                    Some((domain, _)) if sole && is_service_shaped(&value) => {
                        let mut reference = TemplateRef::new(ReferenceKind::Service, domain);
                        reference.literal = Some(value.clone());
                        Some(reference)
                    }
                    _ => None,
                }
            }
            "device_id" | "area_id" if value.is_empty() || is_entity_id(&value) => None,
            "device_id" => Some(TemplateRef::new(ReferenceKind::Device, value)),
            "area_id" => Some(TemplateRef::new(ReferenceKind::Area, value)),
            _ if is_entity_id(&value) => Some(TemplateRef::new(ReferenceKind::Entity, value)),
            _ => None,
        };
        if let Some(reference) = reference {
            consumed.push(lit.start());
            located.push((helper.start(), reference));
        }
    }

    for captures in STATES_ATTR_RE.captures_iter(region) {
        let (Some(whole), Some(domain), Some(object_id)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        if in_literal(whole.start()) || !stands_alone(region, &whole) {
            continue;
        }
        let entity_id = format!("{}.{}", domain.as_str(), object_id.as_str());
        if is_entity_id(&entity_id) {
            located.push((whole.start(), TemplateRef::new(ReferenceKind::Entity, entity_id)));
        }
    }

    located.sort_by_key(|(position, _)| *position);
    for (_, reference) in located {
        push_unique(found, reference);
    }

    for literal in literals.iter().filter(|l| !consumed.contains(&l.start())) {
        let value = literal_text(literal.as_str());
        if is_entity_id(&value) {
            push_unique(found, TemplateRef::new(ReferenceKind::Entity, value));
        }
    }
}
