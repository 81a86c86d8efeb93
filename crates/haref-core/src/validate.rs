//! Validation entry point

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use haref_core_types::RunId;

use crate::blueprint::{resolve, BlueprintCache, NoBlueprints, Resolution};
use crate::extract::extract;
use crate::model::{
    ConfigNode, ContextKind, Finding, FindingCode, NodePath, Origin, PathSegment, RawReference,
    ReferenceKind, RegistrySnapshot, Scope, Severity,
};
use crate::report::ValidationReport;
use crate::rules::{check, classify};
use crate::schema::OP_VALIDATE;
use crate::traversal::{Flow, Visitor, Walker, DEFAULT_MAX_DEPTH};
use crate::{log_op_end, log_op_start};

/// Service domains every installation provides
pub const DEFAULT_BUILTIN_DOMAINS: &[&str] = &[
    "homeassistant",
    "automation",
    "script",
    "scene",
    "input_boolean",
    "input_number",
    "input_select",
    "input_text",
    "light",
    "switch",
    "cover",
    "fan",
    "climate",
    "media_player",
    "camera",
    "lock",
    "vacuum",
    "notify",
    "persistent_notification",
];

/// Caller-supplied settings for a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Service domains accepted without a registry entry
    pub builtin_domains: BTreeSet<String>,
    /// Keep Info findings instead of only counting them
    pub verbose: bool,
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            builtin_domains: DEFAULT_BUILTIN_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            verbose: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationOptions {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Validates configuration trees against one registry snapshot
///
/// A validator holds only borrowed, read-only state. Each call to
/// [`Validator::validate`] is an independent run.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a RegistrySnapshot,
    options: &'a ValidationOptions,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a RegistrySnapshot, options: &'a ValidationOptions) -> Self {
        Self { registry, options }
    }

    /// Validate one tree
    ///
    /// # Arguments
    ///
    /// * `root` - Loaded configuration document
    /// * `root_context` - Context of the root node when its shape declares
    ///   none (e.g. Dashboard for a lovelace file)
    /// * `cache` - Blueprint cache owned by this run
    ///
    /// # Returns
    ///
    /// Findings in traversal order. Info findings are dropped and counted
    /// unless the options ask for verbose output.
    pub fn validate(
        &self,
        root: &ConfigNode,
        root_context: ContextKind,
        cache: &mut BlueprintCache<'_>,
    ) -> ValidationReport {
        let start = Instant::now();
        let run_id = RunId::new();
        log_op_start!(
            OP_VALIDATE,
            run_id = run_id.as_str(),
            root_context = root_context.as_str()
        );

        let mut visitor = RunVisitor {
            registry: self.registry,
            options: self.options,
            cache,
            findings: Vec::new(),
            suppressed_info: 0,
            reported_unavailable: HashSet::new(),
        };
        Walker::with_max_depth(self.options.max_depth).walk(
            root,
            &Scope::new(root_context),
            &mut visitor,
        );
        let report = ValidationReport::new(visitor.findings, visitor.suppressed_info);

        log_op_end!(
            OP_VALIDATE,
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            findings = report.findings.len(),
            suppressed = report.suppressed_info
        );
        report
    }
}

/// Validate `root` with default options and no blueprints
///
/// # Example
///
/// ```
/// use haref_core::model::{ConfigNode, RegistrySnapshot};
/// use haref_core::validate;
/// use serde_json::json;
///
/// let root = ConfigNode::from(json!([{
///     "trigger": [{"platform": "state", "entity_id": "binary_sensor.door"}],
///     "action": [{"service": "light.turn_on", "target": {"entity_id": "light.porch"}}]
/// }]));
/// let registry = RegistrySnapshot::new().with_entity("binary_sensor.door");
///
/// let findings = validate(&root, &registry);
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].value, "light.porch");
/// ```
pub fn validate(root: &ConfigNode, registry: &RegistrySnapshot) -> Vec<Finding> {
    let options = ValidationOptions::default();
    let mut cache = BlueprintCache::new(&NoBlueprints);
    Validator::new(registry, &options)
        .validate(root, ContextKind::Unknown, &mut cache)
        .into_findings()
}

struct RunVisitor<'r, 'c, 's> {
    registry: &'r RegistrySnapshot,
    options: &'r ValidationOptions,
    cache: &'c mut BlueprintCache<'s>,
    findings: Vec<Finding>,
    suppressed_info: usize,
    reported_unavailable: HashSet<String>,
}

impl RunVisitor<'_, '_, '_> {
    fn emit(&mut self, finding: Finding) {
        if finding.severity == Severity::Info && !self.options.verbose {
            self.suppressed_info += 1;
        } else {
            self.findings.push(finding);
        }
    }

    fn report(&mut self, reference: &RawReference) {
        let outcome = check(reference, self.registry, &self.options.builtin_domains);
        if let Some(finding) = classify(reference, &outcome) {
            self.emit(finding);
        }
    }

    fn use_site(&mut self, node: &ConfigNode, path: &NodePath, scope: &Scope) -> Flow {
        let use_path = path.key("use_blueprint");
        match resolve(node, self.cache) {
            Resolution::NotBlueprint => Flow::descend(),
            Resolution::Resolved(resolved) => {
                if path.expands(&resolved.name) {
                    self.emit(Finding {
                        severity: Severity::Error,
                        code: FindingCode::StructuralError,
                        reference_kind: None,
                        value: resolved.name.clone(),
                        path: path.clone(),
                        message: format!(
                            "blueprint '{}' uses itself at {}; expansion stopped",
                            resolved.name, path
                        ),
                    });
                    return Flow::skip();
                }
                let input_path = use_path.key("input");
                for input in &resolved.unexpected_inputs {
                    self.emit(Finding {
                        severity: Severity::Warning,
                        code: FindingCode::UnexpectedBlueprintInput,
                        reference_kind: None,
                        value: input.clone(),
                        path: input_path.key(input.as_str()),
                        message: format!(
                            "input '{}' is not declared by blueprint '{}'",
                            input, resolved.name
                        ),
                    });
                }
                for input in &resolved.missing_inputs {
                    let missing = RawReference::new(
                        ReferenceKind::BlueprintInput,
                        input,
                        input_path.clone(),
                        scope.clone(),
                        Origin::Placeholder { required: true },
                    );
                    if let Some(reference) = missing {
                        self.report(&reference);
                    }
                }
                Flow::replace(PathSegment::Blueprint(resolved.name), resolved.body)
            }
            Resolution::Unavailable { name, reason } => {
                if self.reported_unavailable.insert(name.clone()) {
                    self.emit(Finding {
                        severity: Severity::Warning,
                        code: FindingCode::BlueprintUnavailable,
                        reference_kind: None,
                        value: name.clone(),
                        path: use_path.key("path"),
                        message: format!(
                            "blueprint '{}' is unavailable ({}); \
                             references below it are not checked strictly",
                            name, reason
                        ),
                    });
                }
                Flow::descend().with_scope(scope.quarantined(name))
            }
            Resolution::MissingPath => {
                self.emit(Finding {
                    severity: Severity::Warning,
                    code: FindingCode::BlueprintUnavailable,
                    reference_kind: None,
                    value: String::new(),
                    path: use_path.clone(),
                    message: format!("use_blueprint at {} has no path", use_path),
                });
                Flow::descend().with_scope(scope.quarantined("<missing path>"))
            }
        }
    }
}

impl Visitor for RunVisitor<'_, '_, '_> {
    fn visit(&mut self, node: &ConfigNode, path: &NodePath, scope: &Scope) -> Flow {
        if node.contains_key("use_blueprint") {
            return self.use_site(node, path, scope);
        }

        let extraction = extract(node, path, scope);
        for reference in &extraction.references {
            self.report(reference);
        }

        if extraction.terminal {
            Flow::skip()
        } else {
            Flow::descend()
        }
    }

    fn depth_exceeded(&mut self, path: &NodePath, _scope: &Scope, limit: usize) {
        self.emit(Finding {
            severity: Severity::Error,
            code: FindingCode::StructuralError,
            reference_kind: None,
            value: path.to_string(),
            path: path.clone(),
            message: format!(
                "nesting deeper than {} levels at {}; subtree not validated",
                limit, path
            ),
        });
    }
}
