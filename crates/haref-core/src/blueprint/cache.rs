use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use crate::errors::{HarefError, Result};
use crate::model::BlueprintDefinition;
use crate::schema::OP_LOAD_BLUEPRINT;
use crate::{log_op_degraded, log_op_end, log_op_start};

/// Loads blueprint definitions by the name used in `use_blueprint.path`
pub trait BlueprintSource {
    /// # Errors
    ///
    /// `BlueprintNotFound` if no blueprint has this name, `InvalidBlueprint`
    /// if it exists but cannot be read as a blueprint.
    fn load_blueprint(&self, name: &str) -> Result<BlueprintDefinition>;
}

/// Source with no blueprints; every load is `BlueprintNotFound`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlueprints;

impl BlueprintSource for NoBlueprints {
    fn load_blueprint(&self, name: &str) -> Result<BlueprintDefinition> {
        Err(HarefError::BlueprintNotFound {
            name: name.to_string(),
        })
    }
}

impl<F> BlueprintSource for F
where
    F: Fn(&str) -> Result<BlueprintDefinition>,
{
    fn load_blueprint(&self, name: &str) -> Result<BlueprintDefinition> {
        self(name)
    }
}

/// Run-scoped cache of blueprint loads
///
/// Each distinct name is loaded at most once, failures included. A cache
/// belongs to one validation run; concurrent runs each construct their own.
pub struct BlueprintCache<'s> {
    source: &'s dyn BlueprintSource,
    entries: HashMap<String, Result<Rc<BlueprintDefinition>>>,
}

impl<'s> BlueprintCache<'s> {
    pub fn new(source: &'s dyn BlueprintSource) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    /// Cached definition for `name`, loading it on first use
    ///
    /// # Errors
    ///
    /// The source's error for this name, repeated on every call.
    pub fn get(&mut self, name: &str) -> Result<Rc<BlueprintDefinition>> {
        if let Some(entry) = self.entries.get(name) {
            return entry.clone();
        }
        let entry = self.load(name);
        self.entries.insert(name.to_string(), entry.clone());
        entry
    }

    /// Number of distinct names requested so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load(&self, name: &str) -> Result<Rc<BlueprintDefinition>> {
        let start = Instant::now();
        log_op_start!(OP_LOAD_BLUEPRINT, blueprint = name);
        match self.source.load_blueprint(name) {
            Ok(definition) => {
                log_op_end!(
                    OP_LOAD_BLUEPRINT,
                    duration_ms = start.elapsed().as_millis() as u64,
                    blueprint = name
                );
                Ok(Rc::new(definition))
            }
            Err(err) => {
                log_op_degraded!(
                    OP_LOAD_BLUEPRINT,
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    blueprint = name
                );
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for BlueprintCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueprintCache")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigNode;
    use std::cell::Cell;

    #[test]
    fn test_each_name_loaded_once_including_failures() {
        let calls = Cell::new(0);
        let source = |name: &str| {
            calls.set(calls.get() + 1);
            if name == "ok.yaml" {
                Ok(BlueprintDefinition::new(name, ConfigNode::null()))
            } else {
                Err(HarefError::BlueprintNotFound {
                    name: name.to_string(),
                })
            }
        };
        let mut cache = BlueprintCache::new(&source);

        assert!(cache.get("ok.yaml").is_ok());
        assert!(cache.get("ok.yaml").is_ok());
        assert!(cache.get("missing.yaml").is_err());
        assert!(cache.get("missing.yaml").is_err());

        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_no_blueprints_is_not_found() {
        let mut cache = BlueprintCache::new(&NoBlueprints);
        assert_eq!(
            cache.get("a.yaml").unwrap_err(),
            HarefError::BlueprintNotFound {
                name: "a.yaml".to_string()
            }
        );
    }
}
