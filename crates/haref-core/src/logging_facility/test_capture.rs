//! In-memory capture of validator log events
//!
//! Tests install one process-wide subscriber and then look up the events a
//! particular load or validation run emitted, usually by `op` plus one
//! distinguishing field such as `document` or `run_id`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

/// One recorded event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Rendered value of a field, e.g. `findings` or `err.code`
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether this event belongs to `op` and has lifecycle marker `event`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }

    pub fn is_start(&self) -> bool {
        self.event.as_deref() == Some(EVENT_START)
    }

    pub fn is_end(&self) -> bool {
        self.event.as_deref() == Some(EVENT_END)
    }

    pub fn is_failure(&self) -> bool {
        self.event.as_deref() == Some(EVENT_END_ERROR)
    }
}

#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl FieldRecorder {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that appends every event to a shared log
pub struct TestCaptureLayer {
    log: EventLog,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let log = EventLog::default();
        (Self { log: log.clone() }, TestCapture { log })
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let fields = recorder.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get("component").cloned(),
            op: fields.get("op").cloned(),
            event: fields.get("event").cloned(),
            fields,
        };

        if let Ok(mut log) = self.log.lock() {
            log.push(captured);
        }
    }
}

/// Read side of the captured event log
#[derive(Clone)]
pub struct TestCapture {
    log: EventLog,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics when no event with this `op` and lifecycle marker was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            events.len()
        );
    }

    /// Events emitted for one operation, in capture order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// First event of `op` whose `field` has the given value
    ///
    /// Tests share one subscriber, so this is how a test picks out its own
    /// document or blueprint among events logged by tests running alongside.
    pub fn find_for(&self, op: &str, field: &str, value: &str) -> Option<CapturedEvent> {
        self.events_for_op(op)
            .into_iter()
            .find(|e| e.field(field) == Some(value))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once per test binary and return its handle
///
/// # Example
///
/// ```
/// use haref_core::logging_facility::test_capture::init_test_capture;
/// use haref_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("load_registry", config_dir = "/config");
/// assert!(capture
///     .find_for("load_registry", "config_dir", "/config")
///     .is_some_and(|e| e.is_start()));
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(op: &str, marker: &str, fields: &[(&str, &str)]) -> CapturedEvent {
        CapturedEvent {
            level: Level::INFO,
            component: Some("haref_core::validate".to_string()),
            op: Some(op.to_string()),
            event: Some(marker.to_string()),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_lifecycle_predicates() {
        let end = event("validate", EVENT_END, &[("findings", "3")]);
        assert!(end.is("validate", EVENT_END));
        assert!(end.is_end());
        assert!(!end.is_start());
        assert!(!end.is_failure());
        assert_eq!(end.field("findings"), Some("3"));
        assert_eq!(end.field("duration_ms"), None);
    }

    #[test]
    fn test_find_for_picks_matching_document() {
        let (_layer, capture) = TestCaptureLayer::new();
        {
            let mut log = capture.log.lock().unwrap();
            log.push(event("load_yaml", EVENT_START, &[("path", "scripts.yaml")]));
            log.push(event("load_yaml", EVENT_START, &[("path", "automations.yaml")]));
        }
        let found = capture
            .find_for("load_yaml", "path", "automations.yaml")
            .unwrap();
        assert_eq!(found.field("path"), Some("automations.yaml"));
        assert!(capture.find_for("load_yaml", "path", "groups.yaml").is_none());
    }
}
