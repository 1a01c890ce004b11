//! Tracing layer that keeps recent warnings and errors for the `/log` command.
//!
//! The file log has everything; this buffer only holds what the user is
//! likely to ask about, bounded so a noisy session cannot grow it forever.

use serde_json::Value;
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Default number of diagnostics kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// One captured event.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub target: String,
    pub level: String,
    pub message: String,
    pub fields: HashMap<String, Value>,
    pub timestamp: String,
}

/// Shared handle to the captured events.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: Arc<Mutex<VecDeque<Diagnostic>>>,
    capacity: usize,
}

impl Diagnostics {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn push(&self, diagnostic: Diagnostic) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        while entries.len() >= self.capacity.max(1) {
            entries.pop_front();
        }
        entries.push_back(diagnostic);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Forwards WARN and ERROR events into a [`Diagnostics`] buffer.
pub struct DiagnosticsLayer {
    diagnostics: Diagnostics,
}

impl DiagnosticsLayer {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }
}

impl<S> Layer<S> for DiagnosticsLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }

        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor(&mut fields);
        event.record(&mut visitor);

        let message = fields
            .remove("message")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        self.diagnostics.push(Diagnostic {
            target: event.metadata().target().to_string(),
            level: level.to_string(),
            message,
            fields,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        });
    }
}

/// Replaces the default panic hook so panic reports go to the log instead of
/// stderr, where they would tear through the prompt.
pub fn route_panics_to_tracing() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload()).unwrap_or_else(|| "panic".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(%location, panic = %message, "panicked");
    }));
}

/// Text of a panic payload raised with a string message.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

/// Field visitor that extracts tracing event fields into a HashMap
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl<'a> tracing::field::Visit for FieldVisitor<'a> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(capacity: usize, emit: impl FnOnce()) -> Vec<Diagnostic> {
        let diagnostics = Diagnostics::new(capacity);
        let subscriber =
            tracing_subscriber::registry().with(DiagnosticsLayer::new(diagnostics.clone()));
        tracing::subscriber::with_default(subscriber, emit);
        diagnostics.recent()
    }

    #[test]
    fn test_keeps_warnings_and_errors_only() {
        let captured = capture(10, || {
            tracing::debug!("checking session");
            tracing::info!("logged in");
            tracing::warn!(count = 3, "stored favorites unreadable");
            tracing::error!(status = 500u64, "failed to load dogs");
        });

        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].level, "WARN");
        assert_eq!(captured[0].message, "stored favorites unreadable");
        assert_eq!(captured[0].fields["count"], serde_json::json!(3));
        assert_eq!(captured[1].level, "ERROR");
        assert_eq!(captured[1].fields["status"], serde_json::json!(500));
        assert!(!captured[1].fields.contains_key("message"));
    }

    #[test]
    fn test_panics_are_logged_not_printed() {
        let captured = capture(10, || {
            route_panics_to_tracing();
            let result = std::panic::catch_unwind(|| panic!("card layout broke"));
            drop(std::panic::take_hook());
            assert!(result.is_err());
        });

        let panic = captured
            .iter()
            .find(|d| d.message == "panicked")
            .expect("panic should be captured");
        assert_eq!(panic.level, "ERROR");
        assert_eq!(panic.fields["panic"], serde_json::json!("card layout broke"));
        assert!(
            panic.fields["location"]
                .as_str()
                .is_some_and(|l| l.contains("tracing_layer.rs"))
        );
    }

    #[test]
    fn test_buffer_is_bounded() {
        let captured = capture(2, || {
            for i in 0..5 {
                tracing::error!(i, "failure");
            }
        });

        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].fields["i"], serde_json::json!(3));
        assert_eq!(captured[1].fields["i"], serde_json::json!(4));
    }
}
