//! Diagnostic events for non-fatal extraction failures
//!
//! Malformed model output never aborts a page; it is recorded as a
//! [`DiagnosticEvent`] for offline prompt/schema debugging. The sink is
//! injected into the pipeline rather than read from global state, so tests
//! can assert on exactly what was recorded.

use crate::utils::truncate_str;
use std::sync::Mutex;
use tracing::error;

/// One recorded observation of a non-fatal failure: the page whose
/// extraction produced unusable output, plus the raw offending text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub page_url: String,
    pub raw_output: String,
}

/// Collector for diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Default sink: forwards each event to the tracing subscriber.
#[derive(Clone, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        error!(
            url = %event.page_url,
            raw = %truncate_str(&event.raw_output, 200),
            "Service returned invalid JSON"
        );
    }
}

/// Sink that accumulates events in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().expect("diagnostic sink poisoned").clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .expect("diagnostic sink poisoned")
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_accumulates_events() {
        let sink = MemorySink::new();
        sink.record(DiagnosticEvent {
            page_url: "http://example.test/1".to_string(),
            raw_output: "not json".to_string(),
        });
        sink.record(DiagnosticEvent {
            page_url: "http://example.test/2".to_string(),
            raw_output: "also not json".to_string(),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].page_url, "http://example.test/1");
        assert_eq!(events[1].raw_output, "also not json");
    }
}
