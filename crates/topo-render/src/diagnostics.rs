//! Where renderers report malformed input they skipped.

use parking_lot::Mutex;
use topo_error::{Error, ErrorKind};

/// Receives non-fatal problems found while rendering.
///
/// Reporting never interrupts a render; the offending entry is skipped.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &Error);
}

/// Default sink: one `tracing` warning per problem.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &Error) {
        tracing::warn!(
            kind = %error.kind(),
            operation = error.operation(),
            "{}",
            error.message()
        );
    }
}

/// A reported problem, detached from the error that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub operation: &'static str,
    pub message: String,
}

/// Sink that keeps every report for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Drain all reports.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, error: &Error) {
        self.entries.lock().push(Diagnostic {
            kind: error.kind(),
            operation: error.operation(),
            message: error.message().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_reports() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.report(&Error::malformed_id("edge ID", "nope").with_operation("test"));
        sink.report(&Error::malformed_id("adjacency ID", "x"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, ErrorKind::MalformedId);
        assert_eq!(entries[0].operation, "test");
        assert_eq!(entries[0].message, "bad edge ID 'nope'");

        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }
}
