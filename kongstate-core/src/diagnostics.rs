use crate::error::AnnotationError;
use serde::Serialize;
use std::sync::Mutex;

/// A non-fatal problem found while resolving overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Annotation key that carried the offending value.
    pub key: String,
    /// Raw value as found on the object.
    pub value: String,
    /// Human-readable reason.
    pub reason: String,
}

impl From<&AnnotationError> for Diagnostic {
    fn from(err: &AnnotationError) -> Self {
        Self {
            key: err.key().to_string(),
            value: err.value().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Receiver for warnings emitted by the override cascade.
///
/// Implementations must not panic; the cascade keeps going after every call.
pub trait DiagnosticSink {
    fn warn(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards every diagnostic to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            key = %diagnostic.key,
            value = %diagnostic.value,
            reason = %diagnostic.reason,
            "Ignoring invalid annotation value"
        );
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warn(&self, _diagnostic: Diagnostic) {}
}

/// Records diagnostics in memory and also forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, diagnostic: Diagnostic) {
        TracingSink.warn(diagnostic.clone());
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
