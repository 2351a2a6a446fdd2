//! Port for the structured audit trail.
//!
//! Defines the [`AuditLogger`] trait for recording what happened to each
//! proposal (transitions, ignored events, reviews, decisions) in a
//! machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the audit
//! record (e.g., JSONL).

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Adapters add the timestamp when writing.
pub struct AuditEvent {
    /// Event type identifier (e.g., "transition", "event_ignored", "decision").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// `log` is synchronous and non-fallible: a failing audit sink must not
/// interrupt the review flow, so adapters swallow write errors.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
