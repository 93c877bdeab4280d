//! Sink — where decoded messages end up.

pub mod tracing_sink;

use serde::Serialize;

use crate::parser::Fields;
use crate::route::Severity;

pub use tracing_sink::TracingSink;

/// Structured event sink.
///
/// `fields` is `None` when the message carried no annotations at all.
pub trait EventSink: Send + Sync {
    fn emit(&self, severity: Severity, fields: Option<&Fields>, message: &str);
}

/// An owned copy of one emitted event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub severity: Severity,
    pub fields: Option<Fields>,
    pub message: String,
}
