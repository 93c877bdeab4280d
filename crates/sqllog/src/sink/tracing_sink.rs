use crate::parser::Fields;
use crate::route::Severity;

use super::EventSink;

/// Target of every event forwarded from the remote side.
pub const REMOTE_TARGET: &str = "sqllog::remote";

macro_rules! emit_at {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            Severity::Debug => tracing::debug!(target: REMOTE_TARGET, $($arg)+),
            Severity::Info => tracing::info!(target: REMOTE_TARGET, $($arg)+),
            Severity::Warning => tracing::warn!(target: REMOTE_TARGET, $($arg)+),
            Severity::Error => tracing::error!(target: REMOTE_TARGET, $($arg)+),
        }
    };
}

/// Forwards events to the active `tracing` subscriber.
///
/// Tracing field names are fixed at compile time, so annotations travel as
/// one JSON object in the `fields` field. Under the JSON formatter that
/// object arrives as a string value and needs a second decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

fn render_fields(fields: &Fields) -> String {
    serde_json::to_string(fields).unwrap_or_else(|_| format!("{:?}", fields))
}

impl EventSink for TracingSink {
    fn emit(&self, severity: Severity, fields: Option<&Fields>, message: &str) {
        match fields {
            Some(fields) => {
                let fields = render_fields(fields);
                emit_at!(severity, fields = %fields, "{}", message)
            }
            None => emit_at!(severity, "{}", message),
        }
    }
}
