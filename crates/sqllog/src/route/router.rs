//! Router — the log callback installed into the database driver.
//!
//! Each call is handled synchronously and exactly once:
//!
//! 1. a RAISERROR format failure is rewritten into an `error:` message
//! 2. `debug:`/`info:`/`warning:`/`error:` messages have their annotations
//!    extracted and go to the structured sink
//! 3. `stderr:` messages go to the raw channel untouched
//! 4. anything else goes to the fallback handler, unmodified
//!
//! When the body left after annotation extraction names a temporary table
//! and a row source is attached, the table is dumped instead of logging the
//! body, and dropped afterwards.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::trace;

use crate::client::RowSource;
use crate::conf::DumpConfig;
use crate::dump::{self, ArtifactName};
use crate::sink::EventSink;

use super::fallback::{Category, Fallback, StandardFallback};
use super::rewrite::rewrite_upstream;
use super::severity::{decode, DecodedMessage};

pub struct MessageRouter {
    sink: Arc<dyn EventSink>,
    raw: Box<dyn Write + Send>,
    rows: Option<Arc<dyn RowSource>>,
    fallback: Box<dyn Fallback>,
    dump: DumpConfig,
}

impl MessageRouter {
    /// Router with stderr as raw channel, the standard fallback and no row
    /// source (table names are then logged as plain text).
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            raw: Box::new(io::stderr()),
            rows: None,
            fallback: Box::new(StandardFallback::default()),
            dump: DumpConfig::default(),
        }
    }

    pub fn with_raw_channel<W: Write + Send + 'static>(mut self, raw: W) -> Self {
        self.raw = Box::new(raw);
        self
    }

    pub fn with_row_source(mut self, rows: Arc<dyn RowSource>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_fallback<F: Fallback + 'static>(mut self, fallback: F) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn with_dump_config(mut self, dump: DumpConfig) -> Self {
        self.dump = dump;
        self
    }

    /// Route one message from the server's log channel.
    pub fn log(&mut self, category: Category, msg: &str) {
        let msg = rewrite_upstream(msg);

        match decode(&msg) {
            DecodedMessage::Structured { severity, fields, body } => {
                trace!(target: "sqllog::route", severity = severity.as_str(), "structured message");
                if let Some((rows, table)) = self.artifact(body) {
                    dump::dump_structured(
                        rows.as_ref(),
                        self.sink.as_ref(),
                        severity,
                        &table,
                        fields.as_ref(),
                        self.dump.row_limit,
                    );
                    dump::drop_artifact(rows.as_ref(), &table);
                } else {
                    self.sink.emit(severity, fields.as_ref(), body);
                }
            }
            DecodedMessage::Raw { text, body } => {
                trace!(target: "sqllog::route", "raw channel message");
                if let Some((rows, table)) = self.artifact(body) {
                    dump::dump_pretty(rows.as_ref(), self.raw.as_mut(), &table, &self.dump);
                    dump::drop_artifact(rows.as_ref(), &table);
                } else if let Err(e) = writeln!(self.raw, "{}", text).and_then(|_| self.raw.flush()) {
                    tracing::debug!(target: "sqllog::route", error = %e, "raw channel write failed");
                }
            }
            DecodedMessage::Unrecognized => {
                trace!(target: "sqllog::route", category = category.bits(), "fallback");
                self.fallback.log(self.sink.as_ref(), category, &msg);
            }
        }
    }

    /// Row source and validated table name, when `body` is a dumpable table.
    fn artifact(&self, body: &str) -> Option<(Arc<dyn RowSource>, ArtifactName)> {
        let table = ArtifactName::parse(body)?;
        match &self.rows {
            Some(rows) => {
                trace!(target: "sqllog::route", table = %table, "dumping artifact");
                Some((Arc::clone(rows), table))
            }
            None => None,
        }
    }
}
