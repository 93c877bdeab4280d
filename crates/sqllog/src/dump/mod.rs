//! Dump — materialize a temporary table named in a message, then drop it.
//!
//! - `artifact.rs`: name validation and the statements built from it
//! - `structured.rs`: one structured event per row
//! - `pretty.rs`: aligned text table for the raw channel

pub mod artifact;
pub mod structured;
pub mod pretty;

pub use artifact::ArtifactName;
pub use pretty::{dump_pretty, TableWriter};
pub use structured::dump_structured;

use crate::client::RowSource;

/// Best-effort `drop table`. Failures are not reported to any sink.
pub fn drop_artifact(source: &dyn RowSource, table: &ArtifactName) {
    if let Err(e) = source.execute(&table.drop_sql()) {
        tracing::debug!(target: "sqllog::dump", table = %table, error = %e, "dropping artifact failed");
    }
}
