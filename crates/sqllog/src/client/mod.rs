//! Client — database access used by the table dumper.
//!
//! `source.rs` defines the narrow capability the dumper needs.
//! `fake.rs` provides in-memory doubles for it and for the sinks.

pub mod source;
pub mod fake;

pub use source::{Row, RowSet, RowSource, SourceError};
