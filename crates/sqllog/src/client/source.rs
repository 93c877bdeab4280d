use thiserror::Error;

use crate::parser::Value;

/// One fetched record, aligned with [`RowSet::columns`].
pub type Row = Vec<Value>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("reading columns failed: {0}")]
    Columns(String),
    #[error("scanning row failed: {0}")]
    Scan(String),
    #[error("closing rows failed: {0}")]
    Close(String),
    #[error("statement failed: {0}")]
    Execute(String),
}

/// Cursor over the result of a query.
pub trait RowSet {
    fn columns(&self) -> Result<Vec<String>, SourceError>;

    /// Next record, or `None` once the result is exhausted.
    fn next_row(&mut self) -> Option<Result<Row, SourceError>>;

    fn close(&mut self) -> Result<(), SourceError>;
}

/// Query/execute capability over a database connection.
///
/// Calls block the caller until the server answers. Implementations must be
/// `Send + Sync` so one source can be shared by independent routers.
pub trait RowSource: Send + Sync {
    fn query(&self, sql: &str) -> Result<Box<dyn RowSet + '_>, SourceError>;

    /// Run a statement, returning the affected row count.
    fn execute(&self, sql: &str) -> Result<u64, SourceError>;
}
