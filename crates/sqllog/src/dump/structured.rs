use crate::client::{RowSet, RowSource};
use crate::parser::Fields;
use crate::route::Severity;
use crate::sink::EventSink;

use super::artifact::ArtifactName;

/// Emit one event per row of `table` at `severity`, with an empty message
/// and the row's columns as fields on top of `context`.
///
/// Row-source failures become a single warning and end the dump; rows
/// already emitted stay emitted.
pub fn dump_structured(
    source: &dyn RowSource,
    sink: &dyn EventSink,
    severity: Severity,
    table: &ArtifactName,
    context: Option<&Fields>,
    row_limit: usize,
) {
    let mut rows = match source.query(&table.select_sql(row_limit)) {
        Ok(rows) => rows,
        Err(e) => {
            sink.emit(Severity::Warning, context, &format!("Unable to log table {}: {}", table, e));
            return;
        }
    };

    emit_rows(rows.as_mut(), sink, severity, table, context);

    if let Err(e) = rows.close() {
        sink.emit(
            Severity::Warning,
            context,
            &format!("Problem closing rows when logging table {}: {}", table, e),
        );
    }
}

fn emit_rows(
    rows: &mut dyn RowSet,
    sink: &dyn EventSink,
    severity: Severity,
    table: &ArtifactName,
    context: Option<&Fields>,
) {
    let columns = match rows.columns() {
        Ok(columns) => columns,
        Err(e) => {
            sink.emit(
                Severity::Warning,
                context,
                &format!("Problem reading columns when logging table {}: {}", table, e),
            );
            return;
        }
    };

    let mut emitted = 0usize;
    while let Some(row) = rows.next_row() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                sink.emit(
                    Severity::Warning,
                    context,
                    &format!("Problem in scanning rows when logging table {}: {}", table, e),
                );
                return;
            }
        };

        let mut fields = context.cloned().unwrap_or_default();
        fields.extend(columns.iter().cloned().zip(row));
        sink.emit(severity, Some(&fields), "");
        emitted += 1;
    }
    tracing::debug!(target: "sqllog::dump", table = %table, rows = emitted, "structured dump complete");
}
