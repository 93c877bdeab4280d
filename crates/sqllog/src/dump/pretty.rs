//! Pretty — human-readable table dump for the raw channel.
//!
//! Output shape with default settings:
//!
//! ```text
//! ================================
//! ##rows
//! ================================
//! id                  1               
//! msg                 "hello"         
//! ----------------    ------------    
//! ```
//!
//! Cells are buffered and aligned over the whole table, then written in one
//! go when the table is complete (or a row-source error cuts it short).

use std::io::{self, Write};

use crate::client::{RowSet, RowSource};
use crate::conf::{DumpConfig, PrettyConfig};
use crate::parser::Value;

use super::artifact::ArtifactName;

/// Buffers tab-separated cells and pads every column to its widest cell
/// plus `padding`.
pub struct TableWriter<'a> {
    config: &'a PrettyConfig,
    lines: Vec<Vec<String>>,
}

impl<'a> TableWriter<'a> {
    pub fn new(config: &'a PrettyConfig) -> Self {
        Self { config, lines: Vec::new() }
    }

    pub fn push(&mut self, cells: Vec<String>) {
        let max = self.config.max_cell_width;
        let cells = cells
            .into_iter()
            .map(|c| if max > 0 && c.chars().count() > max { c.chars().take(max).collect() } else { c })
            .collect();
        self.lines.push(cells);
    }

    /// Write all buffered lines and clear the buffer.
    pub fn flush_to(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let mut widths: Vec<usize> = Vec::new();
        for line in &self.lines {
            for (i, cell) in line.iter().enumerate() {
                let width = (cell.chars().count() + self.config.padding).max(self.config.min_width);
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        let pad = self.config.pad_char.to_string();
        for line in self.lines.drain(..) {
            let mut text = String::new();
            for (cell, width) in line.iter().zip(&widths) {
                text.push_str(cell);
                text.push_str(&pad.repeat(width.saturating_sub(cell.chars().count())));
            }
            writeln!(out, "{}", text)?;
        }
        Ok(())
    }
}

/// Text cells are quoted and escaped so whitespace and control characters
/// stay visible.
fn display_cell(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

/// Write `table` to `out` as a banner followed by one block per row.
///
/// Row-source errors are printed in place of the remaining rows. Write
/// errors on `out` abort the dump silently apart from a debug log.
pub fn dump_pretty(source: &dyn RowSource, out: &mut dyn Write, table: &ArtifactName, config: &DumpConfig) {
    if let Err(e) = write_table(source, out, table, config) {
        tracing::debug!(target: "sqllog::dump", table = %table, error = %e, "raw channel write failed");
    }
}

fn write_table(
    source: &dyn RowSource,
    out: &mut dyn Write,
    table: &ArtifactName,
    config: &DumpConfig,
) -> io::Result<()> {
    let banner = config.pretty.banner_char.to_string().repeat(config.pretty.banner_width);
    writeln!(out, "{}", banner)?;
    writeln!(out, "{}", table)?;
    writeln!(out, "{}", banner)?;

    let mut rows = match source.query(&table.select_sql(config.row_limit)) {
        Ok(rows) => rows,
        Err(e) => {
            writeln!(out, "{}", e)?;
            return out.flush();
        }
    };

    let mut tw = TableWriter::new(&config.pretty);
    let result = write_rows(rows.as_mut(), &mut tw, out, &config.pretty);
    if let Err(e) = rows.close() {
        writeln!(out, "{}", e)?;
    }
    result?;
    out.flush()
}

fn write_rows(
    rows: &mut dyn RowSet,
    tw: &mut TableWriter<'_>,
    out: &mut dyn Write,
    config: &PrettyConfig,
) -> io::Result<()> {
    let columns = match rows.columns() {
        Ok(columns) => columns,
        Err(e) => return writeln!(out, "{}", e),
    };

    while let Some(row) = rows.next_row() {
        match row {
            Ok(row) => {
                for (name, value) in columns.iter().zip(&row) {
                    tw.push(vec![name.clone(), display_cell(value)]);
                }
                tw.push(vec![config.name_separator.clone(), config.value_separator.clone()]);
            }
            Err(e) => {
                tw.flush_to(out)?;
                return writeln!(out, "{}", e);
            }
        }
    }
    tw.flush_to(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeFailure, FakeTable, MemoryRowSource, SharedBuffer};
    use chrono::{TimeZone, Utc};

    const BANNER: &str = "================================";

    fn source() -> MemoryRowSource {
        let source = MemoryRowSource::new();
        source.add_table(
            "##rows",
            FakeTable::new(
                &["id", "msg"],
                vec![
                    vec![Value::Int(2), Value::from("b\tc")],
                    vec![Value::Int(1), Value::from("hello")],
                ],
            ),
        );
        source
    }

    fn dump(source: &MemoryRowSource, config: &DumpConfig) -> String {
        let mut buf = SharedBuffer::new();
        dump_pretty(source, &mut buf, &ArtifactName::parse("##rows").unwrap(), config);
        buf.contents()
    }

    // ── Layout ───────────────────────────────────────────────────

    #[test]
    fn test_banner_and_rows() {
        let out = dump(&source(), &DumpConfig::default());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], BANNER);
        assert_eq!(lines[1], "##rows");
        assert_eq!(lines[2], BANNER);
        // Column widths: 16 dashes + 4, 12 dashes + 4
        assert_eq!(lines[3], format!("{:<20}{:<16}", "id", "1"));
        assert_eq!(lines[4], format!("{:<20}{:<16}", "msg", "\"hello\""));
        assert_eq!(lines[5], format!("{:<20}{:<16}", "-".repeat(16), "-".repeat(12)));
        assert_eq!(lines[6], format!("{:<20}{:<16}", "id", "2"));
        assert_eq!(lines[7], format!("{:<20}{:<16}", "msg", "\"b\\tc\""));
        assert_eq!(lines.len(), 9);
        assert!(!lines[8].starts_with('='), "no trailing banner");
    }

    #[test]
    fn test_custom_layout() {
        let mut config = DumpConfig::default();
        config.pretty.banner_char = '#';
        config.pretty.banner_width = 4;
        config.pretty.padding = 1;
        config.pretty.name_separator = "--".into();
        config.pretty.value_separator = "--".into();
        config.row_limit = 1;

        let out = dump(&source(), &config);
        assert_eq!(out, "####\n##rows\n####\nid  1       \nmsg \"hello\" \n--  --      \n");
    }

    #[test]
    fn test_truncation() {
        let mut tw_config = PrettyConfig::default();
        tw_config.max_cell_width = 3;
        tw_config.padding = 1;
        let mut tw = TableWriter::new(&tw_config);
        tw.push(vec!["abcdef".into(), "x".into()]);
        let mut out = Vec::new();
        tw.flush_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abc x \n");

        let mut again = Vec::new();
        tw.flush_to(&mut again).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_display_cell() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(display_cell(&Value::from("a\"b")), "\"a\\\"b\"");
        assert_eq!(display_cell(&Value::Int(5)), "5");
        assert_eq!(display_cell(&Value::Timestamp(ts)), "2000-01-01T00:00:00Z");
        assert_eq!(display_cell(&Value::Null), "NULL");
    }

    // ── Failures ─────────────────────────────────────────────────

    #[test]
    fn test_query_failure_printed_after_banner() {
        let source = source();
        source.fail(FakeFailure::Query);
        let out = dump(&source, &DumpConfig::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("query failed"), "{}", lines[3]);
    }

    #[test]
    fn test_scan_failure_keeps_written_rows() {
        let source = source();
        source.fail(FakeFailure::ScanAt(1));
        let out = dump(&source, &DumpConfig::default());
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[3].starts_with("id"));
        assert!(lines[5].starts_with("----------------"));
        assert!(lines[6].starts_with("scanning row failed"), "{}", out);
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_columns_failure_printed() {
        let source = source();
        source.fail(FakeFailure::Columns);
        let out = dump(&source, &DumpConfig::default());
        assert!(out.lines().last().unwrap().starts_with("reading columns failed"), "{}", out);
    }
}
