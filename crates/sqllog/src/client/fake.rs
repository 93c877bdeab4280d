//! Fake — in-memory doubles for the row source and the sinks.
//!
//! [`MemoryRowSource`] understands exactly the statements the table dumper
//! issues (bounded select, drop) against canned tables, and can be told to
//! fail at any step. [`RecordingSink`] and [`SharedBuffer`] capture what the
//! router emits. The binary also uses [`MemoryRowSource`] to serve fixture
//! tables loaded from JSON.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;

use crate::client::source::{Row, RowSet, RowSource, SourceError};
use crate::parser::{Fields, Value};
use crate::route::Severity;
use crate::sink::{Event, EventSink};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Row source ──────────────────────────────────────────────────

/// A canned table for the fake store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl FakeTable {
    pub fn new(columns: &[&str], rows: Vec<Row>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

/// Step at which the fake should report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeFailure {
    Query,
    Columns,
    /// Fail when fetching the row with this zero-based index
    ScanAt(usize),
    Close,
    Execute,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, FakeTable>,
    failures: HashSet<FakeFailure>,
    statements: Vec<String>,
}

/// In-memory row source keyed by table name.
#[derive(Default)]
pub struct MemoryRowSource {
    inner: Mutex<Inner>,
}

impl MemoryRowSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table.
    pub fn add_table(&self, name: &str, table: FakeTable) {
        lock(&self.inner).tables.insert(name.to_string(), table);
    }

    /// Make every later call reaching `failure` report an error.
    pub fn fail(&self, failure: FakeFailure) {
        lock(&self.inner).failures.insert(failure);
    }

    pub fn has_table(&self, name: &str) -> bool {
        lock(&self.inner).tables.contains_key(name)
    }

    /// Every statement received so far, queries and executes alike.
    pub fn statements(&self) -> Vec<String> {
        lock(&self.inner).statements.clone()
    }

    /// Load tables from a JSON object of
    /// `{ "name": { "columns": [...], "rows": [[...], ...] } }`.
    pub fn from_fixtures_json(json: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Fixture {
            columns: Vec<String>,
            #[serde(default)]
            rows: Vec<Vec<serde_json::Value>>,
        }

        let fixtures: HashMap<String, Fixture> = serde_json::from_str(json)?;
        let source = Self::new();
        for (name, fixture) in fixtures {
            let rows = fixture
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(json_cell).collect())
                .collect();
            source.add_table(&name, FakeTable { columns: fixture.columns, rows });
        }
        Ok(source)
    }
}

fn json_cell(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::String(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
            Ok(ts) => Value::Timestamp(ts.with_timezone(&chrono::Utc)),
            Err(_) => Value::Text(s),
        },
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Other(n.to_string()),
        },
        other => Value::Other(other.to_string()),
    }
}

fn unquote(name: &str) -> Option<String> {
    let inner = name.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.replace("]]", "]"))
}

/// `select top(N) * from [name] order by 1`
fn parse_select(sql: &str) -> Option<(usize, String)> {
    let rest = sql.strip_prefix("select top(")?;
    let (limit, rest) = rest.split_once(')')?;
    let name = rest.strip_prefix(" * from ")?.strip_suffix(" order by 1")?;
    Some((limit.parse().ok()?, unquote(name)?))
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Int(x)), Some(Value::Int(y))) => x.cmp(y),
        (Some(Value::Text(x)), Some(Value::Text(y))) => x.cmp(y),
        (Some(Value::Timestamp(x)), Some(Value::Timestamp(y))) => x.cmp(y),
        (Some(Value::Null), Some(Value::Null)) | (None, None) => Ordering::Equal,
        (None, _) | (Some(Value::Null), _) => Ordering::Less,
        (_, None) | (_, Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

struct MemoryRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Row>,
    next_index: usize,
    failures: HashSet<FakeFailure>,
}

impl RowSet for MemoryRows {
    fn columns(&self) -> Result<Vec<String>, SourceError> {
        if self.failures.contains(&FakeFailure::Columns) {
            return Err(SourceError::Columns("column metadata unavailable".into()));
        }
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Option<Result<Row, SourceError>> {
        let index = self.next_index;
        self.next_index += 1;
        if self.failures.contains(&FakeFailure::ScanAt(index)) {
            return Some(Err(SourceError::Scan(format!("conversion failed at row {}", index))));
        }
        self.rows.next().map(Ok)
    }

    fn close(&mut self) -> Result<(), SourceError> {
        if self.failures.contains(&FakeFailure::Close) {
            return Err(SourceError::Close("connection reset".into()));
        }
        Ok(())
    }
}

impl RowSource for MemoryRowSource {
    fn query(&self, sql: &str) -> Result<Box<dyn RowSet + '_>, SourceError> {
        let mut state = lock(&self.inner);
        state.statements.push(sql.to_string());

        if state.failures.contains(&FakeFailure::Query) {
            return Err(SourceError::Query("login timeout expired".into()));
        }
        let (limit, name) =
            parse_select(sql).ok_or_else(|| SourceError::Query(format!("unsupported statement: {}", sql)))?;
        let table = state
            .tables
            .get(&name)
            .ok_or_else(|| SourceError::Query(format!("Invalid object name '{}'.", name)))?;

        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| compare_cells(a.first(), b.first()));
        rows.truncate(limit);

        Ok(Box::new(MemoryRows {
            columns: table.columns.clone(),
            rows: rows.into_iter(),
            next_index: 0,
            failures: state.failures.clone(),
        }))
    }

    fn execute(&self, sql: &str) -> Result<u64, SourceError> {
        let mut state = lock(&self.inner);
        state.statements.push(sql.to_string());

        if state.failures.contains(&FakeFailure::Execute) {
            return Err(SourceError::Execute("permission denied".into()));
        }
        let name = sql
            .strip_prefix("drop table ")
            .and_then(unquote)
            .ok_or_else(|| SourceError::Execute(format!("unsupported statement: {}", sql)))?;
        match state.tables.remove(&name) {
            Some(_) => Ok(0),
            None => Err(SourceError::Execute(format!(
                "Cannot drop the table '{}', because it does not exist.",
                name
            ))),
        }
    }
}

// ── Sinks ───────────────────────────────────────────────────────

/// Structured sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, severity: Severity, fields: Option<&Fields>, message: &str) {
        lock(&self.events).push(Event {
            severity,
            fields: fields.cloned(),
            message: message.to_string(),
        });
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.bytes)).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.bytes).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
