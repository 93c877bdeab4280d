/// Inline annotation parsing
///
/// Remote messages may lead with `key=value` annotations before the free
/// text. This module turns them into typed [`Fields`] and hands back the
/// remaining message.
///
/// - `scan.rs`: copyable cursor over the input line
/// - `value.rs`: bracket-string and integer value grammars
/// - `fields.rs`: annotation and extraction loop
/// - `model.rs`: typed values and the field map

pub mod scan;
pub mod value;
pub mod fields;
pub mod model;

pub use fields::{extract, Annotation};
pub use model::{Fields, Value};
pub use scan::Cursor;
