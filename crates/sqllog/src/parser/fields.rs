//! Fields — extraction of leading `key=value` annotations from a message.
//!
//! Grammar per annotation: one or more letters, `=`, then a value chosen by
//! the character after `=`:
//!
//! - `[` starts a bracket string (`]]` escapes `]`)
//! - whitespace or end of input means a null value
//! - anything else must be a signed integer
//!
//! Annotations may be separated by any amount of whitespace, including none.
//! Extraction stops at the first position that does not parse as an
//! annotation; everything from there on is the message body, verbatim.

use unicode_general_category::{get_general_category, GeneralCategory};

use super::model::{Fields, Value};
use super::scan::Cursor;
use super::value::{int_value, string_value};

/// Key characters: Unicode letters (general categories Lu, Ll, Lt, Lm, Lo).
/// Letter numbers such as `Ⅻ` and combining marks are not letters.
fn is_key_char(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// One parsed `key=value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub key: String,
    pub value: Value,
}

/// Parse a single annotation at the cursor. On failure the caller keeps its
/// own cursor, which is exactly where the attempt started.
pub fn annotation(cur: Cursor<'_>) -> Option<(Annotation, Cursor<'_>)> {
    let rest = cur.rest();
    for (i, c) in rest.char_indices() {
        if is_key_char(c) {
            continue;
        }
        if c != '=' || i == 0 {
            return None;
        }

        let key = rest[..i].to_string();
        let after_eq = cur.advance(i + 1);
        let (value, next) = match after_eq.peek(0) {
            Some('[') => {
                let (s, next) = string_value(after_eq.advance(1))?;
                (Value::Text(s), next)
            }
            None => (Value::Null, after_eq),
            Some(c) if c.is_whitespace() => (Value::Null, after_eq),
            Some(_) => {
                let (n, next) = int_value(after_eq)?;
                (Value::Int(n), next)
            }
        };
        return Some((Annotation { key, value }, next));
    }
    // Ran out of input while still reading the key
    None
}

/// Split `input` into its leading annotations and the remaining message.
///
/// Returns `None` for the annotations when none were recognized (never an
/// empty map). Duplicate keys keep the last value.
pub fn extract(input: &str) -> (Option<Fields>, &str) {
    let mut fields: Option<Fields> = None;
    let mut cur = Cursor::new(input);

    loop {
        cur = cur.skip_whitespace();
        match annotation(cur) {
            Some((ann, next)) => {
                fields.get_or_insert_with(Fields::new).insert(ann.key, ann.value);
                cur = next;
            }
            None => return (fields, cur.rest()),
        }
    }
}
