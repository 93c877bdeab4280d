//! Value grammars for inline annotations.

use super::scan::Cursor;

/// Bracket-string value. The cursor must sit just past the opening `[`.
///
/// `]]` is an escaped literal `]`; the first single `]` terminates the value
/// and the returned cursor sits just past it. `None` when the input ends
/// before an unescaped terminator.
pub fn string_value(cur: Cursor<'_>) -> Option<(String, Cursor<'_>)> {
    let rest = cur.rest();
    // `]` is ASCII so it can never match a UTF-8 continuation byte
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b']' {
            if bytes.get(i + 1) == Some(&b']') {
                i += 2;
                continue;
            }
            let value = rest[..i].replace("]]", "]");
            return Some((value, cur.advance(i + 1)));
        }
        i += 1;
    }
    None
}

/// Signed decimal integer terminated by whitespace or end of input.
///
/// A sign is only accepted as the very first character. Anything else that is
/// not a digit fails the parse, as does a value outside the `i64` range.
pub fn int_value(cur: Cursor<'_>) -> Option<(i64, Cursor<'_>)> {
    let rest = cur.rest();
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => {}
            c if c.is_whitespace() => {
                end = i;
                break;
            }
            _ => return None,
        }
    }
    let value = rest[..end].parse::<i64>().ok()?;
    Some((value, cur.advance(end)))
}
