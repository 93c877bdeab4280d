//! Rewrite — workaround for one class of malformed upstream messages.
//!
//! A `RAISERROR` whose message text contains a stray `%` is rejected by the
//! server, which then reports its own format error instead of the intended
//! message. Those reports carry no `level:` prefix and would land in the
//! fallback path; we promote them to error-level events instead.

use std::borrow::Cow;

/// Server texts for RAISERROR format failures (errors 2786 and 2787).
const RAISERROR_FORMAT_SIGNATURES: &[&str] = &[
    "Invalid format specification: '",
    "The data type of substitution parameter ",
];

pub const REWRITE_PREFIX: &str = "error:Malformed log message (RAISERROR format error): ";

pub fn rewrite_upstream(msg: &str) -> Cow<'_, str> {
    if RAISERROR_FORMAT_SIGNATURES.iter().any(|sig| msg.starts_with(sig)) {
        tracing::debug!(target: "sqllog::route", "rewriting RAISERROR format error");
        Cow::Owned(format!("{}{}", REWRITE_PREFIX, msg))
    } else {
        Cow::Borrowed(msg)
    }
}
