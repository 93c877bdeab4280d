use serde::{Deserialize, Serialize};

use crate::parser::{self, Fields};

/// Levels a remote message may request with a `level:` prefix.
///
/// Closed at `Error`: nothing coming over the log channel may escalate to a
/// process-fatal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Exact, case-sensitive prefix lookup.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "debug" => Some(Severity::Debug),
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

/// Where a message goes, decided by its prefix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Level(Severity),
    /// `stderr:` prefix, bypasses the structured sink
    RawChannel,
    /// No prefix, or one we do not know
    Unrecognized,
}

pub const RAW_CHANNEL_PREFIX: &str = "stderr";

pub fn classify(prefix: Option<&str>) -> Classification {
    match prefix {
        Some(RAW_CHANNEL_PREFIX) => Classification::RawChannel,
        Some(p) => Severity::from_prefix(p).map_or(Classification::Unrecognized, Classification::Level),
        None => Classification::Unrecognized,
    }
}

/// Split at the first `:`. Without one there is no prefix and the whole
/// message is the body.
pub fn split_prefix(msg: &str) -> (Option<&str>, &str) {
    match msg.split_once(':') {
        Some((prefix, rest)) => (Some(prefix), rest),
        None => (None, msg),
    }
}

/// A message after classification and annotation extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage<'a> {
    Structured {
        severity: Severity,
        fields: Option<Fields>,
        body: &'a str,
    },
    /// `text` is everything after `stderr:`; `body` is what is left of it
    /// once annotations are stripped.
    Raw { text: &'a str, body: &'a str },
    Unrecognized,
}

pub fn decode(msg: &str) -> DecodedMessage<'_> {
    let (prefix, rest) = split_prefix(msg);
    match classify(prefix) {
        Classification::Level(severity) => {
            let (fields, body) = parser::extract(rest);
            DecodedMessage::Structured { severity, fields, body }
        }
        Classification::RawChannel => {
            let (_, body) = parser::extract(rest);
            DecodedMessage::Raw { text: rest, body }
        }
        Classification::Unrecognized => DecodedMessage::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Value;

    #[test]
    fn test_classify_known_prefixes() {
        assert_eq!(classify(Some("debug")), Classification::Level(Severity::Debug));
        assert_eq!(classify(Some("info")), Classification::Level(Severity::Info));
        assert_eq!(classify(Some("warning")), Classification::Level(Severity::Warning));
        assert_eq!(classify(Some("error")), Classification::Level(Severity::Error));
        assert_eq!(classify(Some("stderr")), Classification::RawChannel);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        for prefix in ["INFO", "Error", "warn", "fatal", "panic", "", " info"] {
            assert_eq!(classify(Some(prefix)), Classification::Unrecognized, "prefix: {:?}", prefix);
        }
        assert_eq!(classify(None), Classification::Unrecognized);
    }

    #[test]
    fn test_split_prefix_first_colon_only() {
        assert_eq!(split_prefix("info:a:b"), (Some("info"), "a:b"));
        assert_eq!(split_prefix("no colon"), (None, "no colon"));
        assert_eq!(split_prefix(":x"), (Some(""), "x"));
    }

    #[test]
    fn test_decode_structured() {
        let decoded = decode("info:  a=1  b=[x]  hello");
        let mut fields = Fields::new();
        fields.insert("a".into(), Value::Int(1));
        fields.insert("b".into(), Value::from("x"));
        assert_eq!(
            decoded,
            DecodedMessage::Structured { severity: Severity::Info, fields: Some(fields), body: "hello" }
        );
    }

    #[test]
    fn test_decode_raw_keeps_text() {
        assert_eq!(
            decode("stderr: a=1 b=[s] test"),
            DecodedMessage::Raw { text: " a=1 b=[s] test", body: "test" }
        );
    }

    #[test]
    fn test_decode_unrecognized() {
        assert_eq!(decode("plain message"), DecodedMessage::Unrecognized);
        assert_eq!(decode("Msg 50000: oops"), DecodedMessage::Unrecognized);
    }
}
