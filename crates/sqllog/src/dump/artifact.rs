//! Artifact — names of server-side temporary tables that may be dumped.
//!
//! A message body only becomes a query if it passes [`ArtifactName::parse`].
//! Query text is built exclusively from validated names.

use std::fmt;

/// Global temporary table marker.
pub const ARTIFACT_MARKER: &str = "##";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// `##` followed by one or more ASCII letters, digits or underscores.
    /// Nothing else, not even surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let ident = text.strip_prefix(ARTIFACT_MARKER)?;
        if ident.is_empty() || !ident.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        Some(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bracket-quoted identifier, `]` doubled.
    pub fn quoted(&self) -> String {
        format!("[{}]", self.0.replace(']', "]]"))
    }

    pub fn select_sql(&self, row_limit: usize) -> String {
        format!("select top({}) * from {} order by 1", row_limit, self.quoted())
    }

    pub fn drop_sql(&self) -> String {
        format!("drop table {}", self.quoted())
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        for name in ["##t", "##log_rows", "##A1_b2", "##123"] {
            assert!(ArtifactName::parse(name).is_some(), "name: {:?}", name);
        }
    }

    #[test]
    fn test_parse_rejects() {
        let names = [
            "",
            "##",
            "#t",
            "t",
            "## t",
            "##t ",
            " ##t",
            "##t]; drop table users; --",
            "##t-1",
            "##tä",
            "##t\n",
            "hello world",
        ];
        for name in names {
            assert!(ArtifactName::parse(name).is_none(), "name: {:?}", name);
        }
    }

    #[test]
    fn test_sql_text() {
        let name = ArtifactName::parse("##rows").unwrap();
        assert_eq!(name.select_sql(1000), "select top(1000) * from [##rows] order by 1");
        assert_eq!(name.drop_sql(), "drop table [##rows]");
    }

    #[test]
    fn test_quoting_doubles_closing_bracket() {
        // Not reachable through parse; exercises the quoting rule itself
        let name = ArtifactName("##a]b".to_string());
        assert_eq!(name.quoted(), "[##a]]b]");
    }
}
