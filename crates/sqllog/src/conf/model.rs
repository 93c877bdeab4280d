//! Model — SqllogConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::route::{Category, Severity, StandardFallback};

use super::load::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqllogConfig {
    pub fallback: FallbackConfig,
    pub dump: DumpConfig,
    pub log_format: LogOutput,
    /// JSON file with tables served by the binary's in-memory row source
    pub fixtures_path: Option<String>,
}

/// How unprefixed messages are handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Category names that are logged; everything else is dropped
    pub mask: Vec<String>,
    pub level: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Maximum rows fetched from one artifact
    pub row_limit: usize,
    pub pretty: PrettyConfig,
}

/// Layout of tables written to the raw channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettyConfig {
    pub banner_char: char,
    pub banner_width: usize,
    /// Minimum cell width, padding included
    pub min_width: usize,
    /// Added to the widest cell of each column
    pub padding: usize,
    pub pad_char: char,
    pub name_separator: String,
    pub value_separator: String,
    /// Cells longer than this are cut; 0 disables truncation
    pub max_cell_width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOutput {
    Text,
    Json,
}

impl Default for SqllogConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackConfig::default(),
            dump: DumpConfig::default(),
            log_format: LogOutput::Text,
            fixtures_path: None,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            mask: vec!["errors".to_string()],
            level: Severity::Warning,
        }
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            row_limit: 1000,
            pretty: PrettyConfig::default(),
        }
    }
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            banner_char: '=',
            banner_width: 32,
            min_width: 0,
            padding: 4,
            pad_char: ' ',
            name_separator: "-".repeat(16),
            value_separator: "-".repeat(12),
            max_cell_width: 0,
        }
    }
}

impl FallbackConfig {
    pub fn category_mask(&self) -> Result<Category, ConfigError> {
        self.mask.iter().try_fold(Category::empty(), |acc, name| {
            Category::from_lowercase_name(name)
                .map(|c| acc | c)
                .ok_or_else(|| ConfigError::Invalid(format!("fallback.mask: unknown category '{}'", name)))
        })
    }

    pub fn to_fallback(&self) -> Result<StandardFallback, ConfigError> {
        Ok(StandardFallback {
            mask: self.category_mask()?,
            level: self.level,
        })
    }
}

impl SqllogConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dump.row_limit == 0 {
            return Err(ConfigError::Invalid("dump.row_limit must be > 0".to_string()));
        }
        if self.dump.pretty.banner_width == 0 {
            return Err(ConfigError::Invalid("dump.pretty.banner_width must be > 0".to_string()));
        }
        self.fallback.category_mask()?;
        Ok(())
    }
}
