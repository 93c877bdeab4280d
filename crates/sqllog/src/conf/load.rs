//! Load — config loading from file and environment variables.

use std::path::Path;

use thiserror::Error;

use crate::route::Severity;

use super::model::{LogOutput, SqllogConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("parsing config file {0}: {1}")]
    Toml(String, #[source] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the effective configuration was read from. Loading runs before
/// logging is initialised, so the caller reports this once it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    Defaults { missing: String },
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "Loaded configuration from: {}", path),
            ConfigSource::Defaults { missing } => write!(f, "Config file not found at {}, using defaults", missing),
        }
    }
}

impl SqllogConfig {
    /// Load configuration from file, then apply environment overrides.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let config_path = std::env::var("SQLLOG_CONFIG_FILE").unwrap_or_else(|_| "sqllog.toml".to_string());
        Self::load_from(&config_path, |key| std::env::var(key).ok())
    }

    /// Load from `config_path` when it exists, then apply overrides from `lookup`.
    pub fn load_from<F>(config_path: &str, lookup: F) -> Result<(Self, ConfigSource), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, source) = if Path::new(config_path).exists() {
            (Self::from_file(config_path)?, ConfigSource::File(config_path.to_string()))
        } else {
            (Self::default(), ConfigSource::Defaults { missing: config_path.to_string() })
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok((config, source))
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_string(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Toml(path.to_string(), e))
    }

    /// Apply `SQLLOG_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SQLLOG_FALLBACK_LEVEL") {
            self.fallback.level = Severity::from_prefix(&level)
                .ok_or_else(|| ConfigError::Invalid(format!("SQLLOG_FALLBACK_LEVEL: unknown level '{}'", level)))?;
        }
        if let Some(limit) = lookup("SQLLOG_ROW_LIMIT") {
            self.dump.row_limit = limit
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("SQLLOG_ROW_LIMIT: not a number '{}'", limit)))?;
        }
        if let Some(format) = lookup("SQLLOG_LOG_FORMAT") {
            self.log_format = match format.as_str() {
                "text" => LogOutput::Text,
                "json" => LogOutput::Json,
                other => {
                    return Err(ConfigError::Invalid(format!("SQLLOG_LOG_FORMAT: unknown format '{}'", other)))
                }
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_overrides_applied() {
        let vars = env(&[
            ("SQLLOG_FALLBACK_LEVEL", "info"),
            ("SQLLOG_ROW_LIMIT", "10"),
            ("SQLLOG_LOG_FORMAT", "json"),
        ]);
        let mut cfg = SqllogConfig::default();
        cfg.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(cfg.fallback.level, Severity::Info);
        assert_eq!(cfg.dump.row_limit, 10);
        assert_eq!(cfg.log_format, LogOutput::Json);
    }

    #[test]
    fn test_no_overrides_keeps_values() {
        let mut cfg = SqllogConfig::default();
        cfg.apply_overrides(|_| None).unwrap();
        assert_eq!(cfg.dump.row_limit, 1000);
        assert_eq!(cfg.fallback.level, Severity::Warning);
    }

    #[test]
    fn test_bad_override_rejected() {
        let vars = env(&[("SQLLOG_ROW_LIMIT", "lots")]);
        let mut cfg = SqllogConfig::default();
        let err = cfg.apply_overrides(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let vars = env(&[("SQLLOG_FALLBACK_LEVEL", "fatal")]);
        assert!(cfg.apply_overrides(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = SqllogConfig::from_file("/nonexistent/sqllog.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("sqllog-conf-{}.toml", std::process::id()));
        std::fs::write(&path, "[dump]\nrow_limit = 5\n").unwrap();
        let cfg = SqllogConfig::from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.dump.row_limit, 5);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let vars = env(&[("SQLLOG_ROW_LIMIT", "7")]);
        let (cfg, source) = SqllogConfig::load_from("/nonexistent/sqllog.toml", |k| vars.get(k).cloned()).unwrap();

        assert_eq!(cfg.dump.row_limit, 7);
        assert_eq!(source, ConfigSource::Defaults { missing: "/nonexistent/sqllog.toml".into() });
        assert_eq!(source.to_string(), "Config file not found at /nonexistent/sqllog.toml, using defaults");
    }

    #[test]
    fn test_load_from_file_reports_source() {
        let path = std::env::temp_dir().join(format!("sqllog-load-{}.toml", std::process::id()));
        std::fs::write(&path, "log_format = \"json\"\n").unwrap();
        let path = path.to_str().unwrap().to_string();

        let result = SqllogConfig::load_from(&path, |_| None);
        std::fs::remove_file(&path).ok();
        let (cfg, source) = result.unwrap();

        assert_eq!(cfg.log_format, LogOutput::Json);
        assert_eq!(source, ConfigSource::File(path));
    }
}
