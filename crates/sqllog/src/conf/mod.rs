//! Conf module — configuration model and loading.

pub mod model;
pub mod load;

pub use load::{ConfigError, ConfigSource};
pub use model::{DumpConfig, FallbackConfig, LogOutput, PrettyConfig, SqllogConfig};
