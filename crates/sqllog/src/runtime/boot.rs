//! Boot — config load, logging init, router construction.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::fake::MemoryRowSource;
use crate::conf::{LogOutput, SqllogConfig};
use crate::route::MessageRouter;
use crate::sink::TracingSink;

/// Initialise the tracing / logging subsystem.
pub fn init_logging(format: LogOutput) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "sqllog=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogOutput::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogOutput::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Build a router from configuration: tracing sink, stderr raw channel,
/// configured fallback, and the fixture row source when one is set.
pub fn build_router(config: &SqllogConfig) -> Result<MessageRouter, Box<dyn std::error::Error>> {
    let mut router = MessageRouter::new(Arc::new(TracingSink::new()))
        .with_fallback(config.fallback.to_fallback()?)
        .with_dump_config(config.dump.clone());

    if let Some(path) = &config.fixtures_path {
        let json = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read fixtures from {}: {}", path, e);
            e
        })?;
        let source = MemoryRowSource::from_fixtures_json(&json)?;
        info!("Serving artifacts from fixtures: {}", path);
        router = router.with_row_source(Arc::new(source));
    }

    Ok(router)
}

/// Load config, initialise logging and build the router.
pub fn boot() -> Result<(MessageRouter, SqllogConfig), Box<dyn std::error::Error>> {
    let (config, source) = SqllogConfig::load()?;
    init_logging(config.log_format);

    info!("Starting sqllog v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", source);
    info!(
        "Fallback: mask={:?}, level={}; dump row limit: {}",
        config.fallback.mask,
        config.fallback.level.as_str(),
        config.dump.row_limit
    );

    let router = build_router(&config)?;
    Ok((router, config))
}
