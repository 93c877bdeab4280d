// Domain-driven module structure for the sqllog decoder.

// Decoding core
pub mod parser;
pub mod route;
pub mod dump;

// Collaborators
pub mod sink;
pub mod client;

// Binary support
pub mod conf;
pub mod runtime;

pub use route::{Category, Fallback, MessageRouter, Severity, StandardFallback};
pub use sink::{EventSink, TracingSink};
