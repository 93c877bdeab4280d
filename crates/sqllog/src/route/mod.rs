//! Route — classify remote messages by prefix and dispatch them.
//!
//! `severity.rs` owns the prefix grammar, `rewrite.rs` the single upstream
//! workaround, `fallback.rs` the unprefixed path and `router.rs` ties them
//! to the sinks and the table dumper.

pub mod severity;
pub mod rewrite;
pub mod fallback;
pub mod router;

pub use fallback::{Category, Fallback, StandardFallback};
pub use router::MessageRouter;
pub use severity::{classify, decode, split_prefix, Classification, DecodedMessage, Severity};
