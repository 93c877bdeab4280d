//! Runtime — startup and the stdin pump used by the `sqllog` binary.

pub mod boot;
pub mod pipe;
