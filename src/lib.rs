//! Semantic version range matching for shared module resolution
//!
//! - [`range`]: the range matcher ([`satisfies`])
//! - [`share`]: share scopes and the shared module loader built on it
//! - [`config`]: manifest and data directory configuration

pub mod config;
pub mod range;
pub mod share;

pub use range::{satisfies, try_satisfies};
