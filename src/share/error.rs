use thiserror::Error;

use crate::range::RangeError;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Shared module not found: {0}")]
    NotFound(String),

    #[error("No satisfying shared version of {name} and local fallback is disabled")]
    NoFallback { name: String },

    #[error("Invalid version {version:?} registered for {name}: {source}")]
    InvalidVersion {
        name: String,
        version: String,
        #[source]
        source: RangeError,
    },

    #[error("Failed to load shared module {name}: {message}")]
    Load { name: String, message: String },
}
