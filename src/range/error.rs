use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),

    #[error("Invalid comparator {comparator:?} in range {range:?}")]
    InvalidComparator { comparator: String, range: String },
}
