//! Error types for the merge engine.

use crate::record::{Side, ValueKind};
use thiserror::Error;

/// All possible errors from the merge engine.
///
/// Unparseable timestamps are not errors: they resolve to
/// [`Recency::Unknown`](crate::Recency::Unknown) and take part in the
/// comparison like any other input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {side} record must be an object, got {found}")]
    InvalidArgument { side: Side, found: ValueKind },
}

impl Error {
    /// Which input was rejected.
    pub fn side(&self) -> Side {
        match self {
            Error::InvalidArgument { side, .. } => *side,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
