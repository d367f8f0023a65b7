//! Reference errors

use crate::tier::Tier;
use thiserror::Error;

/// Errors that can occur when reading a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefError {
    /// The payload is absent, and recovery (if any) produced nothing
    #[error("empty {tier} reference")]
    Empty {
        /// Tier of the reference that was read
        tier: Tier,
    },
}

/// Result type for reference operations
pub type Result<T> = std::result::Result<T, RefError>;
