//! # Foundation Error Types
//!
//! All errors that can be surfaced by the ring buffer and the resource pool.
//! The event bus has no failure modes.

use std::fmt;

use thiserror::Error;

/// Errors that can occur in the foundation primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FoundationError {
    /// Invalid static setup: non-positive capacity, malformed descriptor list,
    /// or a pool configured twice.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Positional access outside the valid logical range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of elements at the time of the call.
        len: usize,
    },

    /// Pop on an empty ring buffer.
    #[error("ring buffer is empty")]
    Empty,

    /// Identifier has no matching pool descriptor.
    #[error("no pool descriptor configured for '{0}'")]
    NotConfigured(String),

    /// Pool-only acquisition found no available instance.
    #[error("no pooled instance available for '{0}'")]
    NotAvailable(String),
}

/// Result type for foundation operations.
pub type FoundationResult<T> = Result<T, FoundationError>;

/// An instance the pool refused to take back.
///
/// Ownership of the instance returns to the caller, who is expected to
/// destroy it outside the pool.
#[derive(Error)]
#[error("instance rejected by pool: {error}")]
pub struct Rejected<T> {
    /// The refused instance.
    pub instance: T,
    /// Why it was refused.
    #[source]
    pub error: FoundationError,
}

impl<T> Rejected<T> {
    /// Gives the instance back, discarding the error.
    pub fn into_instance(self) -> T {
        self.instance
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
