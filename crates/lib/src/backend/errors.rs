//! Error types for the ordered-set backend.
//!
//! This module defines structured error types for store operations. The
//! leaderboard never retries or rewrites these; they reach the caller as-is.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store could not be reached or is in an unusable state.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Description of the transport or state failure
        reason: String,
    },

    /// An atomic script could not complete because of a concurrent writer.
    ///
    /// Nothing the script wrote is visible. Retrying the whole operation is safe.
    #[error("Transaction conflict: {reason}")]
    TransactionConflict {
        /// Description of the conflict
        reason: String,
    },

    /// A position range was requested with start after stop.
    #[error("Invalid position range {start}..={stop} on key {key}")]
    InvalidRange {
        /// The key being queried
        key: String,
        /// First position requested
        start: usize,
        /// Last position requested
        stop: usize,
    },

    /// A score range was requested with the lower bound above the upper bound.
    #[error("Invalid score range [{lo}, {hi}] on key {key}")]
    InvalidScoreRange {
        /// The key being queried
        key: String,
        /// Lower bound
        lo: i64,
        /// Upper bound
        hi: i64,
    },
}

impl BackendError {
    /// Check if this error indicates the store is unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }

    /// Check if this error is a transaction conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BackendError::TransactionConflict { .. })
    }

    /// Check if retrying the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::TransactionConflict { .. } | BackendError::Unavailable { .. }
        )
    }

    /// Check if this error was caused by a malformed request.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            BackendError::InvalidRange { .. } | BackendError::InvalidScoreRange { .. }
        )
    }

    /// Get the store key if this error is about a specific key.
    pub fn key(&self) -> Option<&str> {
        match self {
            BackendError::InvalidRange { key, .. } | BackendError::InvalidScoreRange { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
