//!
//! Rankboard: score leaderboards over an ordered-set store.
//! This library maintains rankings of members by numeric score and answers rank,
//! pagination and "around me" queries as scores change.
//!
//! ## Core Concepts
//!
//! * **Leaderboards (`leaderboard::Leaderboard`)**: A named ranking. Each one is stored as a
//!   Score Index (member -> score) and, for dense ranking, a Rank Index of distinct scores.
//! * **Ranking modes (`leaderboard::RankingMode`)**: `Positional` gives every member its own
//!   rank; `Dense` gives tied members the same rank, advancing once per distinct score.
//! * **Backends (`backend::OrderedSetStore`)**: The storage boundary. A store provides ordered
//!   sets with positional queries and runs multi-key scripts atomically, which is what keeps
//!   the two indices consistent under concurrent upserts.
//! * **InMemory (`backend::database::InMemory`)**: An in-process store built on an
//!   order-statistic tree, suitable for tests and single-process deployments.

pub mod backend;
pub mod clock;
pub mod constants;
pub mod leaderboard;

pub use backend::database::InMemory;
pub use backend::{Order, OrderedSetStore, OrderedSetStoreExt, Score};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use leaderboard::{Cursor, Leaderboard, Member, Options, Page, RankingMode};

/// Result type used throughout the rankboard library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the rankboard library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured store errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured ranking errors from the leaderboard module
    #[error(transparent)]
    Leaderboard(leaderboard::LeaderboardError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Leaderboard(_) => "leaderboard",
        }
    }

    /// Check if this error indicates a member was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Leaderboard(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates the store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_unavailable(),
            _ => false,
        }
    }

    /// Check if this error is an atomic script losing to a concurrent writer.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_conflict(),
            _ => false,
        }
    }

    /// Check if the failed operation may succeed when retried as a whole.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if this error was caused by invalid input or configuration.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Leaderboard(err) => err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error was caused by a malformed store request.
    pub fn is_invalid_request(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_invalid_request(),
            _ => false,
        }
    }

    /// Check if this error indicates the stored indices disagree.
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Error::Leaderboard(err) => err.is_integrity_error(),
            _ => false,
        }
    }

    /// Check if this error is store-related.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}
