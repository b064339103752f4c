//! Leaderboard specific errors
//!
//! Errors raised by the ranking engine itself. Failures of the backing store
//! are not wrapped here; they reach the caller as `crate::Error::Backend`.

use thiserror::Error;

use crate::backend::Score;

/// Errors that can occur during leaderboard operations
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The queried member has no score on this leaderboard.
    #[error("Member '{member}' not found on leaderboard '{leaderboard}'")]
    MemberNotFound {
        /// Name of the leaderboard
        leaderboard: String,
        /// The member that was looked up
        member: String,
    },

    /// The leaderboard name cannot be used to build store keys.
    #[error("Invalid leaderboard name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A dense-only operation was called on a positional leaderboard.
    #[error("Operation '{operation}' requires dense ranking on leaderboard '{leaderboard}'")]
    RequiresDenseMode {
        /// Name of the leaderboard
        leaderboard: String,
        /// The operation that was attempted
        operation: String,
    },

    /// A member's score has no entry in the Rank Index.
    ///
    /// Upserts keep both indices in step, so this only happens when the
    /// store was modified outside this library.
    #[error("Rank index of leaderboard '{leaderboard}' has no entry for score {score}")]
    RankIndexMissing {
        /// Name of the leaderboard
        leaderboard: String,
        /// The score without a Rank Index entry
        score: Score,
    },
}

impl LeaderboardError {
    /// Check if this error indicates a member was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LeaderboardError::MemberNotFound { .. })
    }

    /// Check if this error is caused by invalid caller input or configuration.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            LeaderboardError::InvalidName { .. } | LeaderboardError::RequiresDenseMode { .. }
        )
    }

    /// Check if this error indicates the two indices disagree.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, LeaderboardError::RankIndexMissing { .. })
    }

    /// Get the member if this error is about a specific member.
    pub fn member(&self) -> Option<&str> {
        match self {
            LeaderboardError::MemberNotFound { member, .. } => Some(member),
            _ => None,
        }
    }
}

impl From<LeaderboardError> for crate::Error {
    fn from(err: LeaderboardError) -> Self {
        crate::Error::Leaderboard(err)
    }
}
