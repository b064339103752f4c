//! Constants used throughout the rankboard library.
//!
//! This module provides central definitions for the store key layout. Every
//! leaderboard owns two keys in the backing store, both namespaced by the
//! leaderboard name so many leaderboards can share one store.

/// Prefix for every key written by this library.
pub const KEY_PREFIX: &str = "rankboard";

/// Separator between key segments. Leaderboard names may not contain it.
pub const KEY_SEPARATOR: char = ':';

/// Suffix of the Score Index key (member -> score).
pub const SCORE_INDEX: &str = "member_score_set";

/// Suffix of the Rank Index key (distinct score -> itself).
pub const RANK_INDEX: &str = "rank_set";

/// Store key of the Score Index for the named leaderboard.
pub fn score_index_key(name: &str) -> String {
    format!("{KEY_PREFIX}{KEY_SEPARATOR}{name}{KEY_SEPARATOR}{SCORE_INDEX}")
}

/// Store key of the Rank Index for the named leaderboard.
pub fn rank_index_key(name: &str) -> String {
    format!("{KEY_PREFIX}{KEY_SEPARATOR}{name}{KEY_SEPARATOR}{RANK_INDEX}")
}
