//! Ordered-set backend for rankboard storage
//!
//! This module provides the `OrderedSetStore` trait and its implementations
//! organized by category (currently only `database::InMemory`).
//!
//! A store holds any number of keys, each naming one ordered set of
//! `(member, score)` pairs. Sets are ordered by score, ties broken by member
//! identity, which gives every member a stable position. The leaderboard logic
//! (`crate::Leaderboard`) is written purely against this boundary, so a store
//! backed by an external server can be dropped in without touching it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

// Category modules
pub mod database;
pub mod errors;

pub use errors::BackendError;

/// Score held by a member of an ordered set.
pub type Score = i64;

/// Direction in which an ordered set is traversed.
///
/// `Asc` starts at the lowest score, `Desc` at the highest. Descending order
/// is the exact reverse of ascending order, including among tied scores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Lowest score first.
    Asc,
    /// Highest score first.
    #[default]
    Desc,
}

impl Order {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Order::Asc => Order::Desc,
            Order::Desc => Order::Asc,
        }
    }
}

/// Read primitives over the ordered sets of a store.
///
/// Positions are 0-based and relative to the requested [`Order`]. Reading a
/// key that does not exist behaves like reading an empty set.
pub trait SortedSetView {
    /// Returns the score of `member` in `key`, if present.
    fn score(&self, key: &str, member: &str) -> Result<Option<Score>>;

    /// Returns the position of `member` in `key` when traversed in `order`.
    fn position_of(&self, key: &str, member: &str, order: Order) -> Result<Option<usize>>;

    /// Returns the members at positions `start..=stop` in `order`, with their scores.
    ///
    /// Positions past the end of the set are ignored, so the result may be
    /// shorter than requested or empty.
    ///
    /// # Errors
    /// `BackendError::InvalidRange` if `start > stop`.
    fn range_by_position(
        &self,
        key: &str,
        start: usize,
        stop: usize,
        order: Order,
    ) -> Result<Vec<(String, Score)>>;

    /// Counts members of `key` whose score lies in `lo..=hi`.
    ///
    /// # Errors
    /// `BackendError::InvalidScoreRange` if `lo > hi`.
    fn count_in_score_range(&self, key: &str, lo: Score, hi: Score) -> Result<usize>;

    /// Number of members in `key`.
    fn len(&self, key: &str) -> Result<usize>;
}

/// Write primitives, available only inside an atomic script.
pub trait SortedSets: SortedSetView {
    /// Sets the score of `member` in `key`, creating the key if needed.
    ///
    /// Returns `true` if the member was not present before.
    fn upsert(&mut self, key: &str, member: &str, score: Score) -> Result<bool>;

    /// Removes `member` from `key`. Returns `true` if it was present.
    fn remove(&mut self, key: &str, member: &str) -> Result<bool>;

    /// Deletes the whole key. Returns `true` if it existed.
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Expires `key` after `ttl`. Returns `false` if the key does not exist.
    fn expire(&mut self, key: &str, ttl: Duration) -> Result<bool>;
}

/// A store of named ordered sets with atomic multi-key scripts.
///
/// All store implementations must be `Send` and `Sync` so one store can be
/// shared by every leaderboard and every thread of a process.
///
/// ## Atomicity
///
/// [`execute`](Self::execute) runs a script as one unit: no other script or
/// snapshot observes its intermediate state, and if the script returns an
/// error none of its writes survive. This is the only way to write to a
/// store. [`snapshot`](Self::snapshot) gives a consistent read-only view.
///
/// Stores never retry a script on their own. Transport failures surface as
/// `BackendError::Unavailable`, lost optimistic races as
/// `BackendError::TransactionConflict`.
pub trait OrderedSetStore: Send + Sync {
    /// Runs `script` as a single atomic unit.
    fn execute(&self, script: &mut dyn FnMut(&mut dyn SortedSets) -> Result<()>) -> Result<()>;

    /// Runs `script` against a consistent read-only view of the store.
    fn snapshot(&self, script: &mut dyn FnMut(&dyn SortedSetView) -> Result<()>) -> Result<()>;
}

/// Value-returning wrappers over [`OrderedSetStore`].
///
/// Implemented for every store, including `dyn OrderedSetStore`.
pub trait OrderedSetStoreExt: OrderedSetStore {
    /// Runs `script` atomically and returns its result.
    fn atomically<R>(
        &self,
        mut script: impl FnMut(&mut dyn SortedSets) -> Result<R>,
    ) -> Result<R> {
        let mut output = None;
        self.execute(&mut |sets| {
            output = Some(script(sets)?);
            Ok(())
        })?;
        output.ok_or_else(|| {
            BackendError::Unavailable {
                reason: "store accepted the script without running it".to_string(),
            }
            .into()
        })
    }

    /// Runs `script` against a snapshot and returns its result.
    fn read<R>(&self, mut script: impl FnMut(&dyn SortedSetView) -> Result<R>) -> Result<R> {
        let mut output = None;
        self.snapshot(&mut |view| {
            output = Some(script(view)?);
            Ok(())
        })?;
        output.ok_or_else(|| {
            BackendError::Unavailable {
                reason: "store accepted the snapshot without running it".to_string(),
            }
            .into()
        })
    }
}

impl<T: OrderedSetStore + ?Sized> OrderedSetStoreExt for T {}
