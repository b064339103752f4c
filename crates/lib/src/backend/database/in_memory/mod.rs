//! In-memory database backend implementation
//!
//! This module provides an in-memory implementation of the `OrderedSetStore`
//! trait, suitable for testing, development, or single-process deployments
//! where the leaderboards do not need to outlive the process.

pub(crate) mod ostree;
mod storage;

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Order, OrderedSetStore, Score, SortedSetView, SortedSets};
use crate::clock::{Clock, SystemClock};

use storage::SortedSet;

/// A simple in-memory store keeping one order-statistic tree per key.
///
/// Scripts passed to [`OrderedSetStore::execute`] run while holding the
/// store's write lock, which makes each one atomic with respect to every
/// other script and snapshot. Writes are recorded in an undo log, so a script
/// that returns an error leaves the store exactly as it found it.
///
/// Keys given a lifetime through `expire` disappear once the store's clock
/// passes their deadline. Expired keys read as absent and are purged by the
/// next script that touches them.
#[derive(Debug)]
pub struct InMemory {
    /// Ordered sets by key
    pub(crate) sets: RwLock<HashMap<String, SortedSet>>,
    /// Time source for key expiry
    clock: Arc<dyn Clock>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a new, empty `InMemory` store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the keys currently holding a live, non-empty set.
    pub fn keys(&self) -> Result<Vec<String>> {
        let now = self.clock.now_millis();
        let sets = self.read_sets()?;
        let mut keys: Vec<_> = sets
            .iter()
            .filter(|(_, set)| !set.is_expired(now) && !set.is_empty())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn read_sets(&self) -> Result<RwLockReadGuard<'_, HashMap<String, SortedSet>>> {
        self.sets.read().map_err(|_| {
            BackendError::Unavailable {
                reason: "in-memory store lock poisoned".to_string(),
            }
            .into()
        })
    }

    fn write_sets(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, SortedSet>>> {
        self.sets.write().map_err(|_| {
            BackendError::Unavailable {
                reason: "in-memory store lock poisoned".to_string(),
            }
            .into()
        })
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedSetStore for InMemory {
    fn execute(&self, script: &mut dyn FnMut(&mut dyn SortedSets) -> Result<()>) -> Result<()> {
        let mut sets = self.write_sets()?;
        let mut txn = Transaction {
            sets: &mut *sets,
            now: self.clock.now_millis(),
            undo: Vec::new(),
        };
        match script(&mut txn) {
            Ok(()) => {
                txn.finish();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    writes = txn.undo.len(),
                    error = %err,
                    "Script failed, rolling back"
                );
                txn.rollback();
                Err(err)
            }
        }
    }

    fn snapshot(&self, script: &mut dyn FnMut(&dyn SortedSetView) -> Result<()>) -> Result<()> {
        let sets = self.read_sets()?;
        let view = Snapshot {
            sets: &*sets,
            now: self.clock.now_millis(),
        };
        script(&view)
    }
}

/// Inverse of one write, replayed in reverse order on rollback.
#[derive(Debug)]
enum Undo {
    /// The key did not exist before the script created it.
    Created { key: String },
    /// The key existed and was removed whole (deleted or purged as expired).
    Removed { key: String, set: SortedSet },
    /// A member's score changed; `previous` is `None` if it was added.
    Member {
        key: String,
        member: String,
        previous: Option<Score>,
    },
    /// A key's expiry changed.
    Expiry {
        key: String,
        previous: Option<u64>,
    },
}

/// A live read-only view over the store's sets.
struct Snapshot<'a> {
    sets: &'a HashMap<String, SortedSet>,
    now: u64,
}

/// Mutable access to the store for the duration of one script.
struct Transaction<'a> {
    sets: &'a mut HashMap<String, SortedSet>,
    now: u64,
    undo: Vec<Undo>,
}

fn live<'s>(sets: &'s HashMap<String, SortedSet>, key: &str, now: u64) -> Option<&'s SortedSet> {
    sets.get(key).filter(|set| !set.is_expired(now))
}

fn view_range(
    set: Option<&SortedSet>,
    key: &str,
    start: usize,
    stop: usize,
    order: Order,
) -> Result<Vec<(String, Score)>> {
    if start > stop {
        return Err(BackendError::InvalidRange {
            key: key.to_string(),
            start,
            stop,
        }
        .into());
    }
    Ok(set.map(|set| set.range(start, stop, order)).unwrap_or_default())
}

fn view_count(set: Option<&SortedSet>, key: &str, lo: Score, hi: Score) -> Result<usize> {
    if lo > hi {
        return Err(BackendError::InvalidScoreRange {
            key: key.to_string(),
            lo,
            hi,
        }
        .into());
    }
    Ok(set.map_or(0, |set| set.count_in_score_range(lo, hi)))
}

macro_rules! impl_view {
    ($ty:ident) => {
        impl SortedSetView for $ty<'_> {
            fn score(&self, key: &str, member: &str) -> Result<Option<Score>> {
                Ok(live(&*self.sets, key, self.now).and_then(|set| set.score(member)))
            }

            fn position_of(&self, key: &str, member: &str, order: Order) -> Result<Option<usize>> {
                Ok(live(&*self.sets, key, self.now).and_then(|set| set.position_of(member, order)))
            }

            fn range_by_position(
                &self,
                key: &str,
                start: usize,
                stop: usize,
                order: Order,
            ) -> Result<Vec<(String, Score)>> {
                view_range(live(&*self.sets, key, self.now), key, start, stop, order)
            }

            fn count_in_score_range(&self, key: &str, lo: Score, hi: Score) -> Result<usize> {
                view_count(live(&*self.sets, key, self.now), key, lo, hi)
            }

            fn len(&self, key: &str) -> Result<usize> {
                Ok(live(&*self.sets, key, self.now).map_or(0, SortedSet::len))
            }
        }
    };
}

impl_view!(Snapshot);
impl_view!(Transaction);

impl Transaction<'_> {
    /// Drops `key` if its lifetime has passed, recording the purge.
    fn purge_expired(&mut self, key: &str) {
        let now = self.now;
        if !self.sets.get(key).is_some_and(|set| set.is_expired(now)) {
            return;
        }
        if let Some(set) = self.sets.remove(key) {
            self.undo.push(Undo::Removed {
                key: key.to_string(),
                set,
            });
        }
    }

    /// Returns the live set at `key`, creating it if `create` is set.
    fn live_mut(&mut self, key: &str, create: bool) -> Option<&mut SortedSet> {
        self.purge_expired(key);
        if create && !self.sets.contains_key(key) {
            self.sets.insert(key.to_string(), SortedSet::new());
            self.undo.push(Undo::Created {
                key: key.to_string(),
            });
        }
        self.sets.get_mut(key)
    }

    /// Removes keys the script left empty so they read as nonexistent.
    fn finish(self) {
        self.sets.retain(|_, set| !set.is_empty());
    }

    fn rollback(mut self) {
        while let Some(undo) = self.undo.pop() {
            match undo {
                Undo::Created { key } => {
                    self.sets.remove(&key);
                }
                Undo::Removed { key, set } => {
                    self.sets.insert(key, set);
                }
                Undo::Member {
                    key,
                    member,
                    previous,
                } => {
                    if let Some(set) = self.sets.get_mut(&key) {
                        match previous {
                            Some(score) => {
                                set.upsert(&member, score);
                            }
                            None => {
                                set.remove(&member);
                            }
                        }
                    }
                }
                Undo::Expiry { key, previous } => {
                    if let Some(set) = self.sets.get_mut(&key) {
                        set.expires_at = previous;
                    }
                }
            }
        }
    }
}

impl SortedSets for Transaction<'_> {
    fn upsert(&mut self, key: &str, member: &str, score: Score) -> Result<bool> {
        let Some(set) = self.live_mut(key, true) else {
            return Err(BackendError::Unavailable {
                reason: format!("key {key} vanished during upsert"),
            }
            .into());
        };
        let previous = set.upsert(member, score);
        if previous != Some(score) {
            self.undo.push(Undo::Member {
                key: key.to_string(),
                member: member.to_string(),
                previous,
            });
        }
        Ok(previous.is_none())
    }

    fn remove(&mut self, key: &str, member: &str) -> Result<bool> {
        let Some(set) = self.live_mut(key, false) else {
            return Ok(false);
        };
        let previous = set.remove(member);
        if previous.is_some() {
            self.undo.push(Undo::Member {
                key: key.to_string(),
                member: member.to_string(),
                previous,
            });
        }
        Ok(previous.is_some())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        self.purge_expired(key);
        match self.sets.remove(key) {
            Some(set) => {
                let existed = !set.is_empty();
                self.undo.push(Undo::Removed {
                    key: key.to_string(),
                    set,
                });
                Ok(existed)
            }
            None => Ok(false),
        }
    }

    fn expire(&mut self, key: &str, ttl: Duration) -> Result<bool> {
        let deadline = self.now.saturating_add(ttl.as_millis() as u64);
        let Some(set) = self.live_mut(key, false) else {
            return Ok(false);
        };
        if set.is_empty() {
            return Ok(false);
        }
        let previous = set.expires_at.replace(deadline);
        self.undo.push(Undo::Expiry {
            key: key.to_string(),
            previous,
        });
        Ok(true)
    }
}
