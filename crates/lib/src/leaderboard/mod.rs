//! Leaderboards: rankings of members by score.
//!
//! A [`Leaderboard`] keeps its population in two ordered sets of an
//! [`OrderedSetStore`]:
//!
//! * the **Score Index**, mapping each member to its current score, and
//! * the **Rank Index** (dense mode only), holding every distinct score that
//!   at least one member currently has, each stored under itself.
//!
//! Positional ranks come straight from a member's position in the Score
//! Index. Dense ranks come from the position of the member's score in the
//! Rank Index, which counts distinct scores ranked above it without scanning
//! the population.
//!
//! Every upsert runs as one atomic store script. In dense mode that script
//! also drops the member's previous score from the Rank Index when no other
//! member still holds it, so the Rank Index contains a score exactly when
//! some member has it.

mod errors;
mod types;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::Result;
use crate::backend::{Order, OrderedSetStore, OrderedSetStoreExt, Score, SortedSetView, SortedSets};
use crate::constants::{KEY_SEPARATOR, rank_index_key, score_index_key};

pub use errors::LeaderboardError;
pub use types::{Cursor, Member, Options, Page, RankingMode};

/// A named ranking of members by score.
///
/// `Leaderboard` is a cheap handle: cloning it shares the underlying store,
/// and any number of handles (in this process or others sharing the store)
/// may operate on the same name concurrently. The engine keeps no state of
/// its own besides configuration; all coordination happens in the store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rankboard::{InMemory, Leaderboard, Options, Order};
///
/// let store = Arc::new(InMemory::new());
/// let board = Leaderboard::new(store, "weekly", Options::dense())?;
/// board.upsert("alice", 30)?;
/// board.upsert("bob", 30)?;
/// board.upsert("carol", 10)?;
///
/// assert_eq!(board.rank("alice")?, 1);
/// assert_eq!(board.rank("bob")?, 1);
/// assert_eq!(board.rank("carol")?, 2);
///
/// let page = board.list(0, 10, Order::Desc)?;
/// assert_eq!(page.ranks(), vec![1, 1, 2]);
/// # Ok::<(), rankboard::Error>(())
/// ```
#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn OrderedSetStore>,
    name: String,
    score_key: String,
    rank_key: String,
    options: Options,
}

impl fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaderboard")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Leaderboard {
    /// Opens the leaderboard called `name` in `store`.
    ///
    /// Nothing is written until the first upsert; a leaderboard that has
    /// never been written to behaves as empty.
    ///
    /// # Errors
    /// `LeaderboardError::InvalidName` if `name` is empty or contains the
    /// store key separator `:`.
    pub fn new(
        store: Arc<dyn OrderedSetStore>,
        name: impl Into<String>,
        options: Options,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LeaderboardError::InvalidName {
                name,
                reason: "name must not be empty".to_string(),
            }
            .into());
        }
        if name.contains(KEY_SEPARATOR) {
            return Err(LeaderboardError::InvalidName {
                reason: format!("name must not contain '{KEY_SEPARATOR}'"),
                name,
            }
            .into());
        }

        Ok(Self {
            score_key: score_index_key(&name),
            rank_key: rank_index_key(&name),
            store,
            name,
            options,
        })
    }

    /// Name of this leaderboard.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration this leaderboard was opened with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Ranking mode of this leaderboard.
    pub fn mode(&self) -> RankingMode {
        self.options.mode
    }

    /// Sets the score of member `id`, adding the member if it is new.
    ///
    /// Re-sending a member's current score is a no-op. The whole update is a
    /// single atomic store script; if the store rejects it, nothing changed
    /// and the call may be retried as a whole.
    pub fn upsert(&self, id: &str, score: Score) -> Result<()> {
        match self.options.mode {
            RankingMode::Positional => {
                let added = self.store.atomically(|sets| {
                    let added = sets.upsert(&self.score_key, id, score)?;
                    self.refresh_lifetime(sets)?;
                    Ok(added)
                })?;
                debug!(leaderboard = %self.name, member = id, score, added, "Upserted member");
            }
            RankingMode::Dense => self.upsert_dense(id, score)?,
        }
        Ok(())
    }

    fn upsert_dense(&self, id: &str, score: Score) -> Result<()> {
        let new_score = score.to_string();
        let (previous, reclaimed) = self.store.atomically(|sets| {
            let previous = sets.score(&self.score_key, id)?;
            sets.upsert(&self.score_key, id, score)?;
            sets.upsert(&self.rank_key, &new_score, score)?;

            // A brand-new member or an unchanged score leaves nothing to reclaim.
            let mut reclaimed = None;
            if let Some(old) = previous.filter(|old| *old != score) {
                let holders = sets.count_in_score_range(&self.score_key, old, old)?;
                if holders == 0 {
                    sets.remove(&self.rank_key, &old.to_string())?;
                    reclaimed = Some(old);
                }
            }

            self.refresh_lifetime(sets)?;
            Ok((previous, reclaimed))
        })?;

        debug!(
            leaderboard = %self.name,
            member = id,
            score,
            previous = ?previous,
            "Upserted member"
        );
        if let Some(old) = reclaimed {
            debug!(leaderboard = %self.name, score = old, "Reclaimed stale rank index score");
        }
        Ok(())
    }

    fn refresh_lifetime(&self, sets: &mut dyn SortedSets) -> Result<()> {
        let Some(lifetime) = self.options.lifetime else {
            return Ok(());
        };
        sets.expire(&self.score_key, lifetime)?;
        if self.options.mode == RankingMode::Dense {
            sets.expire(&self.rank_key, lifetime)?;
        }
        Ok(())
    }

    /// Rank of member `id` under the leaderboard's rank order.
    ///
    /// # Errors
    /// `LeaderboardError::MemberNotFound` if `id` has no score, in both modes.
    pub fn rank(&self, id: &str) -> Result<usize> {
        self.rank_in(id, self.options.rank_order)
    }

    /// Rank of member `id` when rank 1 is the first member in `order`.
    ///
    /// # Errors
    /// `LeaderboardError::MemberNotFound` if `id` has no score.
    pub fn rank_in(&self, id: &str, order: Order) -> Result<usize> {
        let rank = self.store.read(|view| self.rank_with(view, id, order))?;
        trace!(leaderboard = %self.name, member = id, rank, "Computed rank");
        Ok(rank)
    }

    fn rank_with<V>(&self, view: &V, id: &str, order: Order) -> Result<usize>
    where
        V: SortedSetView + ?Sized,
    {
        match self.options.mode {
            RankingMode::Positional => view
                .position_of(&self.score_key, id, order)?
                .map(|position| position + 1)
                .ok_or_else(|| self.not_found(id)),
            RankingMode::Dense => {
                let score = view
                    .score(&self.score_key, id)?
                    .ok_or_else(|| self.not_found(id))?;
                self.dense_rank(view, score, order)
            }
        }
    }

    /// One more than the number of distinct scores ahead of `score` in `order`.
    fn dense_rank<V>(&self, view: &V, score: Score, order: Order) -> Result<usize>
    where
        V: SortedSetView + ?Sized,
    {
        view.position_of(&self.rank_key, &score.to_string(), order)?
            .map(|position| position + 1)
            .ok_or_else(|| {
                LeaderboardError::RankIndexMissing {
                    leaderboard: self.name.clone(),
                    score,
                }
                .into()
            })
    }

    /// Current score of member `id`, or `None` if it has none.
    pub fn score(&self, id: &str) -> Result<Option<Score>> {
        self.store.read(|view| view.score(&self.score_key, id))
    }

    /// Number of members on the leaderboard.
    pub fn len(&self) -> Result<usize> {
        self.store.read(|view| view.len(&self.score_key))
    }

    /// Whether the leaderboard has no members.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of distinct scores currently held, read from the Rank Index.
    ///
    /// # Errors
    /// `LeaderboardError::RequiresDenseMode` on a positional leaderboard,
    /// which has no Rank Index.
    pub fn distinct_scores(&self) -> Result<usize> {
        if self.options.mode != RankingMode::Dense {
            return Err(LeaderboardError::RequiresDenseMode {
                leaderboard: self.name.clone(),
                operation: "distinct_scores".to_string(),
            }
            .into());
        }
        self.store.read(|view| view.len(&self.rank_key))
    }

    /// Up to `limit` members starting at position `offset`, traversed in `order`.
    ///
    /// Ranks are always relative to the leaderboard's rank order, whatever
    /// `order` is. A zero `limit` or an `offset` past the end gives an empty
    /// page.
    pub fn list(&self, offset: usize, limit: usize, order: Order) -> Result<Page> {
        let page = self
            .store
            .read(|view| self.list_with(view, offset, limit, order))?;
        trace!(
            leaderboard = %self.name,
            offset,
            limit,
            returned = page.members.len(),
            "Listed members"
        );
        Ok(page)
    }

    fn list_with<V>(&self, view: &V, offset: usize, limit: usize, order: Order) -> Result<Page>
    where
        V: SortedSetView + ?Sized,
    {
        let empty = Page {
            members: Vec::new(),
            cursor: Cursor {
                begin: offset,
                end: offset,
            },
        };
        if limit == 0 {
            return Ok(empty);
        }
        let total = view.len(&self.score_key)?;
        if offset >= total {
            return Ok(empty);
        }

        let stop = offset.saturating_add(limit - 1);
        let rows = view.range_by_position(&self.score_key, offset, stop, order)?;
        let members: Vec<Member> = match self.options.mode {
            RankingMode::Positional => rows
                .into_iter()
                .enumerate()
                .map(|(i, (id, score))| {
                    let position = offset + i;
                    let rank = if order == self.options.rank_order {
                        position + 1
                    } else {
                        total - position
                    };
                    Member { id, score, rank }
                })
                .collect(),
            RankingMode::Dense => {
                // One Rank Index lookup per distinct score on the page.
                let mut ranks: HashMap<Score, usize> = HashMap::new();
                let mut members = Vec::with_capacity(rows.len());
                for (id, score) in rows {
                    let rank = match ranks.get(&score) {
                        Some(rank) => *rank,
                        None => {
                            let rank = self.dense_rank(view, score, self.options.rank_order)?;
                            ranks.insert(score, rank);
                            rank
                        }
                    };
                    members.push(Member { id, score, rank });
                }
                members
            }
        };

        let cursor = Cursor {
            begin: offset,
            end: offset + members.len(),
        };
        Ok(Page { members, cursor })
    }

    /// Up to `limit` members around member `id`, traversed in `order`.
    ///
    /// The window is centered on `id` where possible and slides to stay
    /// full-sized at either end of the ranking, so it holds `limit` members
    /// whenever the leaderboard has that many.
    ///
    /// # Errors
    /// `LeaderboardError::MemberNotFound` if `id` has no score.
    pub fn window(&self, id: &str, limit: usize, order: Order) -> Result<Page> {
        let page = self.store.read(|view| {
            let position = view
                .position_of(&self.score_key, id, order)?
                .ok_or_else(|| self.not_found(id))?;
            let total = view.len(&self.score_key)?;
            let start = window_start(position, limit, total);
            self.list_with(view, start, limit, order)
        })?;
        trace!(
            leaderboard = %self.name,
            member = id,
            begin = page.cursor.begin,
            end = page.cursor.end,
            "Listed window"
        );
        Ok(page)
    }

    /// Deletes every member and both indices in one atomic step.
    ///
    /// Clearing an empty or never-written leaderboard succeeds.
    pub fn clear(&self) -> Result<()> {
        let existed = self.store.atomically(|sets| {
            let scores = sets.delete(&self.score_key)?;
            let ranks = sets.delete(&self.rank_key)?;
            Ok(scores || ranks)
        })?;
        debug!(leaderboard = %self.name, existed, "Cleared leaderboard");
        Ok(())
    }

    fn not_found(&self, id: &str) -> crate::Error {
        LeaderboardError::MemberNotFound {
            leaderboard: self.name.clone(),
            member: id.to_string(),
        }
        .into()
    }
}

/// First position of a `limit`-sized window centered on `position`.
///
/// Slides left when the window would run past `total`, never below zero.
pub(crate) fn window_start(position: usize, limit: usize, total: usize) -> usize {
    let start = position.saturating_sub(limit / 2);
    let overrun = start.saturating_add(limit).saturating_sub(total);
    start.saturating_sub(overrun)
}
