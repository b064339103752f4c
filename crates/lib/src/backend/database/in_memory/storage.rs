//! Per-key ordered set storage for the InMemory database

use std::collections::HashMap;

use super::ostree::OsTree;
use crate::backend::{Order, Score};

/// One ordered set: a member -> score map plus the same pairs kept in
/// `(score, member)` order for positional queries.
#[derive(Debug, Clone, Default)]
pub(crate) struct SortedSet {
    scores: HashMap<String, Score>,
    ordered: OsTree<(Score, String)>,
    /// Absolute expiry time in milliseconds, if the key has a lifetime.
    pub(crate) expires_at: Option<u64>,
}

impl SortedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.ordered.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub(crate) fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub(crate) fn score(&self, member: &str) -> Option<Score> {
        self.scores.get(member).copied()
    }

    /// Sets `member` to `score`, returning the previous score.
    pub(crate) fn upsert(&mut self, member: &str, score: Score) -> Option<Score> {
        let previous = self.scores.insert(member.to_string(), score);
        match previous {
            Some(old) if old == score => {}
            Some(old) => {
                self.ordered.remove(&(old, member.to_string()));
                self.ordered.insert((score, member.to_string()));
            }
            None => {
                self.ordered.insert((score, member.to_string()));
            }
        }
        previous
    }

    /// Removes `member`, returning its score.
    pub(crate) fn remove(&mut self, member: &str) -> Option<Score> {
        let score = self.scores.remove(member)?;
        self.ordered.remove(&(score, member.to_string()));
        Some(score)
    }

    pub(crate) fn position_of(&self, member: &str, order: Order) -> Option<usize> {
        let score = self.score(member)?;
        let ascending = self.ordered.rank(&(score, member.to_string()))?;
        Some(match order {
            Order::Asc => ascending,
            Order::Desc => self.len() - 1 - ascending,
        })
    }

    /// Members at positions `start..=stop` in `order`, clamped to the set.
    pub(crate) fn range(&self, start: usize, stop: usize, order: Order) -> Vec<(String, Score)> {
        let len = self.len();
        if start >= len {
            return Vec::new();
        }
        let stop = stop.min(len - 1);
        (start..=stop)
            .filter_map(|position| {
                let index = match order {
                    Order::Asc => position,
                    Order::Desc => len - 1 - position,
                };
                self.ordered
                    .select(index)
                    .map(|(score, member)| (member.clone(), *score))
            })
            .collect()
    }

    /// Members with a score in `lo..=hi`.
    pub(crate) fn count_in_score_range(&self, lo: Score, hi: Score) -> usize {
        let at_most_hi = self.ordered.count_before(|(score, _)| *score <= hi);
        let below_lo = self.ordered.count_before(|(score, _)| *score < lo);
        at_most_hi.saturating_sub(below_lo)
    }
}
