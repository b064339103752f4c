//! Core types for the leaderboard module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{Order, Score};

/// How ranks are assigned to members that share a score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Every member occupies its own rank, even when scores tie.
    ///
    /// Rank is the member's 1-based position in rank order; ties are broken by
    /// member identity.
    #[default]
    Positional,
    /// Members sharing a score share a rank.
    ///
    /// Rank is one more than the number of distinct scores ranked above the
    /// member's score. Requires the Rank Index.
    Dense,
}

/// Configuration of a leaderboard, fixed when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Ranking semantics for tied scores.
    pub mode: RankingMode,
    /// Direction that defines rank 1. `Desc` ranks the highest score first.
    pub rank_order: Order,
    /// When set, every upsert pushes the expiry of the leaderboard's keys to
    /// this long after the write.
    pub lifetime: Option<Duration>,
}

impl Options {
    /// Options for a positional leaderboard with default settings.
    pub fn positional() -> Self {
        Self::default()
    }

    /// Options for a dense (tie-aware) leaderboard with default settings.
    pub fn dense() -> Self {
        Self {
            mode: RankingMode::Dense,
            ..Self::default()
        }
    }

    /// Set which direction defines rank 1.
    pub fn with_rank_order(mut self, order: Order) -> Self {
        self.rank_order = order;
        self
    }

    /// Expire the leaderboard `lifetime` after its most recent upsert.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

/// A member of a leaderboard as returned by queries.
///
/// `rank` is computed at query time and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Member identity.
    pub id: String,
    /// Current score.
    pub score: Score,
    /// 1-based rank under the leaderboard's ranking mode.
    pub rank: usize,
}

/// The positions covered by a page of results, `begin..end` in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Position of the first returned member.
    pub begin: usize,
    /// One past the position of the last returned member.
    pub end: usize,
}

impl Cursor {
    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the cursor covers no positions.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// A slice of the ranking together with the positions it covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Members in list order.
    pub members: Vec<Member>,
    /// Realized window; shorter than requested near the end of the ranking.
    pub cursor: Cursor,
}

impl Page {
    /// Ids of the returned members, in list order.
    pub fn ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }

    /// Ranks of the returned members, in list order.
    pub fn ranks(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.rank).collect()
    }
}
