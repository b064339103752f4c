//! Leaderboard integration tests
//!
//! Most tests run once per ranking mode via `both_modes()`.
//!
//! - `upsert`: adding and moving members, Rank Index upkeep
//! - `rank`: positional and dense rank lookups
//! - `list`: pagination, cursors and attached ranks
//! - `window`: "around me" windows and their clamping
//! - `clear`: removal of a whole leaderboard
//! - `concurrency`: the Rank Index invariant under concurrent upserts
//! - `errors`: store failures surfacing through the engine
//! - `lifetime`: leaderboards that expire after their last write

mod concurrency;
mod errors;
mod list;
mod window;
