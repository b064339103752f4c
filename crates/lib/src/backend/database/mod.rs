//! Database-style backend implementations
//!
//! These backends keep ordered sets in a queryable store and provide the
//! atomic script facility the leaderboard needs for its upserts.

pub mod in_memory;

pub use in_memory::InMemory;
