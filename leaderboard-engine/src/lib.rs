//! Concurrent ranking index and score map for the leaderboard
//!
//! This crate implements the live, in-memory leaderboard core: a
//! [`ScoreMap`] tracking each customer's authoritative score, a
//! [`RankingIndex`] giving sub-linear rank-by-position and
//! position-of-element lookups, and a [`LeaderboardEngine`] tying the two
//! together behind the two-tier stripe/structural locking scheme.
//!
//! # Architecture
//!
//! ```text
//! Update path:
//! update_score(id, delta) → stripe lock → score map → structural write lock → ranking index
//!
//! Read path:
//! get_by_rank / get_neighbors → structural read lock → ranking index
//! ```
//!
//! # Example
//!
//! ```
//! use leaderboard_engine::{LeaderboardConfig, LeaderboardEngine};
//!
//! let engine = LeaderboardEngine::new(LeaderboardConfig::default());
//! engine.update_score(1, "10".parse().unwrap());
//! engine.update_score(2, "20".parse().unwrap());
//! let top = engine.get_by_rank(1, 2);
//! assert_eq!(top[0].customer_id, 2);
//! ```

pub mod config;
pub mod envelope;
pub mod rank_index;
pub mod score_map;

pub use config::LeaderboardConfig;
pub use envelope::LeaderboardEngine;
pub use rank_index::RankingIndex;
pub use score_map::ScoreMap;
