//! Error types for the leaderboard
//!
//! This module defines the error taxonomy used at the boundary of
//! `leaderboard-engine`. Most of these are internal precondition violations
//! that the concurrency envelope is designed to make unreachable on the
//! documented update path; they exist so that violations are distinguishable
//! rather than silently corrupting the index.

use thiserror::Error;

/// The main error type for leaderboard operations
#[derive(Error, Debug)]
pub enum Error {
    /// A query argument was out of range (negative neighbor counts, `end < start`, ...)
    ///
    /// The public query operations (`get_by_rank`, `get_neighbors`) catch this
    /// internally and degrade to an empty result rather than propagating it,
    /// per the documented policy. It remains part of the taxonomy for
    /// internal validation helpers.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `insert` was called for a customer already present in the ranking index
    #[error("customer {0} already present in ranking index")]
    Duplicate(i64),

    /// `remove` or `update_score` was called for a customer absent from the ranking index
    #[error("customer {0} absent from ranking index")]
    Absent(i64),

    /// A score delta would overflow the fixed-point representable range
    ///
    /// This is treated as fatal: the engine logs the offending customer and
    /// operands at `error` level and panics, since there is no meaningful
    /// recovery for a score that no longer fits its representation.
    #[error("score overflow for customer {0}")]
    Overflow(i64),
}

/// A specialized Result type for leaderboard operations
pub type Result<T> = std::result::Result<T, Error>;
