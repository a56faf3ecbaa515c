//! Core types used throughout the leaderboard
//!
//! This module contains the fundamental data types that form the basis
//! of the leaderboard's data model: the customer identifier, the
//! fixed-point score, and the ranked entry returned by queries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A customer in the leaderboard, identified by a signed 64-bit integer
pub type CustomerId = i64;

/// A 1-based position in the canonical rank order
pub type Rank = i64;

/// Fixed-point decimal scale: four decimal digits of precision
pub const SCORE_SCALE: i64 = 10_000;

/// A signed fixed-point decimal score
///
/// Internally stored as `raw` units of `1 / SCORE_SCALE`, so `Score::from_raw(123_4500)`
/// and `"123.4500"` denote the same value. Arithmetic is exact integer arithmetic;
/// there is no floating-point rounding anywhere in the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score {
    raw: i64,
}

impl Score {
    /// The zero score
    pub const ZERO: Score = Score { raw: 0 };

    /// Builds a score from its raw fixed-point representation
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Returns the raw fixed-point representation
    pub const fn raw(self) -> i64 {
        self.raw
    }

    /// Whether this score makes its owner a participant (strictly positive)
    pub const fn is_participating(self) -> bool {
        self.raw > 0
    }

    /// Adds two scores, returning `None` on overflow rather than panicking
    ///
    /// Callers that want the documented fatal-overflow behavior (§7 of the
    /// design) use `LeaderboardEngine::update_score`, which logs and panics
    /// on `None`.
    pub fn checked_add(self, other: Score) -> Option<Score> {
        self.raw.checked_add(other.raw).map(Score::from_raw)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.raw < 0 { "-" } else { "" };
        let abs = self.raw.unsigned_abs();
        let whole = abs / SCORE_SCALE as u64;
        let frac = abs % SCORE_SCALE as u64;
        write!(f, "{sign}{whole}.{frac:04}")
    }
}

/// Error returned when a string does not parse as a [`Score`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScoreError(String);

impl fmt::Display for ParseScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid score literal: {}", self.0)
    }
}

impl std::error::Error for ParseScoreError {}

impl FromStr for Score {
    type Err = ParseScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = s.splitn(2, '.');
        let whole_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("0");

        if whole_part.is_empty()
            || frac_part.len() > 4
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseScoreError(s.to_string()));
        }

        let whole: i64 = whole_part
            .parse()
            .map_err(|_| ParseScoreError(s.to_string()))?;
        let mut frac: i64 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|_| ParseScoreError(s.to_string()))?
        };
        for _ in frac_part.len()..4 {
            frac *= 10;
        }

        let raw = whole * SCORE_SCALE + frac;
        Ok(Score::from_raw(if negative { -raw } else { raw }))
    }
}

/// A customer together with its current score and its 1-based rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry {
    /// The customer identifier
    pub customer_id: CustomerId,
    /// The customer's current score
    pub score: Score,
    /// The customer's 1-based rank (score descending, identifier ascending)
    pub rank: Rank,
}

impl RankedEntry {
    /// Builds a new ranked entry
    pub fn new(customer_id: CustomerId, score: Score, rank: Rank) -> Self {
        Self {
            customer_id,
            score,
            rank,
        }
    }
}

/// Total ordering key for ranking: score descending, then identifier ascending
///
/// Returns `Less` if `a` should be ranked ahead of `b`.
pub fn rank_order(a_score: Score, a_id: CustomerId, b_score: Score, b_id: CustomerId) -> Ordering {
    match b_score.cmp(&a_score) {
        Ordering::Equal => a_id.cmp(&b_id),
        other => other,
    }
}
