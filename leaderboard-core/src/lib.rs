//! Core types and error handling for the ranking leaderboard
//!
//! This crate contains the fundamental types shared by `leaderboard-engine`
//! and `leaderboard-server`. It provides:
//!
//! - Common error types with [`Error`] and [`Result`]
//! - The customer identifier and fixed-point [`Score`] types
//! - [`RankedEntry`], the tuple returned by every query operation
//!
//! # Example
//!
//! ```
//! use leaderboard_core::{CustomerId, Score, RankedEntry};
//!
//! let customer: CustomerId = 42;
//! let score: Score = "123.4500".parse().unwrap();
//! let entry = RankedEntry::new(customer, score, 1);
//! assert_eq!(entry.rank, 1);
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
