//! The score map: a plain id-to-score table, the source of truth for
//! "what is this customer's current score"

use std::collections::HashMap;

use leaderboard_core::{CustomerId, Score};
use parking_lot::RwLock;

/// A concurrent map from customer id to current score
///
/// Reads and writes are independent of the ranking index's structural
/// lock; callers serialize access to a single customer's entry through
/// the per-customer stripe lock in [`crate::envelope`].
pub struct ScoreMap {
    inner: RwLock<HashMap<CustomerId, Score>>,
}

impl ScoreMap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// The customer's current score, or `None` if never participated
    pub fn get(&self, customer_id: CustomerId) -> Option<Score> {
        self.inner.read().get(&customer_id).copied()
    }

    /// Adds `delta` to the customer's score, inserting a fresh entry at
    /// `delta` if the customer has never participated
    ///
    /// Returns the score before and after the update.
    pub fn merge(&self, customer_id: CustomerId, delta: Score) -> Option<(Score, Score)> {
        let mut guard = self.inner.write();
        let before = guard.get(&customer_id).copied().unwrap_or(Score::ZERO);
        let after = before.checked_add(delta)?;
        guard.insert(customer_id, after);
        Some((before, after))
    }

    /// Removes a customer's entry entirely
    pub fn remove(&self, customer_id: CustomerId) {
        self.inner.write().remove(&customer_id);
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
