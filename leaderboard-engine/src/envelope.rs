//! The concurrency envelope: per-customer stripe locks plus the single
//! structural lock over the ranking index
//!
//! This is the component a caller actually talks to. It owns the [`ScoreMap`]
//! and the [`RankingIndex`] and enforces the lock order mandated by the
//! design: stripe lock first, structural lock second, never the reverse.

use std::cell::RefCell;

use leaderboard_core::{CustomerId, Rank, RankedEntry, Score};
use parking_lot::{Mutex, RwLock};
use rand::rngs::ThreadRng;

use crate::config::LeaderboardConfig;
use crate::rank_index::RankingIndex;
use crate::score_map::ScoreMap;

thread_local! {
    static HEIGHT_RNG: RefCell<ThreadRng> = RefCell::new(rand::thread_rng());
}

/// The public entry point for the leaderboard: stripe locks, the score map,
/// and the structurally-locked ranking index, wired together per §4.3
pub struct LeaderboardEngine {
    config: LeaderboardConfig,
    stripes: Vec<Mutex<()>>,
    score_map: ScoreMap,
    index: RwLock<RankingIndex>,
}

impl LeaderboardEngine {
    /// Builds a new, empty engine from the given configuration
    pub fn new(config: LeaderboardConfig) -> Self {
        let stripes = (0..config.stripe_count).map(|_| Mutex::new(())).collect();
        Self {
            score_map: ScoreMap::with_capacity(config.capacity_hint),
            index: RwLock::new(RankingIndex::new(config.max_level)),
            stripes,
            config,
        }
    }

    /// Applies a signed delta to a customer's score and returns the new
    /// cumulative value
    ///
    /// Follows the update path of §4.3: acquire the customer's stripe,
    /// consult the score map, then take the structural write lock only for
    /// the structural operation the new score requires. Panics (after
    /// logging at `error!`) if the delta would overflow [`Score`]'s
    /// representable range — there is no meaningful recovery.
    pub fn update_score(&self, customer_id: CustomerId, delta: Score) -> Score {
        let stripe = &self.stripes[self.config.stripe_of(customer_id)];
        let _stripe_guard = stripe.lock();
        log::trace!("stripe locked for customer {customer_id}");

        let current = self.score_map.get(customer_id);

        if delta.raw() == 0 {
            if let Some(current) = current {
                log::debug!("zero-delta no-op for participating customer {customer_id}");
                let present = self.index.read().contains(customer_id);
                assert_eq!(
                    present,
                    current.is_participating(),
                    "customer {customer_id} out of sync between score map and ranking index"
                );
                return current;
            }
            log::debug!("zero-delta no-op for absent customer {customer_id}");
            return Score::ZERO;
        }

        let new_score = match current {
            None => delta,
            Some(current) => current.checked_add(delta).unwrap_or_else(|| {
                log::error!(
                    "score overflow for customer {customer_id}: {current} + {delta} exceeds i64"
                );
                panic!("score overflow for customer {customer_id}");
            }),
        };

        if new_score.is_participating() {
            let mut index = self.index.write();
            HEIGHT_RNG.with(|rng| {
                if current.is_some() {
                    log::debug!("updating score for customer {customer_id} to {new_score}");
                    index
                        .update_score(customer_id, new_score, &mut *rng.borrow_mut())
                        .expect("customer present in index: score map and index out of sync");
                } else {
                    log::debug!("inserting customer {customer_id} at score {new_score}");
                    index
                        .insert(customer_id, new_score, &mut *rng.borrow_mut())
                        .expect("customer absent from index: score map and index out of sync");
                }
            });
            self.score_map.merge(customer_id, delta);
        } else if current.is_some() {
            log::debug!("dropping customer {customer_id}, score fell to {new_score}");
            let mut index = self.index.write();
            index
                .remove(customer_id)
                .expect("customer present in index: score map and index out of sync");
            self.score_map.remove(customer_id);
        }

        new_score
    }

    /// Returns the contiguous band of customers with `start <= rank <= end`
    ///
    /// Empty on an invalid range rather than an error, per §7.
    pub fn get_by_rank(&self, start: Rank, end: Rank) -> Vec<RankedEntry> {
        self.index.read().range_by_rank(start, end)
    }

    /// Returns a customer together with up to `up` higher-ranked and `down`
    /// lower-ranked neighbors, in ascending rank order
    ///
    /// Empty if the customer is absent.
    pub fn get_neighbors(&self, customer_id: CustomerId, up: i64, down: i64) -> Vec<RankedEntry> {
        self.index.read().neighbors(customer_id, up, down)
    }

    /// Current number of participating customers
    pub fn count(&self) -> i64 {
        self.index.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LeaderboardEngine {
        LeaderboardEngine::new(LeaderboardConfig {
            stripe_count: 8,
            max_level: 8,
            capacity_hint: 0,
        })
    }

    fn score(s: &str) -> Score {
        s.parse().unwrap()
    }

    #[test]
    fn new_customer_enters_on_positive_delta() {
        let engine = engine();
        let new = engine.update_score(1, score("10"));
        assert_eq!(new, score("10"));
        assert_eq!(engine.count(), 1);
    }

    #[test]
    fn new_customer_stays_absent_on_nonpositive_delta() {
        let engine = engine();
        let new = engine.update_score(1, score("-5"));
        assert_eq!(new, score("-5"));
        assert_eq!(engine.count(), 0);
        assert!(engine.get_neighbors(1, 0, 0).is_empty());
    }

    #[test]
    fn participant_dropped_when_score_reaches_zero() {
        let engine = engine();
        engine.update_score(1, score("10"));
        let new = engine.update_score(1, score("-10"));
        assert_eq!(new, Score::ZERO);
        assert_eq!(engine.count(), 0);
    }

    #[test]
    fn participant_dropped_when_score_goes_negative() {
        let engine = engine();
        engine.update_score(1, score("10"));
        let new = engine.update_score(1, score("-15"));
        assert_eq!(new, score("-5"));
        assert_eq!(engine.count(), 0);
    }

    #[test]
    fn zero_delta_is_a_no_op_for_participant() {
        let engine = engine();
        engine.update_score(1, score("10"));
        let before = engine.get_by_rank(1, 1);
        let new = engine.update_score(1, Score::ZERO);
        assert_eq!(new, score("10"));
        assert_eq!(engine.get_by_rank(1, 1), before);
    }

    #[test]
    fn zero_delta_is_a_no_op_for_absent_customer() {
        let engine = engine();
        let new = engine.update_score(1, Score::ZERO);
        assert_eq!(new, Score::ZERO);
        assert_eq!(engine.count(), 0);
    }

    #[test]
    fn scenario_s2_ranking_order() {
        let engine = engine();
        engine.update_score(1, score("10"));
        engine.update_score(2, score("20"));
        engine.update_score(3, score("20"));
        engine.update_score(4, score("5"));

        let band = engine.get_by_rank(1, 4);
        let ids: Vec<_> = band.iter().map(|e| e.customer_id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
        assert_eq!(band.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
