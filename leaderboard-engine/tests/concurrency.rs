//! Concurrency integration tests for the (a)/(b)/(c) properties of §8:
//! absence of data races across disjoint stripes, serializability of
//! concurrent updates to the same customer, and freedom from stale spans
//! after a quiesced round of mixed operations.

use std::sync::Arc;

use leaderboard_core::Score;
use leaderboard_engine::{LeaderboardConfig, LeaderboardEngine};

fn engine() -> Arc<LeaderboardEngine> {
    Arc::new(LeaderboardEngine::new(LeaderboardConfig {
        stripe_count: 64,
        max_level: 16,
        capacity_hint: 0,
    }))
}

fn score(s: &str) -> Score {
    s.parse().unwrap()
}

/// Asserts the rank-consistency invariant (§8.1 / §8.2): for every
/// participant, its reported rank matches its position in a materialized
/// sort by the canonical ordering key.
fn assert_rank_consistency(engine: &LeaderboardEngine) {
    let count = engine.count();
    let all = engine.get_by_rank(1, count);
    assert_eq!(all.len(), count as usize);

    let mut sorted = all.clone();
    sorted.sort_by(|a, b| b.score.cmp(&a.score).then(a.customer_id.cmp(&b.customer_id)));
    assert_eq!(all, sorted);

    for entry in &all {
        let neighbors = engine.get_neighbors(entry.customer_id, 0, 0);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].rank, entry.rank);
    }
}

/// (a) Parallel updates to disjoint customer ids must not corrupt state:
/// every customer's final score must equal the sum of its own deltas, and
/// the total participant count must match the number of customers whose
/// final cumulative delta was positive.
#[test]
fn disjoint_customers_update_without_interference() {
    let engine = engine();
    let worker_count = 16;
    let customers_per_worker = 50;

    crossbeam::thread::scope(|scope| {
        for worker in 0..worker_count {
            let engine = Arc::clone(&engine);
            scope.spawn(move |_| {
                let base = worker * customers_per_worker;
                for offset in 0..customers_per_worker {
                    let id = (base + offset) as i64;
                    engine.update_score(id, score("1"));
                    engine.update_score(id, score("2"));
                    engine.update_score(id, score("3"));
                }
            });
        }
    })
    .unwrap();

    for id in 0..(worker_count * customers_per_worker) as i64 {
        let neighbors = engine.get_neighbors(id, 0, 0);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].score, score("6"));
    }
    assert_eq!(engine.count(), (worker_count * customers_per_worker) as i64);
    assert_rank_consistency(&engine);
}

/// (b) Concurrent updates to the *same* customer must serialize under the
/// stripe lock: the final score is the sum of every applied delta, with no
/// lost updates.
#[test]
fn same_customer_updates_serialize_under_the_stripe_lock() {
    let engine = engine();
    let customer: i64 = 7;
    let thread_count = 32;
    let deltas_per_thread = 25;

    crossbeam::thread::scope(|scope| {
        for _ in 0..thread_count {
            let engine = Arc::clone(&engine);
            scope.spawn(move |_| {
                for _ in 0..deltas_per_thread {
                    engine.update_score(customer, score("1"));
                }
            });
        }
    })
    .unwrap();

    let neighbors = engine.get_neighbors(customer, 0, 0);
    assert_eq!(neighbors.len(), 1);
    assert_eq!(
        neighbors[0].score,
        Score::from_raw((thread_count * deltas_per_thread * 10_000) as i64)
    );
}

/// (c) After every quiesced round of mixed insert/update/remove-driving
/// operations across many customers, readers must never observe stale
/// spans: the rank-consistency invariant holds exactly.
#[test]
fn readers_never_observe_stale_spans_after_mixed_rounds() {
    let engine = engine();
    let customer_count = 200;
    let rounds = 10;

    for round in 0..rounds {
        crossbeam::thread::scope(|scope| {
            for worker in 0..8 {
                let engine = Arc::clone(&engine);
                scope.spawn(move |_| {
                    for raw_id in (worker..customer_count).step_by(8) {
                        let id = raw_id as i64;
                        let delta = if (raw_id + round) % 3 == 0 {
                            score("-4")
                        } else {
                            score("5")
                        };
                        engine.update_score(id, delta);
                    }
                });
            }
        })
        .unwrap();

        assert_rank_consistency(&engine);
    }
}
