//! The ranking index: an augmented skip list ordered by score descending,
//! customer id ascending
//!
//! Every mutating method takes `&mut self`; callers are expected to hold
//! the structural write lock (see [`crate::envelope`]) for the duration of
//! the call. Query methods take `&self` and are safe to call concurrently
//! with other readers under the structural read lock.

mod node;

use std::cmp::Ordering;
use std::collections::HashMap;

use leaderboard_core::{rank_order, CustomerId, Error, Rank, RankedEntry, Result, Score};
use rand::Rng;

use node::{Node, NodeId, HEAD};

/// Generates a node height: geometric distribution with p = 0.5, capped at `max_level`
fn random_height(rng: &mut impl Rng, max_level: usize) -> usize {
    let mut height = 1;
    while height < max_level && rng.gen_bool(0.5) {
        height += 1;
    }
    height
}

/// A concurrent-safe (under an external lock) augmented skip list
///
/// Nodes live in a flat arena so that removal never needs to reason about
/// lifetimes or shared ownership; freed slots are recycled via `free_list`.
pub struct RankingIndex {
    arena: Vec<Option<Node>>,
    free_list: Vec<NodeId>,
    index_of: HashMap<CustomerId, NodeId>,
    current_level: usize,
    count: i64,
    max_level: usize,
}

impl RankingIndex {
    /// Builds an empty index with the given maximum node height
    pub fn new(max_level: usize) -> Self {
        Self {
            arena: vec![Some(Node::head(max_level))],
            free_list: Vec::new(),
            index_of: HashMap::new(),
            current_level: 1,
            count: 0,
            max_level,
        }
    }

    /// Number of participating customers
    pub fn len(&self) -> i64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, customer_id: CustomerId) -> bool {
        self.index_of.contains_key(&customer_id)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.arena[id].as_ref().expect("dangling node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.arena[id].as_mut().expect("dangling node id")
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.arena[id] = Some(node);
            id
        } else {
            self.arena.push(Some(node));
            self.arena.len() - 1
        }
    }

    fn free(&mut self, id: NodeId) {
        self.arena[id] = None;
        self.free_list.push(id);
    }

    /// Descends the index collecting, at every active level, the last node
    /// whose key strictly precedes `(score, customer_id)`
    ///
    /// Returns the per-level predecessor and the accumulated rank at each
    /// level, both sized to `current_level`.
    fn locate(&self, score: Score, customer_id: CustomerId) -> (Vec<NodeId>, Vec<i64>) {
        let mut update = vec![HEAD; self.current_level];
        let mut rank = vec![0i64; self.current_level];
        let mut cursor = HEAD;

        for i in (0..self.current_level).rev() {
            rank[i] = if i + 1 < self.current_level {
                rank[i + 1]
            } else {
                0
            };
            loop {
                let Some(next_id) = self.node(cursor).forward_at(i) else {
                    break;
                };
                let next = self.node(next_id);
                if rank_order(next.score, next.customer_id, score, customer_id) == Ordering::Less
                {
                    rank[i] += self.node(cursor).span_at(i);
                    cursor = next_id;
                } else {
                    break;
                }
            }
            update[i] = cursor;
        }

        (update, rank)
    }

    /// Inserts a new customer at its score-ordered position
    ///
    /// Returns [`Error::Duplicate`] if the customer is already present;
    /// callers are expected to have already checked presence via the score
    /// map, so this is a defensive check rather than an expected path.
    pub fn insert(
        &mut self,
        customer_id: CustomerId,
        score: Score,
        rng: &mut impl Rng,
    ) -> Result<()> {
        if self.index_of.contains_key(&customer_id) {
            return Err(Error::Duplicate(customer_id));
        }

        let (mut update, mut rank) = self.locate(score, customer_id);

        let height = random_height(rng, self.max_level);
        if height > self.current_level {
            update.resize(height, HEAD);
            rank.resize(height, 0);
            for i in self.current_level..height {
                update[i] = HEAD;
                rank[i] = 0;
                self.node_mut(HEAD).span[i] = self.count + 1;
            }
            self.current_level = height;
        }

        let new_id = self.alloc(Node {
            customer_id,
            score,
            forward: vec![None; height],
            span: vec![0; height],
            backward: None,
        });

        for i in 0..height {
            let pred = update[i];
            let pred_forward = self.node(pred).forward[i];
            let pred_span = self.node(pred).span[i];

            self.node_mut(new_id).forward[i] = pred_forward;
            self.node_mut(new_id).span[i] = pred_span - (rank[0] - rank[i]);

            self.node_mut(pred).forward[i] = Some(new_id);
            self.node_mut(pred).span[i] = rank[0] - rank[i] + 1;
        }

        for i in height..self.current_level {
            let pred = update[i];
            self.node_mut(pred).span[i] += 1;
        }

        let pred0 = update[0];
        self.node_mut(new_id).backward = if pred0 == HEAD { None } else { Some(pred0) };
        if let Some(succ) = self.node(new_id).forward[0] {
            self.node_mut(succ).backward = Some(new_id);
        }

        self.index_of.insert(customer_id, new_id);
        self.count += 1;
        Ok(())
    }

    /// Removes a customer from the index
    pub fn remove(&mut self, customer_id: CustomerId) -> Result<()> {
        let target_id = *self
            .index_of
            .get(&customer_id)
            .ok_or(Error::Absent(customer_id))?;
        let score = self.node(target_id).score;

        let (update, _rank) = self.locate(score, customer_id);

        for i in 0..self.current_level {
            let pred = update[i];
            if self.node(pred).forward_at(i) == Some(target_id) {
                let bypass_span = self.node(target_id).span_at(i);
                let bypass_forward = self.node(target_id).forward_at(i);
                self.node_mut(pred).span[i] += bypass_span - 1;
                self.node_mut(pred).forward[i] = bypass_forward;
            } else {
                self.node_mut(pred).span[i] -= 1;
            }
        }

        if let Some(succ) = self.node(target_id).forward[0] {
            let backward = self.node(target_id).backward;
            self.node_mut(succ).backward = backward;
        }

        while self.current_level > 1 && self.node(HEAD).forward[self.current_level - 1].is_none()
        {
            self.current_level -= 1;
        }

        self.free(target_id);
        self.index_of.remove(&customer_id);
        self.count -= 1;
        Ok(())
    }

    /// Updates a customer's score in place when the ordering is preserved,
    /// or via remove-then-reinsert otherwise
    pub fn update_score(
        &mut self,
        customer_id: CustomerId,
        new_score: Score,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let node_id = *self
            .index_of
            .get(&customer_id)
            .ok_or(Error::Absent(customer_id))?;

        if self.node(node_id).score == new_score {
            return Ok(());
        }

        let pred_ok = match self.node(node_id).backward {
            None => true,
            Some(p) => {
                let pred = self.node(p);
                rank_order(pred.score, pred.customer_id, new_score, customer_id)
                    == Ordering::Less
            }
        };
        let succ_ok = match self.node(node_id).forward[0] {
            None => true,
            Some(s) => {
                let succ = self.node(s);
                rank_order(new_score, customer_id, succ.score, succ.customer_id)
                    == Ordering::Less
            }
        };

        if pred_ok && succ_ok {
            self.node_mut(node_id).score = new_score;
            Ok(())
        } else {
            self.remove(customer_id)?;
            self.insert(customer_id, new_score, rng)
        }
    }

    /// The 1-based rank of a participating customer, computed in O(log n)
    /// by descending while the next node precedes or equals the target
    fn rank_of(&self, node_id: NodeId) -> i64 {
        let target = self.node(node_id);
        let (score, customer_id) = (target.score, target.customer_id);

        let mut rank = 0i64;
        let mut cursor = HEAD;
        for i in (0..self.current_level).rev() {
            loop {
                let Some(next_id) = self.node(cursor).forward_at(i) else {
                    break;
                };
                let next = self.node(next_id);
                if rank_order(next.score, next.customer_id, score, customer_id) != Ordering::Greater
                {
                    rank += self.node(cursor).span_at(i);
                    cursor = next_id;
                    if next_id == node_id {
                        break;
                    }
                } else {
                    break;
                }
            }
            if cursor == node_id {
                break;
            }
        }
        rank
    }

    /// Returns the customers ranked `start..=end` (1-based, inclusive)
    ///
    /// An out-of-range or empty request (`start < 1`, `end < start`, or an
    /// empty index) yields an empty vector rather than an error.
    pub fn range_by_rank(&self, start: Rank, end: Rank) -> Vec<RankedEntry> {
        if start < 1 || end < start || self.count == 0 || start > self.count {
            return Vec::new();
        }
        let end = end.min(self.count);

        let mut rank = 0i64;
        let mut cursor = HEAD;
        for i in (0..self.current_level).rev() {
            loop {
                let Some(next_id) = self.node(cursor).forward_at(i) else {
                    break;
                };
                let span = self.node(cursor).span_at(i);
                if rank + span <= start {
                    rank += span;
                    cursor = next_id;
                } else {
                    break;
                }
            }
        }
        while rank < start {
            match self.node(cursor).forward_at(0) {
                Some(next_id) => {
                    cursor = next_id;
                    rank += 1;
                }
                None => break,
            }
        }

        let mut result = Vec::with_capacity((end - start + 1) as usize);
        while rank <= end && cursor != HEAD {
            let n = self.node(cursor);
            result.push(RankedEntry::new(n.customer_id, n.score, rank));
            match n.forward_at(0) {
                Some(next_id) => {
                    cursor = next_id;
                    rank += 1;
                }
                None => break,
            }
        }
        result
    }

    /// Returns up to `up` customers ranked immediately above, the customer
    /// itself, and up to `down` customers ranked immediately below
    ///
    /// Returns an empty vector if the customer is absent, or if `up` or
    /// `down` is negative (an invalid argument, per §7, that degrades to
    /// an empty result rather than a partial one).
    pub fn neighbors(&self, customer_id: CustomerId, up: i64, down: i64) -> Vec<RankedEntry> {
        if up < 0 || down < 0 {
            return Vec::new();
        }
        let Some(&node_id) = self.index_of.get(&customer_id) else {
            return Vec::new();
        };
        let rank = self.rank_of(node_id);

        let mut above = Vec::new();
        let mut cursor = node_id;
        for _ in 0..up {
            match self.node(cursor).backward {
                Some(p) => {
                    above.push(p);
                    cursor = p;
                }
                None => break,
            }
        }
        above.reverse();

        let mut result = Vec::with_capacity(above.len() as usize + 1 + down as usize);
        let mut r = rank - above.len() as i64;
        for id in above {
            let n = self.node(id);
            result.push(RankedEntry::new(n.customer_id, n.score, r));
            r += 1;
        }

        let n = self.node(node_id);
        result.push(RankedEntry::new(n.customer_id, n.score, rank));

        let mut cursor = node_id;
        let mut r = rank + 1;
        for _ in 0..down {
            match self.node(cursor).forward_at(0) {
                Some(next_id) => {
                    let n = self.node(next_id);
                    result.push(RankedEntry::new(n.customer_id, n.score, r));
                    r += 1;
                    cursor = next_id;
                }
                None => break,
            }
        }

        result
    }
}
