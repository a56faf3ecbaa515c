//! Arena node representation for the ranking index

use leaderboard_core::{CustomerId, Score};

/// Index into [`super::RankingIndex`]'s arena
///
/// The head sentinel always lives at index 0.
pub(crate) type NodeId = usize;

pub(crate) const HEAD: NodeId = 0;

/// A single skip list node: a participating customer or the head sentinel
///
/// `forward` and `span` are always the same length, equal to the node's
/// height. `span[i]` is the count of bottom-level steps from this node to
/// `forward[i]`'s target; it is only meaningful when `forward[i]` is `Some`.
#[derive(Debug)]
pub(crate) struct Node {
    pub customer_id: CustomerId,
    pub score: Score,
    pub forward: Vec<Option<NodeId>>,
    pub span: Vec<i64>,
    pub backward: Option<NodeId>,
}

impl Node {
    pub fn head(max_level: usize) -> Self {
        Self {
            customer_id: 0,
            score: Score::ZERO,
            forward: vec![None; max_level],
            span: vec![0; max_level],
            backward: None,
        }
    }

    /// The forward link at `level`, or `None` if this node has no presence there
    pub fn forward_at(&self, level: usize) -> Option<NodeId> {
        self.forward.get(level).copied().flatten()
    }

    /// The span at `level`, or `0` if this node has no presence there
    pub fn span_at(&self, level: usize) -> i64 {
        self.span.get(level).copied().unwrap_or(0)
    }
}
