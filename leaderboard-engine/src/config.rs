//! Configuration for the leaderboard engine

/// Configuration options for the [`LeaderboardEngine`](crate::LeaderboardEngine)
///
/// Every field is a build-time constant per the design's recommended
/// defaults; there is no environment variable or config file loading. The
/// values are constructor parameters so that tests can exercise small
/// stripe counts and heights deterministically.
///
/// # Example
///
/// ```
/// use leaderboard_engine::LeaderboardConfig;
///
/// let config = LeaderboardConfig {
///     stripe_count: 1024,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardConfig {
    /// Number of stripes in the per-customer mutex array
    ///
    /// Must be a power of two so that stripe selection can use a bitmask
    /// instead of a modulo. Recommended default: 4,096.
    pub stripe_count: usize,

    /// Maximum height a ranking index node may be assigned
    ///
    /// Recommended default: 32, matching the sentinel head's height.
    pub max_level: usize,

    /// Expected participant count, used only to pre-size the score map
    pub capacity_hint: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            stripe_count: 4096,
            max_level: 32,
            capacity_hint: 0,
        }
    }
}

impl LeaderboardConfig {
    /// Index of the stripe a customer id maps to: `|id| mod stripe_count`
    ///
    /// `stripe_count` is expected to be a power of two; non-power-of-two
    /// values still work correctly (via `%`) but lose the bitmask fast path.
    pub fn stripe_of(&self, customer_id: i64) -> usize {
        let magnitude = customer_id.unsigned_abs() as usize;
        if self.stripe_count.is_power_of_two() {
            magnitude & (self.stripe_count - 1)
        } else {
            magnitude % self.stripe_count
        }
    }
}
