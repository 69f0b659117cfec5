//! xorshift64* random number generator
//!
//! xorshift64* keeps 64 bits of state and scrambles its output with a
//! multiplication, which is plenty for drawing floors and delays.
//!
//! Same seed → same arrival stream → same event log.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use elevator_sim_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let floor = rng.between(0, 4); // [0, 4]
/// assert!((0..=4).contains(&floor));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed would lock xorshift at zero forever, so it is mapped to 1.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let gap = rng.range(10, 901);
    /// assert!(gap >= 10 && gap < 901);
    /// ```
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate random value in the closed range [lo, hi]
    ///
    /// # Panics
    /// Panics if lo > hi
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.between(3, 3), 3);
    /// ```
    pub fn between(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "lo must not exceed hi");
        self.range(lo, hi + 1)
    }

    /// Get current RNG state (for replaying a stream from a known point)
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let mut replay = RngManager::new(rng.get_state());
    /// assert_eq!(rng.next(), replay.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
