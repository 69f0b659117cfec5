//! Arrival generation module for deterministic rider creation.
//!
//! Produces one rider-arrival description at a time: where the rider gets
//! on, where it gets off, how long it is willing to wait, and how long until
//! the next rider shows up.
//!
//! # Sources
//!
//! 1. **Random**: floors and delays drawn from the seeded [`RngManager`]
//! 2. **Recorded**: a fixed table replayed in order, then random once the
//!    table runs out. The default table is the 11-rider reference dataset
//!    used for golden-trace comparison.
//!
//! # Example
//!
//! ```
//! use elevator_sim_core_rs::arrivals::{ArrivalConfig, ArrivalGenerator, ArrivalSource};
//! use elevator_sim_core_rs::rng::RngManager;
//!
//! let mut rng = RngManager::new(42);
//! let mut generator = ArrivalGenerator::new(ArrivalSource::recorded(), ArrivalConfig::default());
//!
//! let first = generator.next_arrival(&mut rng);
//! assert_eq!((first.entry_floor, first.exit_floor), (0, 2));
//! assert_eq!(first.patience, 152);
//! ```

use crate::core::time::{Duration, MAX_DELAY};
use crate::models::world::{Floor, FLOOR_COUNT};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Everything the simulation needs to know about one arriving rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderArrival {
    /// Floor the rider enters on
    pub entry_floor: Floor,
    /// Destination floor (never equal to `entry_floor`)
    pub exit_floor: Floor,
    /// How long the rider waits before giving up
    pub patience: Duration,
    /// Delay until the next rider arrives
    pub inter_arrival: Duration,
}

impl RiderArrival {
    pub const fn new(
        entry_floor: Floor,
        exit_floor: Floor,
        patience: Duration,
        inter_arrival: Duration,
    ) -> Self {
        Self {
            entry_floor,
            exit_floor,
            patience,
            inter_arrival,
        }
    }

    /// Check the arrival describes a real trip
    pub fn validate(&self) -> Result<(), String> {
        if self.entry_floor >= FLOOR_COUNT || self.exit_floor >= FLOOR_COUNT {
            return Err(format!(
                "trip {} -> {} leaves the building",
                self.entry_floor, self.exit_floor
            ));
        }
        if self.entry_floor == self.exit_floor {
            return Err(format!("trip starts and ends on floor {}", self.entry_floor));
        }
        if !(0..=MAX_DELAY).contains(&self.patience) {
            return Err(format!("patience {} outside 0..={}", self.patience, MAX_DELAY));
        }
        if !(1..=MAX_DELAY).contains(&self.inter_arrival) {
            return Err(format!(
                "inter-arrival gap {} outside 1..={}",
                self.inter_arrival, MAX_DELAY
            ));
        }
        Ok(())
    }
}

/// Reference dataset: 11 riders, ending with a long pause before the 12th
pub const RECORDED_ARRIVALS: [RiderArrival; 11] = [
    RiderArrival::new(0, 2, 152, 38),
    RiderArrival::new(4, 1, 36_000, 98),
    RiderArrival::new(2, 1, 36_000, 5),
    RiderArrival::new(2, 1, 36_000, 150),
    RiderArrival::new(3, 1, 36_000, 73),
    RiderArrival::new(2, 1, 176, 238),
    RiderArrival::new(1, 2, 36_000, 225),
    RiderArrival::new(1, 0, 36_000, 49),
    RiderArrival::new(1, 3, 36_000, 172),
    RiderArrival::new(0, 4, 36_000, 3_336),
    RiderArrival::new(2, 3, 36_000, 461),
];

/// Ranges for randomly drawn arrivals (both ends inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// How long a rider waits before walking away
    pub patience_range: (Duration, Duration),

    /// Gap until the next rider
    pub inter_arrival_range: (Duration, Duration),
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            patience_range: (300, 1200),
            inter_arrival_range: (10, 900),
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> Result<(), String> {
        let (patience_lo, patience_hi) = self.patience_range;
        if patience_lo < 0 || patience_lo > patience_hi || patience_hi > MAX_DELAY {
            return Err(format!(
                "patience_range ({}, {}) must be ordered and within 0..={}",
                patience_lo, patience_hi, MAX_DELAY
            ));
        }
        let (gap_lo, gap_hi) = self.inter_arrival_range;
        if gap_lo < 1 || gap_lo > gap_hi || gap_hi > MAX_DELAY {
            return Err(format!(
                "inter_arrival_range ({}, {}) must be ordered and within 1..={}",
                gap_lo, gap_hi, MAX_DELAY
            ));
        }
        Ok(())
    }
}

/// Where arrivals come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrivalSource {
    /// Seeded random arrivals only
    Random,
    /// Replay `arrivals` first, then continue with random ones
    Recorded { arrivals: Vec<RiderArrival> },
}

impl ArrivalSource {
    /// The reference dataset
    pub fn recorded() -> Self {
        ArrivalSource::Recorded {
            arrivals: RECORDED_ARRIVALS.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ArrivalSource::Random => Ok(()),
            ArrivalSource::Recorded { arrivals } => {
                for (i, arrival) in arrivals.iter().enumerate() {
                    arrival
                        .validate()
                        .map_err(|e| format!("recorded arrival {}: {}", i + 1, e))?;
                }
                Ok(())
            }
        }
    }
}

/// Generator handing out arrivals one at a time
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    /// Recorded arrivals not yet handed out
    recorded: VecDeque<RiderArrival>,

    /// Ranges for random arrivals
    config: ArrivalConfig,
}

impl ArrivalGenerator {
    pub fn new(source: ArrivalSource, config: ArrivalConfig) -> Self {
        let recorded = match source {
            ArrivalSource::Random => VecDeque::new(),
            ArrivalSource::Recorded { arrivals } => arrivals.into(),
        };
        Self { recorded, config }
    }

    /// Produce the next arrival
    ///
    /// Recorded entries are used first; the RNG is only touched once they
    /// are exhausted.
    pub fn next_arrival(&mut self, rng: &mut RngManager) -> RiderArrival {
        match self.recorded.pop_front() {
            Some(arrival) => arrival,
            None => self.sample(rng),
        }
    }

    /// Draw a random arrival
    ///
    /// The exit floor is an offset of 1..=4 floors from the entry, wrapping
    /// around the top, so it can never equal the entry floor.
    fn sample(&self, rng: &mut RngManager) -> RiderArrival {
        let top = FLOOR_COUNT as i64 - 1;
        let entry_floor = rng.between(0, top) as Floor;
        let exit_floor = (entry_floor + rng.between(1, top) as Floor) % FLOOR_COUNT;
        let (patience_lo, patience_hi) = self.config.patience_range;
        let patience = rng.between(patience_lo, patience_hi);
        let (gap_lo, gap_hi) = self.config.inter_arrival_range;
        let inter_arrival = rng.between(gap_lo, gap_hi);

        RiderArrival {
            entry_floor,
            exit_floor,
            patience,
            inter_arrival,
        }
    }
}
