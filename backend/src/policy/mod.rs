//! Boarding Policy Module
//!
//! Decides when a waiting rider considers the car "available" and which
//! queued riders may step in while the doors are open.
//!
//! # Policies
//!
//! 1. **Fifo**: the car is available whenever it is on the rider's floor,
//!    and riders board strictly in arrival order (default).
//! 2. **StrictDirection**: a rider ignores a car committed to the opposite
//!    direction, and only riders heading the car's way may board.
//!
//! # Policy Interface
//!
//! ```rust
//! use elevator_sim_core_rs::policy::BoardingPolicy;
//! use elevator_sim_core_rs::{Floor, WorldState};
//!
//! struct GroundFloorOnly;
//!
//! impl BoardingPolicy for GroundFloorOnly {
//!     fn name(&self) -> &'static str {
//!         "ground_floor_only"
//!     }
//!
//!     fn car_available(&self, world: &WorldState, entry: Floor, _exit: Floor) -> bool {
//!         world.floor == entry && entry == 0
//!     }
//!
//!     fn may_board(&self, _world: &WorldState, _exit: Floor) -> bool {
//!         true
//!     }
//! }
//! ```

use crate::models::world::{Floor, WorldState};
use serde::{Deserialize, Serialize};

pub mod fifo;
pub mod strict_direction;

pub use fifo::FifoPolicy;
pub use strict_direction::StrictDirectionPolicy;

/// Rider-side view of the car
pub trait BoardingPolicy {
    /// Policy identifier for logs
    fn name(&self) -> &'static str;

    /// Whether a rider at `entry` bound for `exit` treats the car as present
    ///
    /// Consulted when a rider arrives (can it skip pressing a button?) and
    /// when its patience runs out (is service under way?).
    fn car_available(&self, world: &WorldState, entry: Floor, exit: Floor) -> bool;

    /// Whether a rider queued at the car's floor and bound for `exit` may
    /// board right now
    fn may_board(&self, world: &WorldState, exit: Floor) -> bool;
}

/// Policy selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConfig {
    /// First come, first served
    #[default]
    Fifo,
    /// Riders refuse a car going the wrong way
    StrictDirection,
}

impl PolicyConfig {
    /// Instantiate the configured policy
    pub fn build(&self) -> Box<dyn BoardingPolicy> {
        match self {
            PolicyConfig::Fifo => Box::new(FifoPolicy::new()),
            PolicyConfig::StrictDirection => Box::new(StrictDirectionPolicy::new()),
        }
    }
}
