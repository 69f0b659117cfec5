//! FIFO (First-In-First-Out) Boarding Policy
//!
//! Baseline behavior: the car counts as available to anyone on its floor,
//! and the transfer step takes waiting riders in queue order regardless of
//! where they are headed.

use super::BoardingPolicy;
use crate::models::world::{Floor, WorldState};

/// FIFO policy: first queued, first boarded
///
/// # Example
///
/// ```
/// use elevator_sim_core_rs::policy::{BoardingPolicy, FifoPolicy};
/// use elevator_sim_core_rs::{Direction, WorldState};
///
/// let mut world = WorldState::new();
/// world.direction = Direction::GoingUp;
///
/// let policy = FifoPolicy::new();
/// assert!(policy.car_available(&world, 2, 0));
/// assert!(policy.may_board(&world, 0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl FifoPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl BoardingPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn car_available(&self, world: &WorldState, entry: Floor, _exit: Floor) -> bool {
        world.floor == entry
    }

    fn may_board(&self, _world: &WorldState, _exit: Floor) -> bool {
        true
    }
}
