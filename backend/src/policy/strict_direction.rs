//! Strict-Direction Boarding Policy
//!
//! Alternate dispatch variant: a rider only treats the car as present if it
//! is not committed to the opposite direction, and while the doors are open
//! only riders heading the car's way (or anyone, if the car is Neutral) are
//! let in. Riders skipped this way stay queued for a later visit.

use super::BoardingPolicy;
use crate::models::world::{Direction, Floor, WorldState};

/// Direction-matching policy
///
/// # Example
///
/// ```
/// use elevator_sim_core_rs::policy::{BoardingPolicy, StrictDirectionPolicy};
/// use elevator_sim_core_rs::{Direction, WorldState};
///
/// let mut world = WorldState::new();
/// world.direction = Direction::GoingUp;
///
/// let policy = StrictDirectionPolicy::new();
/// assert!(!policy.car_available(&world, 2, 0)); // wants down, car goes up
/// assert!(policy.car_available(&world, 2, 4));
/// assert!(!policy.may_board(&world, 1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictDirectionPolicy;

impl StrictDirectionPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl BoardingPolicy for StrictDirectionPolicy {
    fn name(&self) -> &'static str {
        "strict_direction"
    }

    fn car_available(&self, world: &WorldState, entry: Floor, exit: Floor) -> bool {
        let avoid = if exit < entry {
            Direction::GoingUp
        } else {
            Direction::GoingDown
        };
        world.floor == entry && world.direction != avoid
    }

    fn may_board(&self, world: &WorldState, exit: Floor) -> bool {
        match world.direction {
            Direction::Neutral => true,
            Direction::GoingUp => exit > world.floor,
            Direction::GoingDown => exit < world.floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_car_takes_anyone() {
        let world = WorldState::new();
        assert!(StrictDirectionPolicy.car_available(&world, 2, 0));
        assert!(StrictDirectionPolicy.car_available(&world, 2, 4));
        assert!(StrictDirectionPolicy.may_board(&world, 0));
        assert!(StrictDirectionPolicy.may_board(&world, 4));
    }

    #[test]
    fn test_descending_car_refuses_upward_riders() {
        let mut world = WorldState::new();
        world.direction = Direction::GoingDown;
        assert!(!StrictDirectionPolicy.may_board(&world, 3));
        assert!(StrictDirectionPolicy.may_board(&world, 1));
        assert!(!StrictDirectionPolicy.car_available(&world, 2, 3));
    }
}
