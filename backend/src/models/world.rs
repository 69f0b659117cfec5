//! World State
//!
//! The single mutable aggregate every transition reads and writes: the car's
//! position and direction, its door/activity flags, the three call-button
//! arrays, the per-floor waiting rosters and the in-car roster.
//!
//! # Critical Invariants
//!
//! 1. **Floor range**: `floor` stays within `[0, FLOOR_COUNT)`
//! 2. **Door flags**: `doors_busy` and `doors_idle` are never both set
//! 3. **Single roster**: a rider appears in at most one roster at a time

use crate::models::rider::RiderId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Floor index, 0 (bottom) through 4 (top)
pub type Floor = usize;

/// Number of floors served by the car
pub const FLOOR_COUNT: usize = 5;

/// Floor the car parks at when there is nothing to do
pub const HOME_FLOOR: Floor = 2;

/// Direction the car is committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    GoingUp,
    GoingDown,
    Neutral,
}

impl Direction {
    /// Single-character code used in trace lines
    pub fn code(&self) -> char {
        match self {
            Direction::GoingUp => 'U',
            Direction::GoingDown => 'D',
            Direction::Neutral => 'N',
        }
    }

    /// Direction that leads from `from` to `to`
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::Direction;
    ///
    /// assert_eq!(Direction::toward(2, 4), Direction::GoingUp);
    /// assert_eq!(Direction::toward(2, 0), Direction::GoingDown);
    /// assert_eq!(Direction::toward(2, 2), Direction::Neutral);
    /// ```
    pub fn toward(from: Floor, to: Floor) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::GoingUp,
            std::cmp::Ordering::Less => Direction::GoingDown,
            std::cmp::Ordering::Equal => Direction::Neutral,
        }
    }
}

/// Outstanding demand above and below the car, excluding its own floor
///
/// Passengers are riders already aboard (car calls); waiters are riders
/// queued on a floor (up/down buttons).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Demand {
    pub passenger_wants_up: bool,
    pub passenger_wants_down: bool,
    pub waiter_wants_up: bool,
    pub waiter_wants_down: bool,
}

impl Demand {
    /// Anything at all above the car
    pub fn above(&self) -> bool {
        self.passenger_wants_up || self.waiter_wants_up
    }

    /// Anything at all below the car
    pub fn below(&self) -> bool {
        self.passenger_wants_down || self.waiter_wants_down
    }
}

/// Complete mutable state of the building
///
/// # Example
///
/// ```rust
/// use elevator_sim_core_rs::{Direction, WorldState, HOME_FLOOR};
///
/// let world = WorldState::new();
/// assert_eq!(world.floor, HOME_FLOOR);
/// assert_eq!(world.direction, Direction::Neutral);
/// assert!(!world.has_call_at(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    /// Floor the car is at (or just passed)
    pub floor: Floor,

    /// Committed travel direction
    pub direction: Direction,

    /// Doors open and someone is getting in or out
    pub doors_busy: bool,

    /// The car has been active within the inactivity window
    pub recently_active: bool,

    /// Doors open but nobody is transferring
    pub doors_idle: bool,

    /// Up buttons pressed on each floor
    pub call_up: [bool; FLOOR_COUNT],

    /// Down buttons pressed on each floor
    pub call_down: [bool; FLOOR_COUNT],

    /// Destination buttons pressed inside the car
    pub call_car: [bool; FLOOR_COUNT],

    /// Riders queued on each floor, in arrival order
    pub waiting: [VecDeque<RiderId>; FLOOR_COUNT],

    /// Riders inside the car, most recently boarded first
    pub car: VecDeque<RiderId>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    /// Car parked at the home floor, doors shut, no calls, nobody around
    pub fn new() -> Self {
        Self {
            floor: HOME_FLOOR,
            direction: Direction::Neutral,
            doors_busy: false,
            recently_active: false,
            doors_idle: false,
            call_up: [false; FLOOR_COUNT],
            call_down: [false; FLOOR_COUNT],
            call_car: [false; FLOOR_COUNT],
            waiting: Default::default(),
            car: VecDeque::new(),
        }
    }

    /// Whether any button (up, down or car) is lit for `floor`
    pub fn has_call_at(&self, floor: Floor) -> bool {
        self.call_up[floor] || self.call_down[floor] || self.call_car[floor]
    }

    /// Whether any button anywhere is lit
    pub fn has_any_call(&self) -> bool {
        (0..FLOOR_COUNT).any(|floor| self.has_call_at(floor))
    }

    /// Scan every other floor for calls above and below the car
    pub fn demand(&self) -> Demand {
        let mut demand = Demand::default();
        for floor in (0..FLOOR_COUNT).filter(|&f| f != self.floor) {
            let above = floor > self.floor;
            if self.call_car[floor] {
                if above {
                    demand.passenger_wants_up = true;
                } else {
                    demand.passenger_wants_down = true;
                }
            }
            if self.call_up[floor] || self.call_down[floor] {
                if above {
                    demand.waiter_wants_up = true;
                } else {
                    demand.waiter_wants_down = true;
                }
            }
        }
        demand
    }

    /// Take a rider off a floor's waiting roster
    ///
    /// Returns whether the rider was queued there.
    pub fn remove_waiting(&mut self, floor: Floor, id: RiderId) -> bool {
        remove_unique(&mut self.waiting[floor], id)
    }

    /// Take a rider out of the car
    ///
    /// Returns whether the rider was aboard.
    pub fn remove_from_car(&mut self, id: RiderId) -> bool {
        remove_unique(&mut self.car, id)
    }

    /// Number of riders queued across all floors
    pub fn waiting_count(&self) -> usize {
        self.waiting.iter().map(VecDeque::len).sum()
    }

    /// Assert the structural invariants of the building
    ///
    /// # Panics
    /// Panics on the first violated invariant; in a closed deterministic
    /// simulation any violation is a logic defect.
    pub fn check_invariants(&self) {
        assert!(
            self.floor < FLOOR_COUNT,
            "car left the building: floor {}",
            self.floor
        );
        assert!(
            !(self.doors_busy && self.doors_idle),
            "doors cannot be both busy and idle"
        );

        let mut seen = std::collections::HashSet::new();
        for id in self.waiting.iter().flatten().chain(self.car.iter()) {
            assert!(seen.insert(*id), "{} appears in more than one roster", id);
        }
    }
}

/// Remove `id` from `roster`, asserting it occurs at most once
fn remove_unique(roster: &mut VecDeque<RiderId>, id: RiderId) -> bool {
    debug_assert!(roster.iter().filter(|&&r| r == id).count() <= 1);
    match roster.iter().position(|&r| r == id) {
        Some(pos) => {
            roster.remove(pos);
            true
        }
        None => false,
    }
}
