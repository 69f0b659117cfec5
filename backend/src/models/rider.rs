//! Riders and the arena that owns them
//!
//! Riders are referenced by handle from several places at once: a floor's
//! waiting roster or the in-car roster, and the scheduler's pending
//! sequence. The arena hands out stable [`RiderId`]s and keeps the records;
//! everything else stores only ids.
//!
//! A rider's slot is reserved when its arrival task is created, before the
//! arrival fires and the trip is known, so slots move through
//! `Expected → Active → Departed`.

use crate::core::time::{Duration, Time};
use crate::models::world::{Floor, FLOOR_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiderId(usize);

impl RiderId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the arena
    pub fn index(&self) -> usize {
        self.0
    }

    /// 1-based rider number used in reports
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {}", self.number())
    }
}

/// A person who has arrived in the building
///
/// Besides the trip itself, a rider carries instrumentation for the
/// per-rider reports: when it queued, when it boarded, the fullest the car
/// got while it was aboard, and every floor the doors opened at on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    entry_floor: Floor,
    exit_floor: Floor,
    arrived_at: Time,
    boarded_at: Option<Time>,
    max_occupancy: usize,
    stopped_at: Vec<Floor>,
}

impl Rider {
    /// Create a rider queueing at `entry_floor` for `exit_floor`
    ///
    /// # Panics
    /// Panics if either floor is outside the building or they coincide.
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::models::rider::Rider;
    ///
    /// let rider = Rider::new(0, 2, 0);
    /// assert_eq!(rider.boarded_at(), None);
    /// ```
    pub fn new(entry_floor: Floor, exit_floor: Floor, arrived_at: Time) -> Self {
        assert!(
            entry_floor < FLOOR_COUNT && exit_floor < FLOOR_COUNT,
            "rider trip {} -> {} leaves the building",
            entry_floor,
            exit_floor
        );
        assert_ne!(entry_floor, exit_floor, "rider must travel to another floor");
        Self {
            entry_floor,
            exit_floor,
            arrived_at,
            boarded_at: None,
            max_occupancy: 0,
            stopped_at: Vec::new(),
        }
    }

    pub fn entry_floor(&self) -> Floor {
        self.entry_floor
    }

    pub fn exit_floor(&self) -> Floor {
        self.exit_floor
    }

    pub fn arrived_at(&self) -> Time {
        self.arrived_at
    }

    pub fn boarded_at(&self) -> Option<Time> {
        self.boarded_at
    }

    pub fn max_occupancy(&self) -> usize {
        self.max_occupancy
    }

    /// Floors where the doors opened while this rider was aboard
    pub fn stopped_at(&self) -> &[Floor] {
        &self.stopped_at
    }

    /// Time spent in the floor queue, up to boarding or `now`
    pub fn time_waiting(&self, now: Time) -> Duration {
        self.boarded_at.unwrap_or(now) - self.arrived_at
    }

    /// Time spent in the car as of `now` (zero if never boarded)
    pub fn time_riding(&self, now: Time) -> Duration {
        self.boarded_at.map_or(0, |boarded| now - boarded)
    }

    pub fn record_boarding(&mut self, now: Time) {
        self.boarded_at = Some(now);
    }

    pub fn observe_occupancy(&mut self, occupancy: usize) {
        self.max_occupancy = self.max_occupancy.max(occupancy);
    }

    pub fn record_stop(&mut self, floor: Floor) {
        self.stopped_at.push(floor);
    }
}

/// How a rider left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderOutcome {
    /// Reached the destination floor
    Delivered,
    /// Walked away from the queue
    Abandoned,
}

#[derive(Debug, Clone)]
enum RiderSlot {
    /// Arrival task scheduled, trip not drawn yet
    Expected,
    Active(Rider),
    Departed(RiderOutcome),
}

/// Growable store of riders addressed by stable handles
#[derive(Debug, Clone, Default)]
pub struct RiderArena {
    slots: Vec<RiderSlot>,
}

impl RiderArena {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Reserve a handle for a rider whose arrival has been scheduled
    pub fn reserve(&mut self) -> RiderId {
        self.slots.push(RiderSlot::Expected);
        RiderId(self.slots.len() - 1)
    }

    /// Fill a reserved slot once the rider actually arrives
    ///
    /// # Panics
    /// Panics if the slot was not reserved or is already occupied.
    pub fn admit(&mut self, id: RiderId, rider: Rider) {
        match self.slots.get_mut(id.0) {
            Some(slot @ RiderSlot::Expected) => *slot = RiderSlot::Active(rider),
            other => panic!("{} cannot arrive from slot state {:?}", id, other),
        }
    }

    /// Look up a rider currently in the building
    pub fn get(&self, id: RiderId) -> Option<&Rider> {
        match self.slots.get(id.0) {
            Some(RiderSlot::Active(rider)) => Some(rider),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: RiderId) -> Option<&mut Rider> {
        match self.slots.get_mut(id.0) {
            Some(RiderSlot::Active(rider)) => Some(rider),
            _ => None,
        }
    }

    /// Rider that must be in the building
    ///
    /// # Panics
    /// Panics if `id` does not refer to an active rider.
    pub fn rider(&self, id: RiderId) -> &Rider {
        self.get(id)
            .unwrap_or_else(|| panic!("{} is not in the building", id))
    }

    /// Mutable counterpart of [`RiderArena::rider`]
    pub fn rider_mut(&mut self, id: RiderId) -> &mut Rider {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("{} is not in the building", id))
    }

    /// Remove a rider from the building, returning its final record
    ///
    /// # Panics
    /// Panics if `id` does not refer to an active rider.
    pub fn depart(&mut self, id: RiderId, outcome: RiderOutcome) -> Rider {
        let slot = self
            .slots
            .get_mut(id.0)
            .unwrap_or_else(|| panic!("{} was never reserved", id));
        match std::mem::replace(slot, RiderSlot::Departed(outcome)) {
            RiderSlot::Active(rider) => rider,
            other => panic!("{} cannot depart from slot state {:?}", id, other),
        }
    }

    /// Outcome of a departed rider
    pub fn outcome(&self, id: RiderId) -> Option<RiderOutcome> {
        match self.slots.get(id.0) {
            Some(RiderSlot::Departed(outcome)) => Some(*outcome),
            _ => None,
        }
    }

    /// Riders currently in the building, in arrival order
    pub fn active(&self) -> impl Iterator<Item = (RiderId, &Rider)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            RiderSlot::Active(rider) => Some((RiderId(i), rider)),
            _ => None,
        })
    }

    /// Number of riders that have actually arrived
    pub fn arrived_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !matches!(slot, RiderSlot::Expected))
            .count()
    }

    /// Number of departed riders with the given outcome
    pub fn count_outcome(&self, outcome: RiderOutcome) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, RiderSlot::Departed(o) if *o == outcome))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_through_arena() {
        let mut arena = RiderArena::new();
        let id = arena.reserve();
        assert!(arena.get(id).is_none());

        arena.admit(id, Rider::new(3, 1, 291));
        assert_eq!(arena.rider(id).entry_floor(), 3);
        assert_eq!(arena.arrived_count(), 1);

        let rider = arena.depart(id, RiderOutcome::Delivered);
        assert_eq!(rider.exit_floor(), 1);
        assert!(arena.get(id).is_none());
        assert_eq!(arena.outcome(id), Some(RiderOutcome::Delivered));
        assert_eq!(arena.count_outcome(RiderOutcome::Delivered), 1);
        assert_eq!(arena.count_outcome(RiderOutcome::Abandoned), 0);
    }

    #[test]
    fn test_rider_numbers_are_one_based() {
        let mut arena = RiderArena::new();
        let first = arena.reserve();
        let second = arena.reserve();
        assert_eq!(first.number(), 1);
        assert_eq!(second.number(), 2);
        assert_eq!(second.to_string(), "User 2");
    }

    #[test]
    #[should_panic(expected = "rider must travel to another floor")]
    fn test_rider_needs_distinct_floors() {
        Rider::new(2, 2, 0);
    }

    #[test]
    #[should_panic(expected = "cannot depart")]
    fn test_double_departure_panics() {
        let mut arena = RiderArena::new();
        let id = arena.reserve();
        arena.admit(id, Rider::new(0, 4, 0));
        arena.depart(id, RiderOutcome::Abandoned);
        arena.depart(id, RiderOutcome::Abandoned);
    }

    #[test]
    fn test_wait_and_ride_durations() {
        let mut rider = Rider::new(2, 1, 136);
        assert_eq!(rider.time_waiting(500), 364);
        rider.record_boarding(908);
        rider.observe_occupancy(2);
        rider.observe_occupancy(4);
        rider.observe_occupancy(3);
        assert_eq!(rider.time_waiting(2000), 772);
        assert_eq!(rider.time_riding(1108), 200);
        assert_eq!(rider.max_occupancy(), 4);
    }
}
