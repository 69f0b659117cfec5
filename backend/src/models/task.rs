//! Task identities and resume points
//!
//! A task is anything the scheduler can fire: the elevator car, its two
//! auxiliary monitors (door close, inactivity), and one task per rider.
//! Each task carries a *resume point*, the named step its transition logic
//! runs next. Resume points are plain data so that one state machine can
//! read and overwrite another's (the car handing a waiting rider its
//! boarding step, a rider kicking the idle car back into its door cycle).
//!
//! Resume points keep the numbering of the reference trace, which is why the
//! car's points are not contiguous (1, 2, 3, 4, 6, 7, 71, 8, 81) and the
//! monitors use 5 and 9.

use crate::models::rider::RiderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a schedulable task
///
/// The set is closed: the three car tasks live for the whole run, rider
/// tasks come and go with their riders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskId {
    /// The elevator car itself
    Car,
    /// Closes the doors once nobody is transferring
    DoorMonitor,
    /// Clears the recent-activity flag after a long quiet spell
    InactivityMonitor,
    /// One arriving person
    Rider(RiderId),
}

/// Steps of the elevator car's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CarStep {
    /// Parked at the home floor waiting for a call
    WaitForCall = 1,
    /// Re-evaluate direction on arrival, then open doors
    ChangeOfState = 2,
    /// Open the doors and arm both monitors
    OpenDoors = 3,
    /// Let one rider out or in per firing
    Transfer = 4,
    /// Doors are shut; clear served calls and pick a direction
    PrepareToMove = 6,
    /// Move up one floor
    GoUp = 7,
    /// Decide whether to stop at the floor just reached going up
    ArriveUp = 71,
    /// Move down one floor
    GoDown = 8,
    /// Decide whether to stop at the floor just reached going down
    ArriveDown = 81,
}

/// Steps of a rider's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RiderStep {
    /// Show up, press a button, join the floor's queue
    Arrive = 1,
    /// Patience ran out
    GiveUp = 4,
    /// Step into the car (only ever handed over by the car)
    Board = 5,
    /// Step out at the destination (only ever handed over by the car)
    Disembark = 6,
}

/// Next step a task will run when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResumePoint {
    Car(CarStep),
    /// Door monitor's only step
    CloseDoors,
    /// Inactivity monitor's only step
    SetInactive,
    Rider(RiderStep),
}

impl ResumePoint {
    /// Numeric step identifier as printed in trace labels
    pub fn number(&self) -> u8 {
        match self {
            ResumePoint::Car(step) => *step as u8,
            ResumePoint::CloseDoors => 5,
            ResumePoint::SetInactive => 9,
            ResumePoint::Rider(step) => *step as u8,
        }
    }

    /// Whether this resume point exists in `task`'s state machine
    pub fn belongs_to(&self, task: TaskId) -> bool {
        matches!(
            (task, self),
            (TaskId::Car, ResumePoint::Car(_))
                | (TaskId::DoorMonitor, ResumePoint::CloseDoors)
                | (TaskId::InactivityMonitor, ResumePoint::SetInactive)
                | (TaskId::Rider(_), ResumePoint::Rider(_))
        )
    }

    /// Family letter of the state machine owning this point
    pub fn family(&self) -> char {
        match self {
            ResumePoint::Rider(_) => 'U',
            _ => 'E',
        }
    }
}

impl fmt::Display for ResumePoint {
    /// Trace label, e.g. `E71` or `U5`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family(), self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_trace_format() {
        assert_eq!(ResumePoint::Car(CarStep::ArriveUp).to_string(), "E71");
        assert_eq!(ResumePoint::Car(CarStep::WaitForCall).to_string(), "E1");
        assert_eq!(ResumePoint::CloseDoors.to_string(), "E5");
        assert_eq!(ResumePoint::SetInactive.to_string(), "E9");
        assert_eq!(ResumePoint::Rider(RiderStep::Board).to_string(), "U5");
    }

    #[test]
    fn test_resume_points_bound_to_their_family() {
        let rider = TaskId::Rider(RiderId::new(3));
        assert!(ResumePoint::Rider(RiderStep::GiveUp).belongs_to(rider));
        assert!(!ResumePoint::Car(CarStep::Transfer).belongs_to(rider));
        assert!(!ResumePoint::SetInactive.belongs_to(TaskId::DoorMonitor));
        assert!(ResumePoint::SetInactive.belongs_to(TaskId::InactivityMonitor));
    }
}
