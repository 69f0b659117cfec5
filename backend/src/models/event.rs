//! Event logging for simulation traces and rider reports.
//!
//! Every task the driver fires produces one [`Event::Step`], recorded with
//! the world state as it was *before* the transition ran. With statistics
//! enabled, riders leaving the simulation add a report event right after the
//! step that caused it.
//!
//! The `Display` impl renders the exact line format of the reference trace,
//! so a log can be diffed against a recorded run byte for byte.
//!
//! # Example
//!
//! ```rust
//! use elevator_sim_core_rs::models::event::{Event, EventLog};
//! use elevator_sim_core_rs::Direction;
//!
//! let mut log = EventLog::new();
//! log.log(Event::Step {
//!     time: 20,
//!     direction: Direction::GoingDown,
//!     floor: 2,
//!     doors_busy: false,
//!     recently_active: false,
//!     doors_idle: false,
//!     label: "E6".to_string(),
//! });
//!
//! assert_eq!(log.events()[0].to_string(), "0020 D 2 0 0 0 E6");
//! ```

use crate::core::time::{format_tenths, Duration, Time};
use crate::models::world::{Direction, Floor};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A task fired
    Step {
        time: Time,
        direction: Direction,
        floor: Floor,
        doors_busy: bool,
        recently_active: bool,
        doors_idle: bool,
        /// Family letter plus resume point, e.g. `E4`
        label: String,
    },

    /// A rider gave up waiting
    RiderAbandoned {
        time: Time,
        rider: usize,
        floor: Floor,
        waited: Duration,
    },

    /// A rider reached its destination
    RiderDelivered {
        time: Time,
        rider: usize,
        entry_floor: Floor,
        waited: Duration,
        rode: Duration,
        max_occupancy: usize,
        stopped_at: Vec<Floor>,
    },
}

impl Event {
    /// Simulated time the event happened at
    pub fn time(&self) -> Time {
        match self {
            Event::Step { time, .. } => *time,
            Event::RiderAbandoned { time, .. } => *time,
            Event::RiderDelivered { time, .. } => *time,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Step { .. } => "Step",
            Event::RiderAbandoned { .. } => "RiderAbandoned",
            Event::RiderDelivered { .. } => "RiderDelivered",
        }
    }

    /// Rider number if the event is a rider report
    pub fn rider(&self) -> Option<usize> {
        match self {
            Event::RiderAbandoned { rider, .. } => Some(*rider),
            Event::RiderDelivered { rider, .. } => Some(*rider),
            Event::Step { .. } => None,
        }
    }
}

fn flag(set: bool) -> char {
    if set {
        'X'
    } else {
        '0'
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Step {
                time,
                direction,
                floor,
                doors_busy,
                recently_active,
                doors_idle,
                label,
            } => write!(
                f,
                "{:04} {} {} {} {} {} {}",
                time,
                direction.code(),
                floor,
                flag(*doors_busy),
                flag(*recently_active),
                flag(*doors_idle),
                label
            ),
            Event::RiderAbandoned {
                rider,
                floor,
                waited,
                ..
            } => write!(
                f,
                "User {} walked after {} waiting in the queue on floor {}",
                rider,
                format_tenths(*waited),
                floor
            ),
            Event::RiderDelivered {
                rider,
                entry_floor,
                waited,
                rode,
                max_occupancy,
                stopped_at,
                ..
            } => {
                write!(
                    f,
                    "User {} arrived after {} waiting in the queue on floor {} followed by {} in the elevator. Max occupancy {}. Stopped at floors",
                    rider,
                    format_tenths(*waited),
                    entry_floor,
                    format_tenths(*rode),
                    max_occupancy
                )?;
                for floor in stopped_at {
                    write!(f, " {}", floor)?;
                }
                write!(f, ".")
            }
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// Besides the retained events, the log keeps a running SHA-256 over every
/// rendered line ever logged. Draining the log for streaming output does not
/// reset the digest, so two runs can be compared for byte identity either way.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    hasher: Sha256,
    total_logged: usize,
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events)
            .field("total_logged", &self.total_logged)
            .finish()
    }
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.hasher.update(event.to_string().as_bytes());
        self.hasher.update(b"\n");
        self.total_logged += 1;
        self.events.push(event);
    }

    /// Number of events currently retained
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events logged since creation, including drained ones
    pub fn total_logged(&self) -> usize {
        self.total_logged
    }

    /// Get all retained events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get retained events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get retained report events for one rider
    pub fn events_for_rider(&self, rider: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.rider() == Some(rider))
            .collect()
    }

    /// Take all retained events, leaving the digest intact
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Hex SHA-256 of every line logged so far
    pub fn digest(&self) -> String {
        format!("{:x}", self.hasher.clone().finalize())
    }

    /// Render retained events one per line
    pub fn render(&self) -> String {
        self.events.iter().map(|e| format!("{}\n", e)).collect()
    }
}
