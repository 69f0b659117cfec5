//! Elevator Simulator Core - Rust Engine
//!
//! Discrete-event simulation of a single elevator car serving five floors,
//! with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Time units and the simulation clock
//! - **models**: Domain types (WorldState, Rider, TaskId, Event)
//! - **scheduler**: Ordered pending sequence of restartable tasks
//! - **elevator**: Car state machine plus door and inactivity monitors
//! - **rider**: Rider state machine
//! - **dispatch**: Direction decision for an uncommitted car
//! - **policy**: Boarding policies (who may get in, when the car is "here")
//! - **arrivals**: Recorded and random rider arrivals
//! - **orchestrator**: Main simulation loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All times are i64 tenths of a second
//! 2. All randomness is deterministic (seeded RNG)
//! 3. A task is pending at most once
//! 4. Internal inconsistencies panic; they are never recovered from
//!
//! # Example
//!
//! ```rust
//! use elevator_sim_core_rs::{Direction, SimClock, WorldState, HOME_FLOOR};
//!
//! let world = WorldState::new();
//! assert_eq!(world.floor, HOME_FLOOR);
//! assert_eq!(world.direction, Direction::Neutral);
//! assert_eq!(SimClock::new().now(), 0);
//! ```

// Module declarations
pub mod arrivals;
pub mod core;
pub mod dispatch;
pub mod elevator;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rider;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, ArrivalGenerator, ArrivalSource, RiderArrival};
pub use core::time::{format_tenths, Duration, SimClock, Time, MAX_DELAY, ONE_HOUR};
pub use dispatch::{Decision, DecisionTrigger};
pub use models::{
    event::{Event, EventLog},
    rider::{Rider, RiderArena, RiderId, RiderOutcome},
    task::{CarStep, ResumePoint, RiderStep, TaskId},
    world::{Demand, Direction, Floor, WorldState, FLOOR_COUNT, HOME_FLOOR},
};
pub use orchestrator::{
    Orchestrator, OrchestratorConfig, RunSummary, SimulationError, StepResult, Timings,
};
pub use policy::{BoardingPolicy, PolicyConfig};
pub use rng::RngManager;
pub use scheduler::Scheduler;
