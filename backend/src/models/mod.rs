//! Domain models for the elevator simulator

pub mod event;
pub mod rider;
pub mod task;
pub mod world;

// Re-exports
pub use event::{Event, EventLog};
pub use rider::{Rider, RiderArena, RiderId, RiderOutcome};
pub use task::{CarStep, ResumePoint, RiderStep, TaskId};
pub use world::{Demand, Direction, Floor, WorldState, FLOOR_COUNT, HOME_FLOOR};
