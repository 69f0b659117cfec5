//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Rider arrivals (recorded table, then seeded random draws)
//! - Car, door monitor and inactivity monitor state machines
//! - Rider state machines
//! - Event logging (one step line per fired task, optional rider reports)
//!
//! # Architecture
//!
//! The Orchestrator owns the scheduler and fires one task per step:
//!
//! ```text
//! Until the earliest pending task fires at or after the deadline:
//! 1. Pop the earliest task
//! 2. Advance the clock to its fire time
//! 3. Log the step line (state before the transition)
//! 4. Run the task's transition for its resume point
//! 5. Check world invariants
//! ```
//!
//! # Example
//!
//! ```rust
//! use elevator_sim_core_rs::arrivals::ArrivalSource;
//! use elevator_sim_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! let config = OrchestratorConfig {
//!     arrival_source: ArrivalSource::recorded(),
//!     ..OrchestratorConfig::default()
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let summary = orchestrator.run_until(200);
//!
//! assert_eq!(summary.events_processed, 11);
//! assert_eq!(orchestrator.event_log().events()[0].to_string(), "0000 N 2 0 0 0 U1");
//! ```

use crate::arrivals::{ArrivalConfig, ArrivalGenerator, ArrivalSource};
use crate::core::time::{Duration, SimClock, Time, MAX_DELAY};
use crate::elevator::{monitors, resume_car};
use crate::models::event::{Event, EventLog};
use crate::models::rider::{RiderArena, RiderOutcome};
use crate::models::task::{CarStep, ResumePoint, RiderStep, TaskId};
use crate::models::world::WorldState;
use crate::orchestrator::context::Context;
use crate::orchestrator::snapshot::{compute_config_hash, WorldSnapshot};
use crate::policy::{BoardingPolicy, PolicyConfig};
use crate::rider::resume_rider;
use crate::rng::RngManager;
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{enabled, trace, Level};

// ============================================================================
// Configuration Types
// ============================================================================

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 1;

/// Complete orchestrator configuration
///
/// Defaults follow the crate features: `fixed-dataset` replays the recorded
/// arrivals, `print-statistics` enables rider reports and
/// `strict-direction` selects the direction-matching boarding policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Where rider arrivals come from
    pub arrival_source: ArrivalSource,

    /// Ranges for randomly drawn arrivals
    pub arrival_config: ArrivalConfig,

    /// Which riders may board and when the car counts as present
    pub boarding_policy: PolicyConfig,

    /// Emit per-rider reports into the event log
    pub record_statistics: bool,

    /// Car mechanics durations
    pub timings: Timings,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rng_seed: DEFAULT_SEED,
            arrival_source: if cfg!(feature = "fixed-dataset") {
                ArrivalSource::recorded()
            } else {
                ArrivalSource::Random
            },
            arrival_config: ArrivalConfig::default(),
            boarding_policy: if cfg!(feature = "strict-direction") {
                PolicyConfig::StrictDirection
            } else {
                PolicyConfig::Fifo
            },
            record_statistics: cfg!(feature = "print-statistics"),
            timings: Timings::default(),
        }
    }
}

/// Durations of the car's mechanics, in tenths of a second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Door monitor delay after someone boards a neutral car
    pub rapid_door_close: Duration,
    /// Quiet spell before the car is considered inactive
    pub inactivity: Duration,
    /// Door monitor delay after the doors open
    pub door_close: Duration,
    /// Doors opening until the first transfer
    pub door_open: Duration,
    pub leaving: Duration,
    pub entering: Duration,
    /// Door monitor retry while the doorway is busy
    pub door_flutter: Duration,
    /// Doors closing until the car prepares to move
    pub door_closing: Duration,
    pub up_acceleration: Duration,
    pub down_acceleration: Duration,
    /// Decision reopening the doors at home
    pub door_open_from_decision: Duration,
    /// Decision waking the parked car
    pub homing: Duration,
    pub up_travel: Duration,
    pub up_deceleration: Duration,
    pub down_travel: Duration,
    pub down_deceleration: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            rapid_door_close: 25,
            inactivity: 300,
            door_close: 76,
            door_open: 20,
            leaving: 25,
            entering: 25,
            door_flutter: 40,
            door_closing: 20,
            up_acceleration: 15,
            down_acceleration: 15,
            door_open_from_decision: 20,
            homing: 20,
            up_travel: 51,
            up_deceleration: 14,
            down_travel: 61,
            down_deceleration: 23,
        }
    }
}

impl Timings {
    /// Every duration with its field name
    pub fn entries(&self) -> [(&'static str, Duration); 16] {
        [
            ("rapid_door_close", self.rapid_door_close),
            ("inactivity", self.inactivity),
            ("door_close", self.door_close),
            ("door_open", self.door_open),
            ("leaving", self.leaving),
            ("entering", self.entering),
            ("door_flutter", self.door_flutter),
            ("door_closing", self.door_closing),
            ("up_acceleration", self.up_acceleration),
            ("down_acceleration", self.down_acceleration),
            ("door_open_from_decision", self.door_open_from_decision),
            ("homing", self.homing),
            ("up_travel", self.up_travel),
            ("up_deceleration", self.up_deceleration),
            ("down_travel", self.down_travel),
            ("down_deceleration", self.down_deceleration),
        ]
    }
}

// ============================================================================
// Results and Errors
// ============================================================================

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Fire time of the task
    pub time: Time,

    /// Task that fired
    pub task: TaskId,

    /// Resume point it ran
    pub resume_point: ResumePoint,
}

/// Totals after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tasks fired by this run
    pub events_processed: usize,

    /// Time of the last fired task
    pub last_time: Time,

    /// Riders that have shown up so far
    pub riders_arrived: usize,
    pub riders_delivered: usize,
    pub riders_abandoned: usize,

    /// Riders still queued on a floor
    pub riders_waiting: usize,

    /// Riders inside the car
    pub riders_aboard: usize,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration or snapshot could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Snapshot violates a world invariant
    #[error("State validation error: {0}")]
    StateValidationError(String),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning the world and driving the scheduler
///
/// # Determinism
///
/// All randomness is via `rng_manager` with seeded xorshift64*.
/// Same seed + same config = identical trace.
pub struct Orchestrator {
    /// Car, calls and rosters
    world: WorldState,

    /// Every rider that has been scheduled to arrive
    riders: RiderArena,

    /// Pending tasks and resume points
    scheduler: Scheduler,

    /// Source of arrival descriptions
    arrivals: ArrivalGenerator,

    /// Deterministic RNG
    rng_manager: RngManager,

    /// Boarding policy built from the config
    policy: Box<dyn BoardingPolicy>,

    /// Simulated time of the last fired task
    clock: SimClock,

    /// Event log (all simulation events)
    event_log: EventLog,

    /// Configuration the run was built from
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// The car starts parked at home, doors shut, and the first rider is
    /// scheduled to arrive at time zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if a timing is not
    /// positive or the arrival setup is malformed.
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut riders = RiderArena::new();
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskId::Car, ResumePoint::Car(CarStep::WaitForCall));
        scheduler.register(TaskId::DoorMonitor, ResumePoint::CloseDoors);
        scheduler.register(TaskId::InactivityMonitor, ResumePoint::SetInactive);

        let first = riders.reserve();
        scheduler.schedule(TaskId::Rider(first), ResumePoint::Rider(RiderStep::Arrive), 0);

        Ok(Self {
            world: WorldState::new(),
            riders,
            scheduler,
            arrivals: ArrivalGenerator::new(config.arrival_source.clone(), config.arrival_config),
            rng_manager: RngManager::new(config.rng_seed),
            policy: config.boarding_policy.build(),
            clock: SimClock::new(),
            event_log: EventLog::new(),
            config,
        })
    }

    fn validate_config(config: &OrchestratorConfig) -> Result<(), SimulationError> {
        for (name, value) in config.timings.entries() {
            if !(1..=MAX_DELAY).contains(&value) {
                return Err(SimulationError::InvalidConfig(format!(
                    "timing {} must be within 1..={}, got {}",
                    name, MAX_DELAY, value
                )));
            }
        }
        config
            .arrival_config
            .validate()
            .map_err(SimulationError::InvalidConfig)?;
        config
            .arrival_source
            .validate()
            .map_err(SimulationError::InvalidConfig)?;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn riders(&self) -> &RiderArena {
        &self.riders
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Get current simulation time
    pub fn now(&self) -> Time {
        self.clock.now()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Mutable event log, for draining events while the run continues
    pub fn event_log_mut(&mut self) -> &mut EventLog {
        &mut self.event_log
    }

    /// Capture the observable state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.clock.now(), &self.world, &self.scheduler)
    }

    /// SHA-256 of the configuration identifying this run
    pub fn config_hash(&self) -> Result<String, SimulationError> {
        compute_config_hash(&self.config)
    }

    // ========================================================================
    // Main loop
    // ========================================================================

    /// Fire the earliest pending task unless it is due at or after `deadline`
    ///
    /// Returns `None` once the deadline is reached; nothing is consumed in
    /// that case, so a later call with a larger deadline picks up where this
    /// one stopped.
    pub fn step(&mut self, deadline: Time) -> Option<StepResult> {
        let (task, record) = self.scheduler.pop_earliest(deadline)?;
        let now = record.next_time;
        self.clock.advance_to(now);

        self.event_log.log(Event::Step {
            time: now,
            direction: self.world.direction,
            floor: self.world.floor,
            doors_busy: self.world.doors_busy,
            recently_active: self.world.recently_active,
            doors_idle: self.world.doors_idle,
            label: record.resume_point.to_string(),
        });
        if enabled!(Level::TRACE) {
            self.trace_state(task, record.resume_point);
        }

        let mut ctx = Context {
            now,
            world: &mut self.world,
            riders: &mut self.riders,
            scheduler: &mut self.scheduler,
            arrivals: &mut self.arrivals,
            rng: &mut self.rng_manager,
            event_log: &mut self.event_log,
            policy: self.policy.as_ref(),
            timings: &self.config.timings,
            record_statistics: self.config.record_statistics,
        };
        match (task, record.resume_point) {
            (TaskId::Car, ResumePoint::Car(step)) => resume_car(&mut ctx, step),
            (TaskId::DoorMonitor, ResumePoint::CloseDoors) => monitors::close_doors(&mut ctx),
            (TaskId::InactivityMonitor, ResumePoint::SetInactive) => {
                monitors::set_inactive(&mut ctx)
            }
            (TaskId::Rider(id), ResumePoint::Rider(step)) => resume_rider(&mut ctx, id, step),
            (task, point) => panic!("{:?} cannot resume at {}", task, point),
        }

        self.world.check_invariants();
        Some(StepResult {
            time: now,
            task,
            resume_point: record.resume_point,
        })
    }

    /// Fire tasks until the earliest pending one is due at or after `deadline`
    pub fn run_until(&mut self, deadline: Time) -> RunSummary {
        let mut events_processed = 0;
        while self.step(deadline).is_some() {
            events_processed += 1;
        }
        self.summary(events_processed)
    }

    /// Totals for the run so far
    pub fn summary(&self, events_processed: usize) -> RunSummary {
        RunSummary {
            events_processed,
            last_time: self.clock.now(),
            riders_arrived: self.riders.arrived_count(),
            riders_delivered: self.riders.count_outcome(RiderOutcome::Delivered),
            riders_abandoned: self.riders.count_outcome(RiderOutcome::Abandoned),
            riders_waiting: self.world.waiting_count(),
            riders_aboard: self.world.car.len(),
        }
    }

    fn trace_state(&self, task: TaskId, resume_point: ResumePoint) {
        let queued: Vec<usize> = self.world.waiting.iter().map(|q| q.len()).collect();
        let pending: Vec<String> = self
            .scheduler
            .pending()
            .map(|(_, r)| format!("{}/{}", r.resume_point, r.next_time))
            .collect();
        trace!(
            ?task,
            %resume_point,
            ?queued,
            aboard = self.world.car.len(),
            pending = %pending.join(" "),
            "resuming task"
        );
    }
}

// Manual Debug implementation (policies don't implement Debug)
impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("now", &self.clock.now())
            .field("floor", &self.world.floor)
            .field("direction", &self.world.direction)
            .field("policy", &self.policy.name())
            .field("pending", &self.scheduler.len())
            .field("event_count", &self.event_log.total_logged())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
