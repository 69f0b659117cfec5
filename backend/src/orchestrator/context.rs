//! Transition context
//!
//! Everything a single transition may touch, borrowed from the orchestrator
//! for the duration of one task firing. State machines never hold copies of
//! world data; they read and write through this context and return.

use crate::arrivals::ArrivalGenerator;
use crate::core::time::{Duration, Time};
use crate::models::event::EventLog;
use crate::models::rider::{RiderArena, RiderId};
use crate::models::task::{CarStep, ResumePoint, RiderStep, TaskId};
use crate::models::world::WorldState;
use crate::orchestrator::engine::Timings;
use crate::policy::BoardingPolicy;
use crate::rng::RngManager;
use crate::scheduler::Scheduler;

/// Mutable view of the simulation handed to each transition
pub struct Context<'a> {
    /// Fire time of the task being resumed
    pub now: Time,
    pub world: &'a mut WorldState,
    pub riders: &'a mut RiderArena,
    pub scheduler: &'a mut Scheduler,
    pub arrivals: &'a mut ArrivalGenerator,
    pub rng: &'a mut RngManager,
    pub event_log: &'a mut EventLog,
    pub policy: &'a dyn BoardingPolicy,
    pub timings: &'a Timings,
    /// Emit per-rider reports into the event log
    pub record_statistics: bool,
}

impl Context<'_> {
    /// Car's current resume point
    pub fn car_step(&self) -> Option<CarStep> {
        match self.scheduler.resume_point(TaskId::Car) {
            Some(ResumePoint::Car(step)) => Some(step),
            _ => None,
        }
    }

    /// Schedule the car's `step` after `delay`
    pub fn schedule_car(&mut self, step: CarStep, delay: Duration) {
        self.scheduler
            .schedule(TaskId::Car, ResumePoint::Car(step), self.now + delay);
    }

    /// Hand the car `step` ahead of everything else at this instant
    pub fn hand_to_car(&mut self, step: CarStep) {
        self.scheduler
            .schedule_immediately(TaskId::Car, ResumePoint::Car(step), self.now);
    }

    /// Schedule rider `id`'s `step` after `delay`
    pub fn schedule_rider(&mut self, id: RiderId, step: RiderStep, delay: Duration) {
        self.scheduler
            .schedule(TaskId::Rider(id), ResumePoint::Rider(step), self.now + delay);
    }

    /// Hand rider `id` its `step` ahead of everything else at this instant
    pub fn hand_to_rider(&mut self, id: RiderId, step: RiderStep) {
        self.scheduler
            .schedule_immediately(TaskId::Rider(id), ResumePoint::Rider(step), self.now);
    }
}
