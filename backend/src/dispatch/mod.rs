//! Dispatch decision
//!
//! Chooses a direction for a car that has none. Invoked from three places:
//! the car itself once its doors have shut, a rider pressing a button, and
//! the inactivity monitor when the car has been quiet for a while.
//!
//! # Rules
//!
//! 1. A car already committed to a direction is left alone.
//! 2. A car parked at home with a call on the home floor just reopens its
//!    doors there.
//! 3. Otherwise the lowest-numbered floor (other than the car's own) with
//!    any call becomes the target. When the car is preparing to move and no
//!    call exists, home is the target so the car drifts back to park.
//! 4. A parked car with a target away from home is woken up.

use crate::models::task::CarStep;
use crate::models::world::{Direction, Floor, FLOOR_COUNT, HOME_FLOOR};
use crate::orchestrator::context::Context;
use tracing::debug;

/// Who is asking for a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionTrigger {
    /// The car closed its doors and is about to leave
    PrepareToMove,
    /// A rider pressed a call button
    RiderCall,
    /// The inactivity monitor fired
    Inactivity,
}

/// What the decision did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The car already had a direction
    Committed,
    /// The parked car was told to open its doors at home
    OpenAtHome,
    /// Direction set toward this floor
    Target(Floor),
    /// Nothing to do
    Idle,
}

/// Run the decision procedure for the current world state
///
/// Only a car parked at [`CarStep::WaitForCall`] is ever scheduled from
/// here; a car mid-cycle picks up the new direction at its next step.
pub fn decide(ctx: &mut Context<'_>, trigger: DecisionTrigger) -> Decision {
    if ctx.world.direction != Direction::Neutral {
        return Decision::Committed;
    }

    let parked = ctx.car_step() == Some(CarStep::WaitForCall);
    if parked && ctx.world.has_call_at(HOME_FLOOR) {
        ctx.schedule_car(CarStep::OpenDoors, ctx.timings.door_open_from_decision);
        debug!(?trigger, "call at home floor, reopening doors");
        return Decision::OpenAtHome;
    }

    let fallback = (trigger == DecisionTrigger::PrepareToMove).then_some(HOME_FLOOR);
    let target = (0..FLOOR_COUNT)
        .filter(|&floor| floor != ctx.world.floor)
        .find(|&floor| ctx.world.has_call_at(floor))
        .or(fallback);

    let Some(target) = target else {
        return Decision::Idle;
    };

    ctx.world.direction = Direction::toward(ctx.world.floor, target);
    if parked && target != HOME_FLOOR {
        ctx.schedule_car(CarStep::PrepareToMove, ctx.timings.homing);
    }
    debug!(
        ?trigger,
        target,
        direction = ?ctx.world.direction,
        "dispatch decision"
    );
    Decision::Target(target)
}
