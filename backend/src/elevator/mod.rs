//! Elevator car state machine
//!
//! One transition per [`CarStep`]. Each firing inspects the world, mutates
//! it, and schedules the car's next step (or hands control to a rider or a
//! monitor). The two auxiliary tasks live in [`monitors`].
//!
//! # Cycle
//!
//! ```text
//! WaitForCall ─(decision)─> PrepareToMove ─> GoUp/GoDown ─> ArriveUp/ArriveDown
//!      ^                          ^                                │ stop
//!      │                          │ doors shut                     v
//!      └──── no direction ────────┴── Transfer <── OpenDoors <── ChangeOfState
//! ```

pub mod monitors;

use crate::dispatch::{decide, DecisionTrigger};
use crate::models::task::{CarStep, ResumePoint, RiderStep, TaskId};
use crate::models::world::{Direction, FLOOR_COUNT, HOME_FLOOR};
use crate::orchestrator::context::Context;
use tracing::{debug, trace};

/// Run the car's `step`
pub fn resume_car(ctx: &mut Context<'_>, step: CarStep) {
    match step {
        CarStep::WaitForCall => wait_for_call(ctx),
        CarStep::ChangeOfState => {
            change_of_state(ctx);
            open_doors(ctx);
        }
        CarStep::OpenDoors => open_doors(ctx),
        CarStep::Transfer => transfer(ctx),
        CarStep::PrepareToMove => prepare_to_move(ctx),
        CarStep::GoUp => go_up(ctx),
        CarStep::ArriveUp => arrive_up(ctx),
        CarStep::GoDown => go_down(ctx),
        CarStep::ArriveDown => arrive_down(ctx),
    }
}

/// Parked; only ever woken by a decision
fn wait_for_call(ctx: &mut Context<'_>) {
    assert_eq!(ctx.world.floor, HOME_FLOOR, "car parked away from home");
}

/// Drop or reverse the direction if nothing lies ahead any more
fn change_of_state(ctx: &mut Context<'_>) {
    let demand = ctx.world.demand();
    let before = ctx.world.direction;
    ctx.world.direction = match before {
        Direction::GoingUp if !demand.above() => {
            if demand.passenger_wants_down {
                Direction::GoingDown
            } else {
                Direction::Neutral
            }
        }
        Direction::GoingDown if !demand.below() => {
            if demand.passenger_wants_up {
                Direction::GoingUp
            } else {
                Direction::Neutral
            }
        }
        unchanged => unchanged,
    };
    if ctx.world.direction != before {
        debug!(floor = ctx.world.floor, from = ?before, to = ?ctx.world.direction, "direction changed");
    }
}

/// Open the doors and arm the door and inactivity monitors
fn open_doors(ctx: &mut Context<'_>) {
    ctx.world.doors_busy = true;
    ctx.world.recently_active = true;

    let now = ctx.now;
    ctx.scheduler.schedule(
        TaskId::InactivityMonitor,
        ResumePoint::SetInactive,
        now + ctx.timings.inactivity,
    );
    ctx.scheduler.schedule(
        TaskId::DoorMonitor,
        ResumePoint::CloseDoors,
        now + ctx.timings.door_close,
    );
    ctx.schedule_car(CarStep::Transfer, ctx.timings.door_open);

    let floor = ctx.world.floor;
    for &id in ctx.world.car.iter() {
        ctx.riders.rider_mut(id).record_stop(floor);
    }
}

/// Let one rider out, or else one in; otherwise mark the doors idle
///
/// Riders leave before anyone boards. A leaver or boarder is handed its
/// step for this instant, and the car comes back after the time it takes
/// to step through the doors.
fn transfer(ctx: &mut Context<'_>) {
    assert!(ctx.world.doors_busy, "transfer with doors not busy");
    let floor = ctx.world.floor;

    let world = &*ctx.world;
    let riders = &*ctx.riders;
    let leaver = world
        .car
        .iter()
        .copied()
        .find(|&id| riders.rider(id).exit_floor() == floor);
    let enterer = world.waiting[floor]
        .iter()
        .copied()
        .find(|&id| ctx.policy.may_board(world, riders.rider(id).exit_floor()));

    if let Some(id) = leaver {
        trace!(rider = %id, floor, "letting rider out");
        ctx.hand_to_rider(id, RiderStep::Disembark);
        ctx.schedule_car(CarStep::Transfer, ctx.timings.leaving);
    } else if let Some(id) = enterer {
        assert_eq!(
            ctx.scheduler.resume_point(TaskId::Rider(id)),
            Some(ResumePoint::Rider(RiderStep::GiveUp)),
            "{} queued without a pending give-up",
            id
        );
        trace!(rider = %id, floor, "letting rider in");
        ctx.hand_to_rider(id, RiderStep::Board);
        ctx.schedule_car(CarStep::Transfer, ctx.timings.entering);
    } else {
        ctx.world.doors_busy = false;
        ctx.world.doors_idle = true;
    }
}

/// Doors are shut: clear served calls, decide, then park or depart
fn prepare_to_move(ctx: &mut Context<'_>) {
    assert!(!ctx.world.doors_busy, "moving with riders in the doorway");
    let floor = ctx.world.floor;
    ctx.world.call_car[floor] = false;
    if ctx.world.direction != Direction::GoingDown {
        ctx.world.call_up[floor] = false;
    }
    if ctx.world.direction != Direction::GoingUp {
        ctx.world.call_down[floor] = false;
    }

    decide(ctx, DecisionTrigger::PrepareToMove);

    match ctx.world.direction {
        Direction::Neutral => {
            assert_eq!(ctx.world.floor, HOME_FLOOR, "car went neutral away from home");
            assert!(
                !ctx.scheduler.is_pending(TaskId::Car),
                "parking car is still scheduled"
            );
            ctx.hand_to_car(CarStep::WaitForCall);
        }
        direction => {
            if ctx.world.recently_active {
                ctx.scheduler.cancel(TaskId::InactivityMonitor);
            }
            if direction == Direction::GoingUp {
                ctx.schedule_car(CarStep::GoUp, ctx.timings.up_acceleration);
            } else {
                ctx.schedule_car(CarStep::GoDown, ctx.timings.down_acceleration);
            }
        }
    }
}

fn go_up(ctx: &mut Context<'_>) {
    assert!(!ctx.world.doors_busy, "moving with riders in the doorway");
    assert!(ctx.world.floor < FLOOR_COUNT - 1, "car cannot go above the top floor");
    ctx.world.floor += 1;
    ctx.schedule_car(CarStep::ArriveUp, ctx.timings.up_travel);
}

/// Stop for a car call or up call here, or for a down call / the home
/// floor when nothing is wanted further up; otherwise keep climbing
fn arrive_up(ctx: &mut Context<'_>) {
    let floor = ctx.world.floor;
    let demand = ctx.world.demand();
    let stop = ctx.world.call_car[floor]
        || ctx.world.call_up[floor]
        || ((floor == HOME_FLOOR || ctx.world.call_down[floor]) && !demand.above());
    if stop {
        ctx.schedule_car(CarStep::ChangeOfState, ctx.timings.up_deceleration);
    } else {
        ctx.hand_to_car(CarStep::GoUp);
    }
}

fn go_down(ctx: &mut Context<'_>) {
    assert!(!ctx.world.doors_busy, "moving with riders in the doorway");
    assert!(ctx.world.floor > 0, "car cannot go below the bottom floor");
    ctx.world.floor -= 1;
    ctx.schedule_car(CarStep::ArriveDown, ctx.timings.down_travel);
}

/// Mirror image of [`arrive_up`]
fn arrive_down(ctx: &mut Context<'_>) {
    let floor = ctx.world.floor;
    let demand = ctx.world.demand();
    let stop = ctx.world.call_car[floor]
        || ctx.world.call_down[floor]
        || ((floor == HOME_FLOOR || ctx.world.call_up[floor]) && !demand.below());
    if stop {
        ctx.schedule_car(CarStep::ChangeOfState, ctx.timings.down_deceleration);
    } else {
        ctx.hand_to_car(CarStep::GoDown);
    }
}
