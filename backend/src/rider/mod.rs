//! Rider state machine
//!
//! A rider task arrives, queues, and then either walks away when its
//! patience runs out or is taken in and out of the car. Boarding and
//! disembarking are never scheduled by the rider itself; the car hands
//! them over during its transfer step.

use crate::dispatch::{decide, DecisionTrigger};
use crate::models::event::Event;
use crate::models::rider::{Rider, RiderId, RiderOutcome};
use crate::models::task::{CarStep, ResumePoint, RiderStep, TaskId};
use crate::models::world::Direction;
use crate::orchestrator::context::Context;
use tracing::{debug, trace};

/// Run rider `id`'s `step`
pub fn resume_rider(ctx: &mut Context<'_>, id: RiderId, step: RiderStep) {
    match step {
        RiderStep::Arrive => arrive(ctx, id),
        RiderStep::GiveUp => give_up(ctx, id),
        RiderStep::Board => board(ctx, id),
        RiderStep::Disembark => disembark(ctx, id),
    }
}

/// Show up, schedule the next arrival, signal the car and join the queue
fn arrive(ctx: &mut Context<'_>, id: RiderId) {
    let arrival = ctx.arrivals.next_arrival(ctx.rng);
    let next = ctx.riders.reserve();
    ctx.schedule_rider(next, RiderStep::Arrive, arrival.inter_arrival);

    let entry = arrival.entry_floor;
    let exit = arrival.exit_floor;
    let available = ctx.policy.car_available(ctx.world, entry, exit);

    if available && ctx.car_step() == Some(CarStep::PrepareToMove) {
        // Doors are closing on this floor: reopen them.
        ctx.hand_to_car(CarStep::OpenDoors);
    } else if available && ctx.world.doors_idle {
        ctx.world.doors_idle = false;
        ctx.world.doors_busy = true;
        ctx.hand_to_car(CarStep::Transfer);
    } else {
        if entry < exit {
            ctx.world.call_up[entry] = true;
        } else {
            ctx.world.call_down[entry] = true;
        }
        if !ctx.world.recently_active || ctx.car_step() == Some(CarStep::WaitForCall) {
            decide(ctx, DecisionTrigger::RiderCall);
        }
    }

    ctx.riders.admit(id, Rider::new(entry, exit, ctx.now));
    ctx.world.waiting[entry].push_back(id);
    ctx.schedule_rider(id, RiderStep::GiveUp, arrival.patience);
    trace!(rider = %id, entry, exit, patience = arrival.patience, "rider queued");
}

/// Walk away unless the car is here with its doors in use
///
/// A rider that stays keeps its place in the queue but is not rescheduled;
/// from then on only the car can move it along.
fn give_up(ctx: &mut Context<'_>, id: RiderId) {
    let rider = ctx.riders.rider(id);
    let (entry, exit) = (rider.entry_floor(), rider.exit_floor());
    let available = ctx.policy.car_available(ctx.world, entry, exit);
    if available && ctx.world.doors_busy {
        trace!(rider = %id, entry, "car is loading here, staying put");
        return;
    }

    if !ctx.world.remove_waiting(entry, id) {
        return;
    }
    let rider = ctx.riders.depart(id, RiderOutcome::Abandoned);
    ctx.scheduler.retire(TaskId::Rider(id));

    let waited = rider.time_waiting(ctx.now);
    debug!(rider = %id, floor = entry, waited, "rider gave up");
    if ctx.record_statistics {
        ctx.event_log.log(Event::RiderAbandoned {
            time: ctx.now,
            rider: id.number(),
            floor: entry,
            waited,
        });
    }
}

/// Step from the queue into the car and press the destination button
fn board(ctx: &mut Context<'_>, id: RiderId) {
    let rider = ctx.riders.rider(id);
    let (entry, exit) = (rider.entry_floor(), rider.exit_floor());
    assert!(
        ctx.world.remove_waiting(entry, id),
        "{} boarded without queueing on floor {}",
        id,
        entry
    );
    ctx.world.car.push_front(id);
    ctx.world.call_car[exit] = true;

    if ctx.world.direction == Direction::Neutral {
        ctx.world.direction = Direction::toward(entry, exit);
        ctx.scheduler.schedule(
            TaskId::DoorMonitor,
            ResumePoint::CloseDoors,
            ctx.now + ctx.timings.rapid_door_close,
        );
    }

    ctx.riders.rider_mut(id).record_boarding(ctx.now);
    let occupancy = ctx.world.car.len();
    for &aboard in ctx.world.car.iter() {
        ctx.riders.rider_mut(aboard).observe_occupancy(occupancy);
    }
}

/// Step out of the car at the destination
fn disembark(ctx: &mut Context<'_>, id: RiderId) {
    assert!(ctx.world.remove_from_car(id), "{} left a car it was not in", id);
    let rider = ctx.riders.depart(id, RiderOutcome::Delivered);
    ctx.scheduler.retire(TaskId::Rider(id));

    let waited = rider.time_waiting(ctx.now);
    let rode = rider.time_riding(ctx.now);
    debug!(rider = %id, floor = rider.exit_floor(), waited, rode, "rider delivered");
    if ctx.record_statistics {
        ctx.event_log.log(Event::RiderDelivered {
            time: ctx.now,
            rider: id.number(),
            entry_floor: rider.entry_floor(),
            waited,
            rode,
            max_occupancy: rider.max_occupancy(),
            stopped_at: rider.stopped_at().to_vec(),
        });
    }
}
