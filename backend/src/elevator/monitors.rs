//! Door and inactivity monitors
//!
//! Two single-step tasks that run beside the car. The door monitor keeps
//! postponing itself while riders are still in the doorway, then shuts the
//! doors and sends the car on. The inactivity monitor fires after a long
//! quiet spell and gives the dispatcher a chance to send the car home.

use crate::dispatch::{decide, DecisionTrigger};
use crate::models::task::{CarStep, ResumePoint, TaskId};
use crate::orchestrator::context::Context;
use tracing::trace;

/// Close the doors once nobody is transferring
pub fn close_doors(ctx: &mut Context<'_>) {
    if ctx.world.doors_busy {
        trace!(floor = ctx.world.floor, "doorway occupied, holding doors");
        ctx.scheduler.schedule(
            TaskId::DoorMonitor,
            ResumePoint::CloseDoors,
            ctx.now + ctx.timings.door_flutter,
        );
    } else {
        ctx.world.doors_idle = false;
        ctx.schedule_car(CarStep::PrepareToMove, ctx.timings.door_closing);
    }
}

/// Clear the recent-activity flag and ask for a decision
pub fn set_inactive(ctx: &mut Context<'_>) {
    ctx.world.recently_active = false;
    decide(ctx, DecisionTrigger::Inactivity);
}
