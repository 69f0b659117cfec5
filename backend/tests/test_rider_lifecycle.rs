//! Rider lifecycle scenarios: patience, boarding, delivery, and the car
//! settling back home once everyone is gone.

use elevator_sim_core_rs::arrivals::{ArrivalConfig, ArrivalSource, RiderArrival, RECORDED_ARRIVALS};
use elevator_sim_core_rs::models::task::{CarStep, ResumePoint, RiderStep, TaskId};
use elevator_sim_core_rs::{
    Direction, Event, Orchestrator, OrchestratorConfig, PolicyConfig, RiderId, RiderOutcome,
    Timings, HOME_FLOOR,
};

/// Gap after the last scripted rider, long enough to never be reached
const NEVER: i64 = 1_000_000;

fn scripted(arrivals: Vec<RiderArrival>) -> Orchestrator {
    let config = OrchestratorConfig {
        rng_seed: 1,
        arrival_source: ArrivalSource::Recorded { arrivals },
        arrival_config: ArrivalConfig::default(),
        boarding_policy: PolicyConfig::Fifo,
        record_statistics: true,
        timings: Timings::default(),
    };
    Orchestrator::new(config).unwrap()
}

fn reference_dataset_then_silence() -> Vec<RiderArrival> {
    let mut arrivals = RECORDED_ARRIVALS.to_vec();
    if let Some(last) = arrivals.last_mut() {
        last.inter_arrival = NEVER;
    }
    arrivals
}

fn step_labels_at(orchestrator: &Orchestrator, time: i64) -> Vec<String> {
    orchestrator
        .event_log()
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::Step { time: t, label, .. } if *t == time => Some(label.clone()),
            _ => None,
        })
        .collect()
}

fn assert_parked_and_quiet(orchestrator: &Orchestrator) {
    let world = orchestrator.world();
    assert_eq!(world.floor, HOME_FLOOR);
    assert_eq!(world.direction, Direction::Neutral);
    assert!(!world.has_any_call());
    assert!(!world.doors_busy && !world.doors_idle);
    assert_eq!(
        orchestrator.scheduler().resume_point(TaskId::Car),
        Some(ResumePoint::Car(CarStep::WaitForCall))
    );
}

#[test]
fn test_first_rider_walks_before_car_arrives() {
    let mut orchestrator = scripted(RECORDED_ARRIVALS.to_vec());
    orchestrator.run_until(4845);

    let first = RiderId::new(0);
    assert_eq!(orchestrator.riders().outcome(first), Some(RiderOutcome::Abandoned));
    assert_eq!(
        orchestrator.event_log().events_for_rider(1)[0].to_string(),
        "User 1 walked after 15.2s waiting in the queue on floor 0"
    );
}

#[test]
fn test_rider_walks_while_car_loads_elsewhere() {
    let mut orchestrator = scripted(RECORDED_ARRIVALS.to_vec());
    orchestrator.run_until(600);

    // Rider 6 queued on floor 2 while the car was busy at floor 4
    assert_eq!(
        orchestrator.riders().outcome(RiderId::new(5)),
        Some(RiderOutcome::Abandoned)
    );
    assert_eq!(step_labels_at(&orchestrator, 540), vec!["U4"]);
}

#[test]
fn test_lone_rider_gives_up_and_car_parks() {
    let mut orchestrator = scripted(vec![RiderArrival::new(0, 4, 10, NEVER)]);
    let summary = orchestrator.run_until(5000);

    assert_eq!(summary.riders_arrived, 1);
    assert_eq!(summary.riders_abandoned, 1);
    assert_eq!(summary.riders_delivered, 0);
    assert_eq!(step_labels_at(&orchestrator, 10), vec!["U4"]);

    // The call outlives the rider: the car still visits floor 0, then homes
    assert_eq!(step_labels_at(&orchestrator, 180), vec!["E2"]);
    assert_eq!(step_labels_at(&orchestrator, 503), vec!["E6", "E1"]);
    assert_parked_and_quiet(&orchestrator);

    let pending: Vec<TaskId> = orchestrator.scheduler().pending().map(|(t, _)| t).collect();
    assert_eq!(pending, vec![TaskId::Rider(RiderId::new(1))]);
}

#[test]
fn test_rider_keeps_waiting_while_doors_busy_at_its_floor() {
    let mut orchestrator = scripted(vec![RiderArrival::new(HOME_FLOOR, 4, 30, NEVER)]);
    let summary = orchestrator.run_until(5000);

    // Patience runs out at 30, but the doors opened at 20
    assert_eq!(step_labels_at(&orchestrator, 20), vec!["E3"]);
    assert_eq!(step_labels_at(&orchestrator, 30), vec!["U4"]);
    assert_eq!(step_labels_at(&orchestrator, 40), vec!["E4", "U5"]);

    assert_eq!(summary.riders_delivered, 1);
    assert_eq!(summary.riders_abandoned, 0);
    assert_eq!(
        orchestrator.riders().outcome(RiderId::new(0)),
        Some(RiderOutcome::Delivered)
    );
    assert_parked_and_quiet(&orchestrator);
}

#[test]
fn test_boarding_is_handed_over_by_the_car() {
    let mut orchestrator = scripted(vec![RiderArrival::new(HOME_FLOOR, 0, 500, NEVER)]);
    while let Some(result) = orchestrator.step(5000) {
        if result.resume_point == ResumePoint::Rider(RiderStep::Board) {
            let world = orchestrator.world();
            assert_eq!(world.car.len(), 1);
            assert!(world.call_car[0]);
            assert_eq!(world.direction, Direction::GoingDown);
            assert!(world.waiting[HOME_FLOOR].is_empty());
        }
    }
    assert_eq!(
        orchestrator.riders().outcome(RiderId::new(0)),
        Some(RiderOutcome::Delivered)
    );
}

#[test]
fn test_every_rider_served_once_arrivals_stop() {
    let mut orchestrator = scripted(reference_dataset_then_silence());
    let summary = orchestrator.run_until(100_000);

    assert_eq!(summary.riders_arrived, 11);
    assert_eq!(summary.riders_delivered + summary.riders_abandoned, 11);
    assert_eq!(summary.riders_waiting, 0);
    assert_eq!(summary.riders_aboard, 0);
    assert_parked_and_quiet(&orchestrator);
}

#[test]
fn test_delivered_reports_match_reference() {
    let mut orchestrator = scripted(reference_dataset_then_silence());
    orchestrator.run_until(100_000);

    let log = orchestrator.event_log();
    let report = |n: usize| log.events_for_rider(n)[0].to_string();
    assert_eq!(
        report(2),
        "User 2 arrived after 49.1s waiting in the queue on floor 4 followed by 62.9s in the elevator. Max occupancy 4. Stopped at floors 3 2 1."
    );
    assert_eq!(
        report(11),
        "User 11 arrived after 4.0s waiting in the queue on floor 2 followed by 14.5s in the elevator. Max occupancy 1. Stopped at floors 3."
    );
}

#[test]
fn test_inactivity_clears_activity_flag() {
    let mut orchestrator = scripted(reference_dataset_then_silence());
    orchestrator.run_until(100_000);

    assert!(!orchestrator.world().recently_active);
    // Last door opening at 4744 plus the inactivity delay
    assert_eq!(step_labels_at(&orchestrator, 5044), vec!["E9"]);
}
