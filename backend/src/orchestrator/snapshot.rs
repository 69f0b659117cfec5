//! Snapshot - Observable State Capture
//!
//! Serializable picture of the building at one instant, for tests and
//! tooling that want to inspect or compare runs without reaching into the
//! live orchestrator. Snapshots are read-only: there is no way to load one
//! back into a simulation.
//!
//! # Checked Invariants
//!
//! - **Floor range**: the car is inside the building
//! - **Door flags**: busy and idle are exclusive
//! - **Roster integrity**: each rider is queued or aboard, never both
//! - **Pending integrity**: each task is pending once, in time order

use crate::core::time::Time;
use crate::models::task::TaskId;
use crate::models::world::{Direction, Floor, WorldState, FLOOR_COUNT};
use crate::orchestrator::SimulationError;
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete observable state of the building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Time of the last fired task
    pub time: Time,

    pub floor: Floor,
    pub direction: Direction,
    pub doors_busy: bool,
    pub recently_active: bool,
    pub doors_idle: bool,

    pub call_up: Vec<bool>,
    pub call_down: Vec<bool>,
    pub call_car: Vec<bool>,

    /// Rider numbers queued on each floor, in queue order
    pub waiting: Vec<Vec<usize>>,

    /// Rider numbers inside the car, most recent boarder first
    pub in_car: Vec<usize>,

    /// Pending tasks in firing order
    pub pending: Vec<PendingTaskSnapshot>,
}

/// One entry of the pending sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTaskSnapshot {
    pub task: TaskId,
    /// Trace label of the resume point, e.g. `E71`
    pub label: String,
    pub time: Time,
}

impl WorldSnapshot {
    /// Capture `world` and `scheduler` as of `time`
    pub fn capture(time: Time, world: &WorldState, scheduler: &Scheduler) -> Self {
        WorldSnapshot {
            time,
            floor: world.floor,
            direction: world.direction,
            doors_busy: world.doors_busy,
            recently_active: world.recently_active,
            doors_idle: world.doors_idle,
            call_up: world.call_up.to_vec(),
            call_down: world.call_down.to_vec(),
            call_car: world.call_car.to_vec(),
            waiting: world
                .waiting
                .iter()
                .map(|queue| queue.iter().map(|id| id.number()).collect())
                .collect(),
            in_car: world.car.iter().map(|id| id.number()).collect(),
            pending: scheduler
                .pending()
                .map(|(task, record)| PendingTaskSnapshot {
                    task,
                    label: record.resume_point.to_string(),
                    time: record.next_time,
                })
                .collect(),
        }
    }

    /// Number of riders queued or aboard
    pub fn riders_present(&self) -> usize {
        self.waiting.iter().map(Vec::len).sum::<usize>() + self.in_car.len()
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so that the hash
/// identifies a run independently of field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Same invariants the driver asserts after every step, reported as
/// [`SimulationError::StateValidationError`] instead of a panic.
pub fn validate_snapshot(snapshot: &WorldSnapshot) -> Result<(), SimulationError> {
    let invalid = |msg: String| -> Result<(), SimulationError> {
        Err(SimulationError::StateValidationError(msg))
    };

    // 1. Floor range and per-floor arrays
    if snapshot.floor >= FLOOR_COUNT {
        return invalid(format!("car is on floor {}, outside the building", snapshot.floor));
    }
    for (name, len) in [
        ("call_up", snapshot.call_up.len()),
        ("call_down", snapshot.call_down.len()),
        ("call_car", snapshot.call_car.len()),
        ("waiting", snapshot.waiting.len()),
    ] {
        if len != FLOOR_COUNT {
            return invalid(format!("{} has {} floors, expected {}", name, len, FLOOR_COUNT));
        }
    }

    // 2. Door flags
    if snapshot.doors_busy && snapshot.doors_idle {
        return invalid("doors are both busy and idle".to_string());
    }

    // 3. Roster integrity
    let mut seen: HashMap<usize, String> = HashMap::new();
    let rosters = snapshot
        .waiting
        .iter()
        .enumerate()
        .flat_map(|(floor, queue)| queue.iter().map(move |&n| (n, format!("floor {}", floor))))
        .chain(snapshot.in_car.iter().map(|&n| (n, "the car".to_string())));
    for (rider, location) in rosters {
        if let Some(previous) = seen.insert(rider, location.clone()) {
            return invalid(format!(
                "User {} is both on {} and in {}",
                rider, previous, location
            ));
        }
    }

    // 4. Pending integrity
    let mut pending_tasks = HashSet::new();
    for entry in &snapshot.pending {
        if !pending_tasks.insert(entry.task) {
            return invalid(format!("{:?} is pending more than once", entry.task));
        }
    }
    if let Some(pair) = snapshot.pending.windows(2).find(|w| w[0].time > w[1].time) {
        return invalid(format!(
            "pending sequence out of order: {} at {} before {} at {}",
            pair[0].label, pair[0].time, pair[1].label, pair[1].time
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rider::RiderId;
    use crate::models::task::{CarStep, ResumePoint};

    fn sample_snapshot() -> WorldSnapshot {
        let mut world = WorldState::new();
        world.waiting[0].push_back(RiderId::new(0));
        world.car.push_front(RiderId::new(1));
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskId::Car, ResumePoint::Car(CarStep::GoDown), 35);
        WorldSnapshot::capture(20, &world, &scheduler)
    }

    #[test]
    fn test_capture_uses_rider_numbers() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.waiting[0], vec![1]);
        assert_eq!(snapshot.in_car, vec![2]);
        assert_eq!(snapshot.pending[0].label, "E8");
        assert_eq!(snapshot.riders_present(), 2);
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_duplicate_rider_rejected() {
        let mut snapshot = sample_snapshot();
        snapshot.in_car.push(1);
        let err = validate_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, SimulationError::StateValidationError(_)));
        assert!(err.to_string().contains("User 1"));
    }

    #[test]
    fn test_unordered_pending_rejected() {
        let mut snapshot = sample_snapshot();
        snapshot.pending.push(PendingTaskSnapshot {
            task: TaskId::DoorMonitor,
            label: "E5".to_string(),
            time: 10,
        });
        assert!(validate_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_compute_config_hash_deterministic() {
        #[derive(Serialize)]
        struct TestConfig {
            value: i32,
            name: String,
        }

        let hash1 = compute_config_hash(&TestConfig { value: 42, name: "a".to_string() }).unwrap();
        let hash2 = compute_config_hash(&TestConfig { value: 42, name: "a".to_string() }).unwrap();
        let hash3 = compute_config_hash(&TestConfig { value: 43, name: "a".to_string() }).unwrap();

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }
}
