//! Event scheduler
//!
//! Holds the pending sequence of tasks ordered by next-fire time, together
//! with every task's current resume point.
//!
//! # Ordering
//!
//! - [`Scheduler::schedule`] inserts behind every pending task with the same
//!   or an earlier fire time, so same-instant tasks fire in the order they
//!   were scheduled.
//! - [`Scheduler::schedule_immediately`] puts a task at the very front. This
//!   is a same-instant handoff: one state machine passing control straight
//!   to another before anything else sharing that instant runs.
//!
//! A task is pending at most once; scheduling a pending task first removes
//! its old entry. Resume points outlive the pending entry, so the car's
//! current step can be inspected even while it is not scheduled.

use crate::core::time::Time;
use crate::models::task::{ResumePoint, TaskId};
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Resume point and fire time of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord {
    pub resume_point: ResumePoint,
    pub next_time: Time,
}

/// Ordered pending sequence plus task records
///
/// # Example
/// ```
/// use elevator_sim_core_rs::scheduler::Scheduler;
/// use elevator_sim_core_rs::models::task::{CarStep, ResumePoint, TaskId};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(TaskId::DoorMonitor, ResumePoint::CloseDoors, 76);
/// scheduler.schedule(TaskId::Car, ResumePoint::Car(CarStep::Transfer), 20);
///
/// let (task, record) = scheduler.pop_earliest(1000).unwrap();
/// assert_eq!(task, TaskId::Car);
/// assert_eq!(record.next_time, 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Pending tasks, sorted by fire time
    pending: VecDeque<TaskId>,

    /// Last assigned resume point and fire time per known task
    records: HashMap<TaskId, TaskRecord>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to resume at `resume_point` at time `when`
    ///
    /// Any existing pending entry for the task is removed first. The task
    /// lands after every pending task firing at or before `when`.
    ///
    /// # Panics
    /// Panics if `resume_point` is not a step of `task`'s state machine.
    pub fn schedule(&mut self, task: TaskId, resume_point: ResumePoint, when: Time) {
        self.set_record(task, resume_point, when);
        self.remove_pending(task);

        let records = &self.records;
        let position = self
            .pending
            .partition_point(|t| records.get(t).map_or(false, |r| r.next_time <= when));
        self.pending.insert(position, task);
        trace!(%resume_point, when, position, "scheduled");
    }

    /// Schedule `task` at the front of the pending sequence
    ///
    /// # Panics
    /// Panics if `resume_point` is not a step of `task`'s state machine, or
    /// if `when` is later than the task currently at the front (which would
    /// break time ordering).
    pub fn schedule_immediately(&mut self, task: TaskId, resume_point: ResumePoint, when: Time) {
        self.set_record(task, resume_point, when);
        self.remove_pending(task);

        if let Some(front) = self.pending.front().and_then(|t| self.records.get(t)) {
            assert!(
                when <= front.next_time,
                "immediate handoff of {} at {} would jump ahead of {} at {}",
                resume_point,
                when,
                front.resume_point,
                front.next_time
            );
        }
        self.pending.push_front(task);
        trace!(%resume_point, when, "scheduled immediately");
    }

    /// Give `task` a resume point without making it pending
    ///
    /// Used for tasks that start out dormant, such as the parked car.
    pub fn register(&mut self, task: TaskId, resume_point: ResumePoint) {
        assert!(
            !self.is_pending(task),
            "cannot register {:?} while it is scheduled",
            task
        );
        self.set_record(task, resume_point, 0);
    }

    /// Remove `task`'s pending entry, if any
    pub fn cancel(&mut self, task: TaskId) {
        self.remove_pending(task);
    }

    /// Pop the earliest pending task unless it fires at or after `deadline`
    ///
    /// The popped task keeps its record, so its resume point stays visible.
    ///
    /// # Panics
    /// Panics if nothing is pending; a running simulation always has at least
    /// the next rider arrival scheduled.
    pub fn pop_earliest(&mut self, deadline: Time) -> Option<(TaskId, TaskRecord)> {
        let task = *self
            .pending
            .front()
            .unwrap_or_else(|| panic!("pending sequence is empty"));
        let record = self.record(task);
        if record.next_time >= deadline {
            return None;
        }
        self.pending.pop_front();
        Some((task, record))
    }

    /// Drop the record of a task that will never run again
    ///
    /// # Panics
    /// Panics if the task is still pending.
    pub fn retire(&mut self, task: TaskId) {
        assert!(
            !self.is_pending(task),
            "cannot retire {:?} while it is still scheduled",
            task
        );
        self.records.remove(&task);
    }

    /// Current resume point of `task`, pending or not
    pub fn resume_point(&self, task: TaskId) -> Option<ResumePoint> {
        self.records.get(&task).map(|r| r.resume_point)
    }

    /// Fire time of `task` if it is pending
    pub fn next_time(&self, task: TaskId) -> Option<Time> {
        if self.is_pending(task) {
            self.records.get(&task).map(|r| r.next_time)
        } else {
            None
        }
    }

    pub fn is_pending(&self, task: TaskId) -> bool {
        self.pending.contains(&task)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending tasks in firing order
    pub fn pending(&self) -> impl Iterator<Item = (TaskId, TaskRecord)> + '_ {
        self.pending.iter().map(move |&task| (task, self.record(task)))
    }

    fn record(&self, task: TaskId) -> TaskRecord {
        *self
            .records
            .get(&task)
            .unwrap_or_else(|| panic!("{:?} is pending without a record", task))
    }

    fn set_record(&mut self, task: TaskId, resume_point: ResumePoint, when: Time) {
        assert!(
            resume_point.belongs_to(task),
            "{:?} has no resume point {}",
            task,
            resume_point
        );
        self.records.insert(
            task,
            TaskRecord {
                resume_point,
                next_time: when,
            },
        );
    }

    fn remove_pending(&mut self, task: TaskId) {
        if let Some(position) = self.pending.iter().position(|&t| t == task) {
            self.pending.remove(position);
        }
        debug_assert!(!self.pending.contains(&task), "{:?} was pending twice", task);
    }
}
