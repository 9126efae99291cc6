use std::time::Duration;

use chrono::{DateTime, Utc};

/// The scheduler's record that a recurring trigger is active for a job.
///
/// Invariant: at most one handle exists per `job_name`. Created on
/// activation, mutated only by the [`Scheduler`](crate::Scheduler), removed
/// on deactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleHandle {
    /// Stable job identity — the same string is used at activation and
    /// deactivation.
    pub job_name: String,
    /// Time between fires. Always > 0.
    pub interval: Duration,
    /// When the next fire is expected, None once unscheduled. Informational
    /// bookkeeping — the timer host owns the actual clock.
    pub next_fire_time: Option<DateTime<Utc>>,
}

impl ScheduleHandle {
    pub fn new(job_name: impl Into<String>, interval: Duration) -> Self {
        let next = Utc::now() + chrono::Duration::seconds(interval.as_secs() as i64);
        Self {
            job_name: job_name.into(),
            interval,
            next_fire_time: Some(next),
        }
    }
}
