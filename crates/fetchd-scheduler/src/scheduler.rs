use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SchedulerError};
use crate::host::{FireCallback, TimerHost};
use crate::types::ScheduleHandle;

/// Owns the recurring-trigger lifecycle: one active handle per job name.
///
/// Registration and cancellation failures from the host are surfaced to the
/// caller — they are configuration-time errors, not per-run ones. Everything
/// that happens inside a fire is the runner's concern.
pub struct Scheduler {
    host: Arc<dyn TimerHost>,
    handles: Mutex<HashMap<String, ScheduleHandle>>,
}

impl Scheduler {
    pub fn new(host: Arc<dyn TimerHost>) -> Self {
        Self {
            host,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Activate `job_name`: register a recurring trigger with the host and
    /// record its handle. Idempotent — if a handle already exists the call
    /// is a no-op and no duplicate trigger is ever created.
    pub fn activate(
        &self,
        job_name: &str,
        interval: Duration,
        callback: Arc<dyn FireCallback>,
    ) -> Result<()> {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval(format!(
                "interval for {job_name} must be > 0"
            )));
        }

        // Lock held across host registration so two concurrent activates
        // cannot both observe "no handle" and register twice.
        let mut handles = self.handles.lock().expect("schedule registry poisoned");
        if handles.contains_key(job_name) {
            debug!(job = %job_name, "already active — activation is a no-op");
            return Ok(());
        }

        self.host.register_recurring(job_name, interval, callback)?;
        let handle = ScheduleHandle::new(job_name, interval);
        info!(
            job = %job_name,
            interval_secs = interval.as_secs(),
            next_fire = ?handle.next_fire_time,
            "job activated"
        );
        handles.insert(job_name.to_string(), handle);
        Ok(())
    }

    /// Deactivate `job_name`: drop the handle and cancel any pending
    /// trigger. Idempotent — a missing handle is not an error, and the host
    /// cancel runs regardless so a stray registration cannot survive.
    ///
    /// Contract: no new fires after this returns; a fire already in flight
    /// may still complete.
    pub fn deactivate(&self, job_name: &str) -> Result<()> {
        let removed = self
            .handles
            .lock()
            .expect("schedule registry poisoned")
            .remove(job_name);

        self.host.cancel_recurring(job_name)?;

        if removed.is_some() {
            info!(job = %job_name, "job deactivated");
        } else {
            debug!(job = %job_name, "deactivate for inactive job — no-op");
        }
        Ok(())
    }

    /// Snapshot of the active handle for `job_name`, if any.
    pub fn handle(&self, job_name: &str) -> Option<ScheduleHandle> {
        self.handles
            .lock()
            .expect("schedule registry poisoned")
            .get(job_name)
            .cloned()
    }

    pub fn is_active(&self, job_name: &str) -> bool {
        self.handles
            .lock()
            .expect("schedule registry poisoned")
            .contains_key(job_name)
    }
}
