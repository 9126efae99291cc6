use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{Result, SchedulerError};

/// What the host invokes on every trigger.
#[async_trait]
pub trait FireCallback: Send + Sync {
    async fn fire(&self);
}

/// The registration interface — the only two operations the scheduler
/// requires from the host timing subsystem.
pub trait TimerHost: Send + Sync {
    /// Start invoking `callback` every `interval`, first fire at
    /// now + interval, until cancelled.
    fn register_recurring(
        &self,
        job_name: &str,
        interval: Duration,
        callback: Arc<dyn FireCallback>,
    ) -> Result<()>;

    /// Stop firing `job_name`. Must be idempotent — cancelling an unknown
    /// name is not an error. A fire already in flight may still complete.
    fn cancel_recurring(&self, job_name: &str) -> Result<()>;
}

/// Tokio-backed timer host: one spawned task per registered job.
///
/// Fires are serial within a job — the task awaits the callback before the
/// next tick is taken, so a single job never overlaps itself.
pub struct TokioTimerHost {
    /// job name → shutdown sender for the job's tick task.
    tasks: Mutex<HashMap<String, watch::Sender<bool>>>,
}

impl TokioTimerHost {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_registered(&self, job_name: &str) -> bool {
        self.tasks
            .lock()
            .expect("timer host registry poisoned")
            .contains_key(job_name)
    }
}

impl TimerHost for TokioTimerHost {
    fn register_recurring(
        &self,
        job_name: &str,
        interval: Duration,
        callback: Arc<dyn FireCallback>,
    ) -> Result<()> {
        if interval.is_zero() {
            // tokio::time::interval panics on a zero period.
            return Err(SchedulerError::InvalidInterval(format!(
                "interval for {job_name} must be > 0"
            )));
        }

        let mut tasks = self.tasks.lock().expect("timer host registry poisoned");
        if tasks.contains_key(job_name) {
            return Err(SchedulerError::Host(format!(
                "recurring trigger already registered for {job_name}"
            )));
        }

        let (tx, mut rx) = watch::channel(false);
        tasks.insert(job_name.to_string(), tx);

        let name = job_name.to_string();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Consume the immediate first tick so the first fire lands at
            // now + interval, matching the handle's next_fire_time.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!(job = %name, "trigger fired");
                        callback.fire().await;
                    }
                    changed = rx.changed() => {
                        // A dropped sender means the host itself is gone —
                        // that counts as cancellation too.
                        if changed.is_err() || *rx.borrow() {
                            info!(job = %name, "recurring trigger cancelled");
                            break;
                        }
                    }
                }
            }
        });

        info!(job = %job_name, interval_secs = interval.as_secs(), "recurring trigger registered");
        Ok(())
    }

    fn cancel_recurring(&self, job_name: &str) -> Result<()> {
        let removed = self
            .tasks
            .lock()
            .expect("timer host registry poisoned")
            .remove(job_name);

        match removed {
            Some(tx) => {
                // The task may already be gone if the runtime is shutting
                // down; that still counts as cancelled.
                if tx.send(true).is_err() {
                    warn!(job = %job_name, "tick task already stopped");
                }
            }
            None => debug!(job = %job_name, "cancel for unknown job — no-op"),
        }
        Ok(())
    }
}

impl Default for TokioTimerHost {
    fn default() -> Self {
        Self::new()
    }
}
