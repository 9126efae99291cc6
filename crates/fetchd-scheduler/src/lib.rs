//! `fetchd-scheduler` — recurring-trigger lifecycle.
//!
//! # Overview
//!
//! The [`Scheduler`] owns one [`ScheduleHandle`] per job name: activation is
//! idempotent (a second `activate` for the same name is a no-op, never a
//! duplicate trigger) and deactivation is idempotent (cancelling a missing
//! job is not an error). Timing itself is delegated to a [`TimerHost`] — the
//! scheduler only needs `register_recurring` and `cancel_recurring` from it.
//!
//! [`TokioTimerHost`] is the shipped host: one task per job ticking a
//! `tokio::time::interval`, shut down through a `watch` channel. Cancelling
//! prevents further fires; a fire already in flight runs to completion.

pub mod error;
pub mod host;
pub mod scheduler;
pub mod types;

pub use error::{Result, SchedulerError};
pub use host::{FireCallback, TimerHost, TokioTimerHost};
pub use scheduler::Scheduler;
pub use types::ScheduleHandle;
