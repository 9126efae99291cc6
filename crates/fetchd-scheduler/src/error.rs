use thiserror::Error;

/// Errors that can occur within the scheduling subsystem.
///
/// These surface to the caller of `activate`/`deactivate` — they are
/// configuration-time failures, unlike per-run fetch failures which flow
/// through the `error` hook point.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The requested interval is zero or otherwise unusable.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// The timer host refused or failed the registration/cancellation.
    #[error("Timer host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
