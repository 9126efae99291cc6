use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fetchd_core::types::{FailureCause, FetchRequest};

use crate::error::Result;

/// The four moments in the job lifecycle where handlers may observe or react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// Fires first, once per execution. Payload is the mutable request.
    Before,
    /// Fires when the fetch produced a payload. Payload is the raw bytes.
    Success,
    /// Fires when the fetch failed. Payload is the failure cause.
    Error,
    /// Fires last, once per execution, on every code path.
    After,
}

impl std::fmt::Display for HookPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HookPoint::Before => "before",
            HookPoint::Success => "success",
            HookPoint::Error => "error",
            HookPoint::After => "after",
        };
        write!(f, "{s}")
    }
}

/// What a dispatch carries to its handlers.
#[derive(Debug, Clone)]
pub enum HookPayload {
    /// `before`: the request for this execution. Mutations made by one
    /// handler are visible to the next and to the fetch strategy.
    Request(FetchRequest),
    /// `success`: the raw fetched bytes.
    Payload(Vec<u8>),
    /// `error`: why the fetch failed.
    Failure(FailureCause),
    /// `after`: no data — the execution is over.
    Completed,
}

/// The runtime context passed into every handler invocation.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub point: HookPoint,
    pub payload: HookPayload,
    /// Identity of the job this execution belongs to.
    pub job_name: String,
    /// Unix timestamp (ms) when the dispatch started, for latency accounting.
    pub timestamp: u64,
}

impl HookContext {
    pub fn new(point: HookPoint, job_name: impl Into<String>, payload: HookPayload) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            // Fallback to 0 only if the system clock is broken — acceptable.
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            point,
            payload,
            job_name: job_name.into(),
            timestamp,
        }
    }
}

/// Synchronous hook handler trait.
///
/// Handlers communicate outward through their own side effects (logging,
/// storage, re-dispatch) — the pipeline ignores `Ok` and logs `Err`. They
/// should be cheap: dispatch runs on the executing job's task.
pub trait HookHandler: Send + Sync {
    fn handle(&self, ctx: &mut HookContext) -> Result<()>;
}

/// A registered handler bound to a hook point under a correlation name.
pub struct HookRegistration {
    /// Unique name used for deregistration and log correlation.
    pub name: String,
    pub point: HookPoint,
    /// Wrapped in Arc so registrations can be cloned across the registry.
    pub handler: Arc<dyn HookHandler>,
}

impl HookRegistration {
    pub fn new(
        name: impl Into<String>,
        point: HookPoint,
        handler: Arc<dyn HookHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            point,
            handler,
        }
    }
}
