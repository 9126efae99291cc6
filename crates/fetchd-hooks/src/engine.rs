use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::RwLock;
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::types::{HookContext, HookPoint, HookRegistration};

/// Central registry and dispatcher for all hook points.
///
/// One instance is shared across the whole process (pass as
/// `Arc<HookEngine>`). Registration happens at startup; the table is
/// read-only once the scheduler is active.
pub struct HookEngine {
    /// Registration order is dispatch order within a point.
    hooks: RwLock<Vec<HookRegistration>>,
}

impl HookEngine {
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Append a handler to the ordered sequence for its point.
    pub fn register(&self, registration: HookRegistration) {
        let mut hooks = self.hooks.write().expect("hook registry poisoned");
        debug!(name = %registration.name, point = %registration.point, "hook registered");
        hooks.push(registration);
    }

    /// Remove a handler by name. Silent no-op if the name is not found.
    pub fn unregister(&self, name: &str) {
        let mut hooks = self.hooks.write().expect("hook registry poisoned");
        let before = hooks.len();
        hooks.retain(|h| h.name != name);
        if hooks.len() < before {
            debug!(name, "hook unregistered");
        }
    }

    /// Number of handlers registered for `point`.
    pub fn handler_count(&self, point: HookPoint) -> usize {
        let hooks = self.hooks.read().expect("hook registry poisoned");
        hooks.iter().filter(|h| h.point == point).count()
    }

    /// Invoke every handler registered for `ctx.point`, in registration
    /// order, synchronously.
    ///
    /// Handler faults are isolated: an `Err` return or a panic is logged
    /// under the handler's name and the remaining handlers still run.
    /// Nothing propagates to the caller — the pipeline is an observer
    /// broadcast, not a filter chain.
    pub fn dispatch(&self, ctx: &mut HookContext) {
        let hooks = self.hooks.read().expect("hook registry poisoned");

        let point = ctx.point;
        for hook in hooks.iter().filter(|h| h.point == point) {
            let t = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| hook.handler.handle(ctx)));
            let elapsed_ms = t.elapsed().as_millis() as u64;

            match outcome {
                Ok(Ok(())) => {
                    debug!(hook = %hook.name, point = %ctx.point, duration_ms = elapsed_ms, "hook completed");
                }
                Ok(Err(e)) => {
                    warn!(hook = %hook.name, point = %ctx.point, duration_ms = elapsed_ms, "hook failed: {e}");
                }
                Err(panic) => {
                    error!(
                        hook = %hook.name,
                        point = %ctx.point,
                        duration_ms = elapsed_ms,
                        "hook panicked: {}",
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
    }
}

impl Default for HookEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}
