//! `fetchd-hooks` — the extension-point pipeline.
//!
//! Four named hook points mark the job lifecycle: `before`, `success`,
//! `error`, `after`. Handlers register against a point and are invoked
//! synchronously in registration order when the runner dispatches it.
//! A misbehaving handler (error return or panic) is isolated: it never
//! stops later handlers and never reaches the dispatcher's caller.

pub mod engine;
pub mod error;
pub mod types;

pub use engine::HookEngine;
pub use error::{HookError, Result};
pub use types::{HookContext, HookHandler, HookPayload, HookPoint, HookRegistration};
