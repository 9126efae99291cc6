//! `fetchd-runner` — one job execution, end to end.
//!
//! [`JobRunner::execute`] drives the lifecycle: `before` → fetch →
//! `success`/`error` → `after`. It installs the fault-to-Failure boundary —
//! a panic or overrun inside the strategy becomes a `Failure` routed to the
//! `error` hook point, and `execute` itself never raises.

pub mod runner;

pub use runner::JobRunner;
