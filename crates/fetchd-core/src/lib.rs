//! `fetchd-core` — shared types, configuration and errors.
//!
//! Everything the other crates exchange lives here: the per-execution
//! [`FetchRequest`] / [`FetchResult`] values, the failure taxonomy
//! ([`FailureCause`]), and the figment-backed [`config::FetchdConfig`].

pub mod config;
pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{FailureCause, FetchRequest, FetchResult};
