//! Baseline hook handlers the daemon ships with.
//!
//! These are ordinary pipeline extensions — nothing here is special-cased by
//! the scheduler core. Anything heavier (parsing, validation, retries) is
//! expected to register the same way.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use fetchd_core::config::FetchdConfig;
use fetchd_hooks::{
    HookContext, HookEngine, HookError, HookHandler, HookPayload, HookPoint, HookRegistration,
};

/// Logs the size of every successful payload.
struct PayloadLogger;

impl HookHandler for PayloadLogger {
    fn handle(&self, ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
        if let HookPayload::Payload(bytes) = &ctx.payload {
            info!(job = %ctx.job_name, bytes = bytes.len(), "payload received");
        }
        Ok(())
    }
}

/// Logs every failure cause. Failures are reported, never fatal — the job
/// stays scheduled for its next occurrence.
struct FailureLogger;

impl HookHandler for FailureLogger {
    fn handle(&self, ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
        if let HookPayload::Failure(cause) = &ctx.payload {
            error!(job = %ctx.job_name, "fetch failed: {cause}");
        }
        Ok(())
    }
}

/// Appends successful payloads to a file — persistence as a sink the
/// pipeline writes to, not something the core knows about.
struct FileSink {
    path: PathBuf,
}

impl HookHandler for FileSink {
    fn handle(&self, ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
        let HookPayload::Payload(bytes) = &ctx.payload else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| HookError::ExecutionFailed(format!("open {:?}: {e}", self.path)))?;
        file.write_all(bytes)
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| HookError::ExecutionFailed(format!("write {:?}: {e}", self.path)))?;
        Ok(())
    }
}

/// Register the daemon's stock handlers.
pub fn register_baseline(hooks: &HookEngine, config: &FetchdConfig) {
    hooks.register(HookRegistration::new(
        "payload-logger",
        HookPoint::Success,
        Arc::new(PayloadLogger),
    ));
    hooks.register(HookRegistration::new(
        "failure-logger",
        HookPoint::Error,
        Arc::new(FailureLogger),
    ));

    if let Some(sink) = &config.sink {
        hooks.register(HookRegistration::new(
            "file-sink",
            HookPoint::Success,
            Arc::new(FileSink {
                path: PathBuf::from(&sink.path),
            }),
        ));
    }
}
