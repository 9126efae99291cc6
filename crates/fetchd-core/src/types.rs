use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One outbound call, built fresh for every execution.
///
/// The request is mutable only while it travels through the `before` hook
/// point — handlers may rewrite any field before the strategy sees it. It is
/// never reused across executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Target URI.
    pub endpoint: String,
    /// Request headers. Sorted map so header order is deterministic.
    pub headers: BTreeMap<String, String>,
    /// Raw request body (the reference deployment sends a SOAP envelope).
    pub body: String,
}

impl FetchRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Why a fetch did not produce a payload.
///
/// Every failure a run can encounter is normalised to one of these three —
/// they flow into the `error` hook point and are never fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// Network-level failure: DNS, connect, TLS, or an HTTP error status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The configured bound elapsed before the exchange completed.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// A fault the transport contract did not anticipate (e.g. a panic
    /// inside the strategy), caught at the runner boundary.
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

/// Outcome of one fetch. Produced once per execution, consumed by the hook
/// pipeline, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(Vec<u8>),
    Failure(FailureCause),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}
