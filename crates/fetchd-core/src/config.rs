use std::collections::BTreeMap;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::FetchRequest;

pub const DEFAULT_JOB_NAME: &str = "daily-data-fetch";
pub const DEFAULT_INTERVAL_SECS: u64 = 86_400; // once per day
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Top-level config (fetchd.toml + FETCHD_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FetchdConfig {
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Optional payload sink — when set, successful payloads are appended
    /// to this file by a hook handler the daemon registers.
    #[serde(default)]
    pub sink: Option<SinkConfig>,
}

/// Job identity and cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Stable identity — used identically at activation and deactivation.
    #[serde(default = "default_job_name")]
    pub name: String,
    /// Seconds between fires. Must be > 0.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: default_job_name(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// The outbound exchange: endpoint, headers, body template, timeout.
///
/// All of these are per-run overridable by `before` hook handlers — the
/// values here only seed the initial [`FetchRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            headers: default_headers(),
            body: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// File successful payloads are appended to.
    pub path: String,
}

fn default_job_name() -> String {
    DEFAULT_JOB_NAME.to_string()
}
fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
    headers
}

impl FetchdConfig {
    /// Load config from a TOML file with FETCHD_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./fetchd.toml
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path.unwrap_or("fetchd.toml");

        let config: FetchdConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("FETCHD_").split("_"))
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Reject configs the daemon cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.endpoint.is_empty() {
            return Err(CoreError::Config("fetch.endpoint is required".into()));
        }
        if self.job.interval_secs == 0 {
            return Err(CoreError::Config("job.interval_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Seed the request for one execution from the configured template.
    pub fn request_template(&self) -> FetchRequest {
        FetchRequest {
            endpoint: self.fetch.endpoint.clone(),
            headers: self.fetch.headers.clone(),
            body: self.fetch.body.clone(),
        }
    }
}
