use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    /// The handler reported a failure. Dispatch logs it and moves on.
    #[error("Hook execution failed: {0}")]
    ExecutionFailed(String),

    /// The handler was registered with invalid or missing configuration.
    #[error("Hook configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, HookError>;
