use async_trait::async_trait;

use fetchd_core::types::{FetchRequest, FetchResult};

/// One outbound exchange, outcome as a value — never an escaping fault.
///
/// Implementations must bound their own blocking time: the job design is
/// serial, so a hung request would starve the next scheduled trigger. The
/// runner applies a backstop timeout as well, but a well-behaved strategy
/// resolves to `Failure(Timeout)` on its own.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short label for log correlation.
    fn name(&self) -> &str;

    async fn fetch(&self, request: &FetchRequest) -> FetchResult;
}
