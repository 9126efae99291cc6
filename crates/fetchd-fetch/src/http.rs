use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use fetchd_core::types::{FailureCause, FetchRequest, FetchResult};

use crate::strategy::FetchStrategy;

/// HTTP(S) transport: one POST per execution.
///
/// The reference deployment posts a SOAP envelope with
/// `Content-Type: text/xml; charset=utf-8`; all of that arrives through the
/// request, so nothing here is SOAP-specific. Each send carries a
/// request-level timeout — a hung exchange resolves to `Failure(Timeout)`
/// instead of blocking the job.
pub struct HttpFetchStrategy {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetchStrategy {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl FetchStrategy for HttpFetchStrategy {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        debug!(endpoint = %request.endpoint, "sending POST");

        let mut builder = self
            .client
            .post(&request.endpoint)
            .timeout(self.timeout)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return FetchResult::Failure(map_transport_error(&e, self.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            // The transport contract treats an HTTP fault as a failed fetch.
            return FetchResult::Failure(FailureCause::Transport(format!(
                "HTTP status {status} from {}",
                request.endpoint
            )));
        }

        match response.bytes().await {
            Ok(bytes) => FetchResult::Success(bytes.to_vec()),
            Err(e) => FetchResult::Failure(map_transport_error(&e, self.timeout)),
        }
    }
}

fn map_transport_error(e: &reqwest::Error, timeout: Duration) -> FailureCause {
    if e.is_timeout() {
        FailureCause::Timeout {
            secs: timeout.as_secs(),
        }
    } else {
        FailureCause::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_carried() {
        let strategy = HttpFetchStrategy::new(30);
        assert_eq!(strategy.timeout, Duration::from_secs(30));
        assert_eq!(strategy.name(), "http");
    }

    #[tokio::test]
    async fn unroutable_endpoint_resolves_to_transport_failure() {
        let strategy = HttpFetchStrategy::new(5);
        // Reserved TLD — never resolves, so the send fails at DNS.
        let request = FetchRequest::new("http://fetchd-test.invalid/svc.asmx");

        match strategy.fetch(&request).await {
            FetchResult::Failure(FailureCause::Transport(_))
            | FetchResult::Failure(FailureCause::Timeout { .. }) => {}
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
