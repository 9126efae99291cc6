use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{debug, info, warn};

use fetchd_core::config::FetchdConfig;
use fetchd_core::types::{FailureCause, FetchRequest, FetchResult};
use fetchd_fetch::FetchStrategy;
use fetchd_hooks::{HookContext, HookEngine, HookPayload, HookPoint};
use fetchd_scheduler::FireCallback;

/// Orchestrates one execution per trigger.
///
/// Executions are independent and stateless — the runner holds no mutable
/// state, so overlapping fires from a misbehaving host are harmless.
pub struct JobRunner {
    job_name: String,
    /// Seed request, cloned fresh for every execution.
    template: FetchRequest,
    /// Backstop bound on the fetch. Holds even when the strategy applies no
    /// timeout of its own.
    timeout: Duration,
    strategy: Arc<dyn FetchStrategy>,
    hooks: Arc<HookEngine>,
}

impl JobRunner {
    pub fn new(
        job_name: impl Into<String>,
        template: FetchRequest,
        timeout: Duration,
        strategy: Arc<dyn FetchStrategy>,
        hooks: Arc<HookEngine>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            template,
            timeout,
            strategy,
            hooks,
        }
    }

    /// Build a runner straight from the daemon config.
    pub fn from_config(
        config: &FetchdConfig,
        strategy: Arc<dyn FetchStrategy>,
        hooks: Arc<HookEngine>,
    ) -> Self {
        Self::new(
            config.job.name.clone(),
            config.request_template(),
            Duration::from_secs(config.fetch.timeout_secs),
            strategy,
            hooks,
        )
    }

    /// Run one execution. Never raises — every outcome is communicated
    /// through hook dispatch.
    ///
    /// Exactly one of `success`/`error` fires per call, and `after` fires on
    /// every path out of here, including panics inside the strategy.
    pub async fn execute(&self) {
        debug!(job = %self.job_name, "execution started");

        // `before` sees the request as mutable payload: handlers may rewrite
        // endpoint, headers, or body for this run only.
        let mut ctx = HookContext::new(
            HookPoint::Before,
            &self.job_name,
            HookPayload::Request(self.template.clone()),
        );
        self.hooks.dispatch(&mut ctx);
        let request = match ctx.payload {
            HookPayload::Request(req) => req,
            // A handler swapped the payload kind — fall back to the template
            // rather than skip the run.
            _ => {
                warn!(job = %self.job_name, "before handler replaced the request payload — using template");
                self.template.clone()
            }
        };

        let result = self.bounded_fetch(&request).await;

        match result {
            FetchResult::Success(payload) => {
                info!(job = %self.job_name, bytes = payload.len(), strategy = self.strategy.name(), "fetch succeeded");
                self.hooks.dispatch(&mut HookContext::new(
                    HookPoint::Success,
                    &self.job_name,
                    HookPayload::Payload(payload),
                ));
            }
            FetchResult::Failure(cause) => {
                warn!(job = %self.job_name, strategy = self.strategy.name(), "fetch failed: {cause}");
                self.hooks.dispatch(&mut HookContext::new(
                    HookPoint::Error,
                    &self.job_name,
                    HookPayload::Failure(cause),
                ));
            }
        }

        self.hooks.dispatch(&mut HookContext::new(
            HookPoint::After,
            &self.job_name,
            HookPayload::Completed,
        ));
        debug!(job = %self.job_name, "execution finished");
    }

    /// The fault-to-Failure conversion boundary.
    ///
    /// A strategy panic becomes `Unexpected`; exceeding the bound becomes
    /// `Timeout`. Nothing escapes as a fault.
    async fn bounded_fetch(&self, request: &FetchRequest) -> FetchResult {
        let fetch = AssertUnwindSafe(self.strategy.fetch(request)).catch_unwind();

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => FetchResult::Failure(FailureCause::Unexpected(
                panic_message(panic.as_ref()),
            )),
            Err(_elapsed) => FetchResult::Failure(FailureCause::Timeout {
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl FireCallback for JobRunner {
    async fn fire(&self) {
        self.execute().await;
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use fetchd_hooks::{HookHandler, HookRegistration};

    use super::*;

    /// Appends one line per observed dispatch: "before", "success:<bytes>",
    /// "error:<cause>", or "after".
    struct Observer {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl HookHandler for Observer {
        fn handle(&self, ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
            let line = match &ctx.payload {
                HookPayload::Request(_) => "before".to_string(),
                HookPayload::Payload(bytes) => {
                    format!("success:{}", String::from_utf8_lossy(bytes))
                }
                HookPayload::Failure(cause) => format!("error:{cause}"),
                HookPayload::Completed => "after".to_string(),
            };
            self.log.lock().unwrap().push(line);
            Ok(())
        }
    }

    enum StubBehaviour {
        Succeed(&'static [u8]),
        Fail,
        Panic,
        Hang(Duration),
    }

    struct StubStrategy(StubBehaviour);

    #[async_trait]
    impl FetchStrategy for StubStrategy {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch(&self, _request: &FetchRequest) -> FetchResult {
            match &self.0 {
                StubBehaviour::Succeed(bytes) => FetchResult::Success(bytes.to_vec()),
                StubBehaviour::Fail => {
                    FetchResult::Failure(FailureCause::Transport("connection refused".into()))
                }
                StubBehaviour::Panic => panic!("strategy exploded"),
                StubBehaviour::Hang(d) => {
                    tokio::time::sleep(*d).await;
                    FetchResult::Success(Vec::new())
                }
            }
        }
    }

    fn runner_with(
        behaviour: StubBehaviour,
        timeout: Duration,
    ) -> (JobRunner, Arc<Mutex<Vec<String>>>) {
        let hooks = Arc::new(HookEngine::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        for (name, point) in [
            ("obs-before", HookPoint::Before),
            ("obs-success", HookPoint::Success),
            ("obs-error", HookPoint::Error),
            ("obs-after", HookPoint::After),
        ] {
            hooks.register(HookRegistration::new(
                name,
                point,
                Arc::new(Observer { log: Arc::clone(&log) }),
            ));
        }

        let runner = JobRunner::new(
            "daily-fetch",
            FetchRequest::new("https://example.com/svc.asmx").with_body("<req/>"),
            timeout,
            Arc::new(StubStrategy(behaviour)),
            hooks,
        );
        (runner, log)
    }

    const BOUND: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn success_path_fires_before_success_after_in_order() {
        let (runner, log) = runner_with(StubBehaviour::Succeed(b"<xml/>"), BOUND);
        runner.execute().await;
        assert_eq!(*log.lock().unwrap(), ["before", "success:<xml/>", "after"]);
    }

    #[tokio::test]
    async fn failure_path_fires_error_not_success() {
        let (runner, log) = runner_with(StubBehaviour::Fail, BOUND);
        runner.execute().await;
        assert_eq!(
            *log.lock().unwrap(),
            ["before", "error:transport failure: connection refused", "after"]
        );
    }

    #[tokio::test]
    async fn panicking_strategy_is_normalised_to_error_and_after_still_fires() {
        let (runner, log) = runner_with(StubBehaviour::Panic, BOUND);
        runner.execute().await;
        assert_eq!(
            *log.lock().unwrap(),
            ["before", "error:unexpected fault: strategy exploded", "after"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hung_strategy_is_bounded_and_routed_to_timeout() {
        let (runner, log) = runner_with(StubBehaviour::Hang(Duration::from_secs(600)), BOUND);
        let started = tokio::time::Instant::now();
        runner.execute().await;
        // Paused clock: elapsed time is exactly what the timeout consumed.
        assert_eq!(started.elapsed(), BOUND);
        assert_eq!(
            *log.lock().unwrap(),
            ["before", "error:timed out after 30s", "after"]
        );
    }

    struct PanickingHandler;

    impl HookHandler for PanickingHandler {
        fn handle(&self, _ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
            panic!("misbehaving extension");
        }
    }

    #[tokio::test]
    async fn panicking_success_handler_does_not_prevent_after() {
        let hooks = Arc::new(HookEngine::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        hooks.register(HookRegistration::new(
            "bad-success",
            HookPoint::Success,
            Arc::new(PanickingHandler),
        ));
        hooks.register(HookRegistration::new(
            "obs-after",
            HookPoint::After,
            Arc::new(Observer { log: Arc::clone(&log) }),
        ));

        let runner = JobRunner::new(
            "daily-fetch",
            FetchRequest::new("https://example.com"),
            BOUND,
            Arc::new(StubStrategy(StubBehaviour::Succeed(b"ok"))),
            hooks,
        );
        runner.execute().await;
        assert_eq!(*log.lock().unwrap(), ["after"]);
    }

    struct EndpointOverride;

    impl HookHandler for EndpointOverride {
        fn handle(&self, ctx: &mut HookContext) -> fetchd_hooks::Result<()> {
            if let HookPayload::Request(req) = &mut ctx.payload {
                req.endpoint = "https://staging.example.com/svc.asmx".to_string();
                req.headers
                    .insert("SOAPAction".to_string(), "GetExtendedPrice".to_string());
            }
            Ok(())
        }
    }

    /// Captures the request the strategy actually received.
    struct CapturingStrategy {
        seen: Arc<Mutex<Option<FetchRequest>>>,
    }

    #[async_trait]
    impl FetchStrategy for CapturingStrategy {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn fetch(&self, request: &FetchRequest) -> FetchResult {
            *self.seen.lock().unwrap() = Some(request.clone());
            FetchResult::Success(Vec::new())
        }
    }

    #[tokio::test]
    async fn before_handler_overrides_reach_the_strategy() {
        let hooks = Arc::new(HookEngine::new());
        hooks.register(HookRegistration::new(
            "override",
            HookPoint::Before,
            Arc::new(EndpointOverride),
        ));

        let seen = Arc::new(Mutex::new(None));
        let runner = JobRunner::new(
            "daily-fetch",
            FetchRequest::new("https://prod.example.com/svc.asmx"),
            BOUND,
            Arc::new(CapturingStrategy { seen: Arc::clone(&seen) }),
            hooks,
        );
        runner.execute().await;

        let request = seen.lock().unwrap().clone().expect("strategy never called");
        assert_eq!(request.endpoint, "https://staging.example.com/svc.asmx");
        assert_eq!(
            request.headers.get("SOAPAction").map(String::as_str),
            Some("GetExtendedPrice")
        );
    }
}
