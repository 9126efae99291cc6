use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use fetchd_core::config::FetchdConfig;
use fetchd_fetch::HttpFetchStrategy;
use fetchd_hooks::HookEngine;
use fetchd_runner::JobRunner;
use fetchd_scheduler::{Scheduler, TimerHost, TokioTimerHost};

mod handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetchd=info".into()),
        )
        .init();

    // load config: FETCHD_CONFIG env > ./fetchd.toml
    let config_path = std::env::var("FETCHD_CONFIG").ok();
    let config = FetchdConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({e}), using defaults");
        FetchdConfig::default()
    });
    config.validate()?;

    // hook pipeline — all registration happens before activation, the
    // registry is read-only once the job is live
    let hooks = Arc::new(HookEngine::new());
    handlers::register_baseline(&hooks, &config);

    let strategy = Arc::new(HttpFetchStrategy::new(config.fetch.timeout_secs));
    let runner = Arc::new(JobRunner::from_config(
        &config,
        strategy,
        Arc::clone(&hooks),
    ));

    let host = Arc::new(TokioTimerHost::new());
    let scheduler = Scheduler::new(host as Arc<dyn TimerHost>);
    scheduler.activate(
        &config.job.name,
        Duration::from_secs(config.job.interval_secs),
        runner,
    )?;

    if let Some(handle) = scheduler.handle(&config.job.name) {
        info!(
            job = %handle.job_name,
            endpoint = %config.fetch.endpoint,
            next_fire = ?handle.next_fire_time,
            "fetchd running"
        );
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler.deactivate(&config.job.name)?;
    Ok(())
}
