//! `fetchflow flaky` – run a randomly failing operation through the retry driver.

use anyhow::Result;
use fetchflow_core::config::FetchflowConfig;
use fetchflow_core::demo::FlakyOperation;
use fetchflow_core::flow::with_timeout_cancellable;
use fetchflow_core::retry::{run_with_retry, RetryPolicy};

pub async fn run_flaky(cfg: &FetchflowConfig, attempts: u32, failure_rate: f64) -> Result<()> {
    let base = cfg.retry_policy();
    let policy = RetryPolicy::new(attempts)
        .with_base_delay(base.base_delay)
        .with_max_delay(base.max_delay);
    let op = FlakyOperation::new(failure_rate);
    let attempt_timeout = cfg.request_timeout();

    tracing::debug!(
        "flaky: attempts={} failure_rate={:.2} schedule={:?}",
        policy.effective_max_attempts(),
        op.failure_rate,
        policy.schedule()
    );

    let outcome = run_with_retry(&policy, || {
        with_timeout_cancellable(attempt_timeout, |token| op.run(token))
    })
    .await?;
    println!("Flaky operation result: {}", outcome);
    Ok(())
}
