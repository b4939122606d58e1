//! Pacing delay: a future that completes after a fixed duration.

use std::time::Duration;

/// Completes with `()` once `duration` has elapsed. Never fails.
///
/// Used for pacing between stages and for retry back-off; it is a scheduling
/// point, not I/O.
pub async fn delay(duration: Duration) {
    tracing::debug!(delay_ms = duration.as_millis() as u64, "delay start");
    tokio::time::sleep(duration).await;
    tracing::debug!(delay_ms = duration.as_millis() as u64, "delay done");
}

/// Millisecond convenience for [`delay`].
pub async fn delay_ms(ms: u64) {
    delay(Duration::from_millis(ms)).await
}
