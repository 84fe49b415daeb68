//! Waiting between teardown phases

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Source of sleeps. Tests swap in a clock that records instead of waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, via `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The wait was interrupted by the cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Sleep for `duration` unless `cancel` fires first.
///
/// The token is checked before sleeping and raced against the sleep.
pub async fn wait(
    clock: &dyn Clock,
    cancel: &CancellationToken,
    duration: Duration,
) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    debug!(seconds = duration.as_secs_f64(), "Waiting");
    tokio::select! {
        _ = clock.sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(Cancelled),
    }
}
