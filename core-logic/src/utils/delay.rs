//! Cancellable delay primitives for the orchestration loops.
//!
//! Every pacing wait in the bot races a `CancellationToken` so a stop
//! request is observed within the select granularity instead of after the
//! full scheduled delay.

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Sleeps for `duration` unless the token fires first.
///
/// Returns `true` when the full duration elapsed and `false` when the wait
/// was interrupted by cancellation.
pub async fn sleep_cancellable(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = sleep(duration) => true,
    }
}

/// Picks a uniformly random duration in `[min, max]`.
///
/// A degenerate range (`max <= min`) collapses to `min`.
pub fn jitter_range(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let span_ms = (max - min).as_millis() as u64;
    let offset = rand::thread_rng().gen_range(0..=span_ms);
    min + Duration::from_millis(offset)
}
