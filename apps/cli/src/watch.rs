//! Periodic headphone detection
//!
//! The engine call is synchronous and may block on COM and the endpoint
//! enumerator, so each poll runs on the blocking pool. Polls never overlap:
//! the next tick is only awaited after the previous scan returned.

use std::sync::Arc;
use std::time::Duration;

use devcycle_core::{DeviceManager, DevicePlatform, EndpointMatch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Poll until `cancel` fires, calling `on_change` with the first result and
/// every result that differs from the previous one. Returns the number of polls.
pub async fn poll_headphones<P, F>(
    manager: Arc<DeviceManager<P>>,
    interval: Duration,
    cancel: CancellationToken,
    mut on_change: F,
) -> anyhow::Result<usize>
where
    P: DevicePlatform + Send + Sync + 'static,
    F: FnMut(&EndpointMatch),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last: Option<EndpointMatch> = None;
    let mut polls = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let manager = Arc::clone(&manager);
                let result =
                    tokio::task::spawn_blocking(move || manager.detect_headphone_like_endpoint())
                        .await?;
                polls += 1;

                if last.as_ref() != Some(&result) {
                    tracing::debug!(found = result.found, name = %result.friendly_name, "Detection changed");
                    on_change(&result);
                    last = Some(result);
                }
            }
        }
    }

    tracing::debug!(polls, "Auto-detect stopped");
    Ok(polls)
}
