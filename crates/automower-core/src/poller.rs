// ── Periodic polling ──

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::MowerApi;
use crate::error::CoreError;
use crate::registry::{MowerRegistry, PollReport};

/// Poll every mower immediately, then once per `period`, until `cancel`
/// fires. A slow cycle delays the next tick instead of bursting to catch
/// up. `on_cycle` sees each cycle's report.
///
/// Returns the number of completed cycles, or [`CoreError::Config`] for a
/// zero `period`.
pub async fn run<A, F>(
    registry: &mut MowerRegistry<A>,
    period: Duration,
    cancel: CancellationToken,
    mut on_cycle: F,
) -> Result<u64, CoreError>
where
    A: MowerApi,
    F: FnMut(&PollReport),
{
    if period.is_zero() {
        return Err(CoreError::Config {
            message: "poll period must be greater than zero".into(),
        });
    }

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let report = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    report = registry.poll_all() => report,
                };
                cycles += 1;
                debug!(
                    cycle = cycles,
                    updated = report.updated.len(),
                    stale = report.stale.len(),
                    skipped = report.skipped.len(),
                    failed = report.failed.len(),
                    "poll cycle complete"
                );
                on_cycle(&report);
            }
        }
    }

    debug!(cycles, "poller stopped");
    Ok(cycles)
}
