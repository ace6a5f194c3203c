use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::*;

impl Bot {
    /// Evict rate windows that have expired as of `now`.
    pub fn sweep_rate_windows(&self, now: DateTime<Utc>) -> usize {
        let mut limiter = self.rate_limiter.lock();
        let evicted = limiter.sweep(now);
        if evicted > 0 {
            log::debug!(
                "Evicted {} expired rate window(s), {} remaining",
                evicted,
                limiter.window_count()
            );
        }
        evicted
    }

    /// Periodically sweep expired rate windows until `shutdown` fires.
    pub async fn run_sweeper(self: Arc<Self>, shutdown: CancellationToken) {
        let interval = Duration::from_secs(self.config.bot.sweep_interval_secs.max(1));
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Rate window sweeper running every {}s", interval.as_secs());
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("Rate window sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep_rate_windows(Utc::now());
                }
            }
        }
    }
}
