use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

/// Outcome of observing a single message in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Allow,
    /// The sender is over the channel's limit; the message should be removed.
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("limit must be a positive number (got {limit})")]
    InvalidArgument { limit: i64 },
}

#[derive(Debug, Clone)]
struct RateWindow {
    window_start: DateTime<Utc>,
    message_count: u64,
}

/// Fixed-window message counter per (channel, user), enforced only in
/// channels that have a configured limit. State is held in memory only.
pub struct RateLimiter {
    limits: HashMap<u64, u32>,
    windows: HashMap<(u64, u64), RateWindow>,
    window: TimeDelta,
}

impl RateLimiter {
    pub fn new(window: TimeDelta) -> Self {
        Self {
            limits: HashMap::new(),
            windows: HashMap::new(),
            window,
        }
    }

    pub fn configure(&mut self, channel_id: u64, limit: i64) -> Result<(), RateLimitError> {
        let max = u32::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or(RateLimitError::InvalidArgument { limit })?;
        self.limits.insert(channel_id, max);
        Ok(())
    }

    /// Removes the channel's limit along with every window counted in it.
    /// Returns whether a limit was set.
    pub fn clear(&mut self, channel_id: u64) -> bool {
        self.windows.retain(|(channel, _), _| *channel != channel_id);
        self.limits.remove(&channel_id).is_some()
    }

    pub fn limit_for(&self, channel_id: u64) -> Option<u32> {
        self.limits.get(&channel_id).copied()
    }

    pub fn observe(&mut self, channel_id: u64, user_id: u64, now: DateTime<Utc>) -> Action {
        let Some(&max) = self.limits.get(&channel_id) else {
            return Action::Allow;
        };

        let window = self.window;
        let entry = self
            .windows
            .entry((channel_id, user_id))
            .or_insert(RateWindow {
                window_start: now,
                message_count: 0,
            });

        if now - entry.window_start >= window {
            entry.window_start = now;
            entry.message_count = 0;
        }
        entry.message_count += 1;

        if entry.message_count > u64::from(max) {
            Action::Block
        } else {
            Action::Allow
        }
    }

    /// Drops every window whose period has fully elapsed at `now`.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let window = self.window;
        let before = self.windows.len();
        self.windows.retain(|_, w| now - w.window_start < window);
        before - self.windows.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Messages counted in the user's current window, if one is open.
    pub fn message_count(&self, channel_id: u64, user_id: u64) -> Option<u64> {
        self.windows
            .get(&(channel_id, user_id))
            .map(|w| w.message_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C1: u64 = 1001;
    const C2: u64 = 1002;
    const U1: u64 = 2001;
    const U2: u64 = 2002;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_unlimited_channel_always_allows() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        for i in 0..100 {
            assert_eq!(limiter.observe(C2, U1, at(i)), Action::Allow);
        }
        assert_eq!(limiter.window_count(), 0);
    }

    #[test]
    fn test_block_after_limit_then_reset() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 3).unwrap();

        assert_eq!(limiter.observe(C1, U1, at(0)), Action::Allow);
        assert_eq!(limiter.message_count(C1, U1), Some(1));
        assert_eq!(limiter.observe(C1, U1, at(10)), Action::Allow);
        assert_eq!(limiter.observe(C1, U1, at(20)), Action::Allow);
        assert_eq!(limiter.message_count(C1, U1), Some(3));
        assert_eq!(limiter.observe(C1, U1, at(30)), Action::Block);
        assert_eq!(limiter.message_count(C1, U1), Some(4));

        assert_eq!(limiter.observe(C1, U1, at(3601)), Action::Allow);
        assert_eq!(limiter.message_count(C1, U1), Some(1));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 1).unwrap();

        assert_eq!(limiter.observe(C1, U1, at(0)), Action::Allow);
        assert_eq!(limiter.observe(C1, U1, at(3599)), Action::Block);
        assert_eq!(limiter.observe(C1, U1, at(3600)), Action::Allow);
    }

    #[test]
    fn test_window_is_fixed_not_sliding() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 2).unwrap();

        limiter.observe(C1, U1, at(0));
        limiter.observe(C1, U1, at(3000));
        // Window started at 0, so it expires at 3600 even though the last
        // message was recent.
        assert_eq!(limiter.observe(C1, U1, at(3600)), Action::Allow);
        assert_eq!(limiter.message_count(C1, U1), Some(1));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 1).unwrap();
        limiter.configure(C2, 1).unwrap();

        assert_eq!(limiter.observe(C1, U1, at(0)), Action::Allow);
        assert_eq!(limiter.observe(C1, U2, at(1)), Action::Allow);
        assert_eq!(limiter.observe(C2, U1, at(2)), Action::Allow);
        assert_eq!(limiter.observe(C1, U1, at(3)), Action::Block);
        assert_eq!(limiter.message_count(C1, U2), Some(1));
        assert_eq!(limiter.message_count(C2, U1), Some(1));
    }

    #[test]
    fn test_configure_rejects_non_positive() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 5).unwrap();

        assert_eq!(
            limiter.configure(C1, 0),
            Err(RateLimitError::InvalidArgument { limit: 0 })
        );
        assert_eq!(
            limiter.configure(C1, -3),
            Err(RateLimitError::InvalidArgument { limit: -3 })
        );
        assert_eq!(limiter.limit_for(C1), Some(5));

        assert!(limiter.configure(C2, -1).is_err());
        assert_eq!(limiter.limit_for(C2), None);
    }

    #[test]
    fn test_configure_rejects_overflowing_limit() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        assert!(limiter.configure(C1, i64::MAX).is_err());
        assert_eq!(limiter.limit_for(C1), None);
    }

    #[test]
    fn test_configure_overwrites_limit() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 1).unwrap();
        limiter.observe(C1, U1, at(0));
        assert_eq!(limiter.observe(C1, U1, at(1)), Action::Block);

        limiter.configure(C1, 10).unwrap();
        assert_eq!(limiter.limit_for(C1), Some(10));
        assert_eq!(limiter.observe(C1, U1, at(2)), Action::Allow);
    }

    #[test]
    fn test_earlier_timestamp_counts_in_window() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 1).unwrap();
        limiter.observe(C1, U1, at(100));
        assert_eq!(limiter.observe(C1, U1, at(50)), Action::Block);
    }

    #[test]
    fn test_sweep_evicts_expired_windows() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 5).unwrap();
        limiter.observe(C1, U1, at(0));
        limiter.observe(C1, U2, at(1800));
        assert_eq!(limiter.window_count(), 2);

        assert_eq!(limiter.sweep(at(3599)), 0);
        assert_eq!(limiter.sweep(at(3600)), 1);
        assert_eq!(limiter.window_count(), 1);
        assert_eq!(limiter.message_count(C1, U2), Some(1));

        assert_eq!(limiter.sweep(at(5400)), 1);
        assert_eq!(limiter.window_count(), 0);
        assert_eq!(limiter.limit_for(C1), Some(5));
    }

    #[test]
    fn test_clear_removes_limit_and_windows() {
        let mut limiter = RateLimiter::new(TimeDelta::hours(1));
        limiter.configure(C1, 1).unwrap();
        limiter.configure(C2, 1).unwrap();
        limiter.observe(C1, U1, at(0));
        limiter.observe(C2, U1, at(0));

        assert!(limiter.clear(C1));
        assert!(!limiter.clear(C1));
        assert_eq!(limiter.limit_for(C1), None);
        assert_eq!(limiter.window_count(), 1);
        assert_eq!(limiter.observe(C1, U1, at(1)), Action::Allow);
    }

    #[test]
    fn test_window_length_is_configurable() {
        let mut limiter = RateLimiter::new(TimeDelta::minutes(1));
        limiter.configure(C1, 1).unwrap();
        assert_eq!(limiter.observe(C1, U1, at(0)), Action::Allow);
        assert_eq!(limiter.observe(C1, U1, at(59)), Action::Block);
        assert_eq!(limiter.observe(C1, U1, at(60)), Action::Allow);
    }

    #[test]
    fn test_fresh_limiter_has_no_state() {
        let limiter = RateLimiter::new(TimeDelta::hours(1));
        assert_eq!(limiter.limit_for(C1), None);
        assert_eq!(limiter.window_count(), 0);
    }
}
