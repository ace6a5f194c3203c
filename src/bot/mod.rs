use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use parking_lot::Mutex;

use crate::config::Config;
use crate::db::Db;
use crate::module::ModuleRegistry;
use crate::prefixes::PrefixStore;

mod command_handler;
mod incoming;
mod rate_limit;
mod runtime;


use rate_limit::RateLimiter;

pub struct Bot {
    config: Arc<Config>,
    db: Arc<Db>,
    registry: Arc<ModuleRegistry>,
    /// Spam limits and per-user windows. In memory only.
    rate_limiter: Mutex<RateLimiter>,
    prefixes: Mutex<PrefixStore>,
    /// Upper bound on every outbound platform call and module invocation
    platform_timeout: Duration,
}

impl Bot {
    pub fn new(
        config: Arc<Config>,
        db: Arc<Db>,
        registry: ModuleRegistry,
        prefixes: PrefixStore,
    ) -> Self {
        let rate_limiter =
            RateLimiter::new(config.bot.rate_window().unwrap_or(TimeDelta::hours(1)));
        let platform_timeout = Duration::from_secs(config.bot.platform_timeout_secs);
        Self {
            config,
            db,
            registry: Arc::new(registry),
            rate_limiter: Mutex::new(rate_limiter),
            prefixes: Mutex::new(prefixes),
            platform_timeout,
        }
    }

    pub fn with_platform_timeout(mut self, timeout: Duration) -> Self {
        self.platform_timeout = timeout;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
