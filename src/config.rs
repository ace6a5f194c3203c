use chrono::TimeDelta;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub modules: HashMap<String, ModuleConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    #[serde(default = "default_prefixes_path")]
    pub prefixes_path: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_platform_timeout")]
    pub platform_timeout_secs: u64,
    /// User IDs allowed to change spam limits. Empty means anyone.
    #[serde(default)]
    pub admins: Vec<u64>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl BotConfig {
    /// The rate-limit window, or None when the configured length is zero or
    /// too large to represent.
    pub fn rate_window(&self) -> Option<TimeDelta> {
        i64::try_from(self.rate_limit_window_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_prefix: default_prefix(),
            prefixes_path: default_prefixes_path(),
            db_path: default_db_path(),
            rate_limit_window_secs: default_rate_limit_window(),
            sweep_interval_secs: default_sweep_interval(),
            platform_timeout_secs: default_platform_timeout(),
            admins: Vec::new(),
            status: default_status(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_prefixes_path() -> String {
    "prefixes.json".to_string()
}

fn default_db_path() -> String {
    "chatwarden.db".to_string()
}

fn default_rate_limit_window() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    600
}

fn default_platform_timeout() -> u64 {
    10
}

fn default_status() -> String {
    "Selfbot is running!".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ImageConfig {
    /// Unsplash access key; image search is disabled without one.
    pub access_key: Option<String>,
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            timeout_secs: default_image_timeout(),
        }
    }
}

fn default_image_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ModuleConfig {
    pub enabled: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config: Config = toml::from_str(content)?;
        if config.bot.rate_window().is_none() {
            return Err(format!(
                "bot.rate_limit_window_secs must be a positive number of seconds (got {})",
                config.bot.rate_limit_window_secs
            )
            .into());
        }
        Ok(config)
    }

    pub fn is_module_enabled(&self, name: &str) -> bool {
        self.modules
            .get(name)
            .map(|m| m.enabled)
            .unwrap_or(false)
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.bot.admins.is_empty() || self.bot.admins.contains(&user_id)
    }
}
