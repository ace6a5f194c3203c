mod bot;
mod config;
mod db;
mod message;
mod module;
mod modules;
mod platform;
mod prefixes;
mod util;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use config::Config;
use db::Db;
use prefixes::PrefixStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,serenity=warn,songbird=warn,tracing=warn"),
    )
    .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let path = Path::new(&config_path);
    if !path.exists() {
        eprintln!("Config file not found: {}", config_path);
        eprintln!("Copy the example and edit it:");
        eprintln!("  cp config.example.toml config.toml");
        std::process::exit(1);
    }

    let config = Arc::new(Config::load(path)?);
    log::info!("Loaded config from {}", config_path);

    let db = Arc::new(Db::open(Path::new(&config.bot.db_path))?);
    log::info!("Database opened at {}", config.bot.db_path);

    let prefixes = PrefixStore::load(Path::new(&config.bot.prefixes_path))?;
    log::info!(
        "Loaded {} prefix override(s) from {}",
        prefixes.len(),
        config.bot.prefixes_path
    );

    let registry = modules::build_registry(&config)?;
    log::info!("Registered {} module(s)", registry.all().len());

    let bot = Arc::new(bot::Bot::new(config.clone(), db, registry, prefixes));
    let shutdown = CancellationToken::new();

    let sweeper = tokio::spawn(bot.clone().run_sweeper(shutdown.clone()));

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        log::info!("Ctrl-C received, shutting down");
        ctrl_c_token.cancel();
    });

    let result = platform::discord::run(bot, &config.discord.token, shutdown.clone()).await;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        log::error!("Sweeper task failed: {}", e);
    }
    result
}
