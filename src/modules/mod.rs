mod help;
mod image;
mod joke;
mod quotes;
mod stats;
mod user_info;
mod voice;

use crate::config::Config;
use crate::module::ModuleRegistry;

pub fn build_registry(
    config: &Config,
) -> Result<ModuleRegistry, Box<dyn std::error::Error + Send + Sync>> {
    let mut registry = ModuleRegistry::new();

    if config.is_module_enabled("joke") {
        registry.register(Box::new(joke::JokeModule));
    }
    if config.is_module_enabled("image") {
        registry.register(Box::new(image::ImageModule::new(
            config.image.access_key.clone(),
            config.image.timeout_secs,
        )?));
    }
    if config.is_module_enabled("quotes") {
        registry.register(Box::new(quotes::QuotesModule));
    }
    if config.is_module_enabled("userinfo") {
        registry.register(Box::new(user_info::UserInfoModule));
    }
    if config.is_module_enabled("voice") {
        registry.register(Box::new(voice::VoiceModule));
    }
    if config.is_module_enabled("stats") {
        registry.register(Box::new(stats::StatsModule));
    }
    if config.is_module_enabled("help") {
        registry.register(Box::new(help::HelpModule));
    }

    Ok(registry)
}
