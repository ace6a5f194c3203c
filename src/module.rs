use async_trait::async_trait;

use crate::db::Db;
use crate::message::{MessageContext, Response};
use crate::platform::Platform;

/// Shared handles passed to a module for the duration of one command.
pub struct Services<'a> {
    pub db: &'a Db,
    pub platform: &'a dyn Platform,
}

#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn commands(&self) -> &[&str];

    async fn handle_command(
        &self,
        command: &str,
        args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    pub fn register(&mut self, module: Box<dyn Module>) {
        log::info!("Registered module: {}", module.name());
        self.modules.push(module);
    }

    pub fn find_by_command(&self, command: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|m| m.commands().contains(&command))
            .map(|m| m.as_ref())
    }

    pub fn all(&self) -> &[Box<dyn Module>] {
        &self.modules
    }
}
