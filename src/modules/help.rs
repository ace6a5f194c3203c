use async_trait::async_trait;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

pub struct HelpModule;

#[async_trait]
impl Module for HelpModule {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List commands"
    }

    fn commands(&self) -> &[&str] {
        &["help"]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _args: &str,
        _ctx: &MessageContext,
        _services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        // The bot answers help itself since the text is built from the
        // registry and the caller's prefix.
        Ok(None)
    }
}
