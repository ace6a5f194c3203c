use async_trait::async_trait;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

const NOT_IN_VOICE: &str = "You need to be in a voice channel to use this command.";
const NOT_CONNECTED: &str = "I'm not in a voice channel!";

pub struct VoiceModule;

#[async_trait]
impl Module for VoiceModule {
    fn name(&self) -> &str {
        "voice"
    }

    fn description(&self) -> &str {
        "Join or leave your voice channel"
    }

    fn commands(&self) -> &[&str] {
        &["join", "leave"]
    }

    async fn handle_command(
        &self,
        command: &str,
        _args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let text = match (command, ctx.guild_id) {
            ("join", Some(guild_id)) => {
                match services.platform.join_voice(guild_id, ctx.author_id).await? {
                    Some(channel) => format!("Joined {}!", channel),
                    None => NOT_IN_VOICE.to_string(),
                }
            }
            ("join", None) => NOT_IN_VOICE.to_string(),
            ("leave", Some(guild_id)) => {
                if services.platform.leave_voice(guild_id).await? {
                    "Disconnected from the voice channel.".to_string()
                } else {
                    NOT_CONNECTED.to_string()
                }
            }
            ("leave", None) => NOT_CONNECTED.to_string(),
            _ => return Ok(None),
        };
        Ok(Some(vec![Response::text(text)]))
    }
}
