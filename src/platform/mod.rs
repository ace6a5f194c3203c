//! The narrow surface through which the bot talks to the chat platform.

pub mod discord;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::message::{Response, UserProfile};

#[async_trait]
pub trait Platform: Send + Sync {
    async fn send_message(
        &self,
        channel_id: u64,
        response: &Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Look a user up, with guild-specific details when `guild_id` is set.
    async fn fetch_user(
        &self,
        guild_id: Option<u64>,
        user_id: u64,
    ) -> Result<Option<UserProfile>, Box<dyn std::error::Error + Send + Sync>>;

    /// Join the voice channel `user_id` is currently in. Returns the channel
    /// name, or None if the user is not in voice.
    async fn join_voice(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns false if there was no voice connection in the guild.
    async fn leave_voice(
        &self,
        guild_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
