//! Discord gateway adapter.
//!
//! Turns serenity message events into [`MessageContext`]s for the bot and
//! implements [`Platform`] on top of serenity's HTTP client, cache and the
//! songbird voice manager.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityData, ChannelId, Context, CreateEmbed, CreateMessage, EventHandler, GatewayIntents,
    GuildId, Message, MessageId, Ready, Timestamp, UserId,
};
use serenity::cache::Cache;
use serenity::http::{Http, HttpError};
use serenity::Client;
use songbird::{SerenityInit, Songbird};
use tokio_util::sync::CancellationToken;

use crate::bot::Bot;
use crate::message::{MessageContext, Response, UserProfile};

use super::Platform;

fn to_utc(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0)
}

fn to_context(msg: &Message, self_id: UserId) -> MessageContext {
    MessageContext {
        message_id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id: msg.guild_id.map(|g| g.get()),
        author_id: msg.author.id.get(),
        author_name: msg.author.name.clone(),
        is_self: msg.author.id == self_id,
        timestamp: to_utc(msg.timestamp).unwrap_or_else(Utc::now),
        content: msg.content.clone(),
    }
}

fn create_message(response: &Response) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if !response.text.is_empty() {
        builder = builder.content(&response.text);
    }
    if let Some(embed) = &response.embed {
        let mut e = CreateEmbed::new().title(&embed.title);
        for (name, value) in &embed.fields {
            e = e.field(name, value, true);
        }
        if let Some(url) = &embed.thumbnail {
            e = e.thumbnail(url);
        }
        builder = builder.embed(e);
    }
    builder
}

/// Serenity-backed platform handle, built per event from its context.
pub struct DiscordPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    voice: Arc<Songbird>,
}

#[async_trait]
impl Platform for DiscordPlatform {
    async fn send_message(
        &self,
        channel_id: u64,
        response: &Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        ChannelId::new(channel_id)
            .send_message(&self.http, create_message(response))
            .await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn fetch_user(
        &self,
        guild_id: Option<u64>,
        user_id: u64,
    ) -> Result<Option<UserProfile>, Box<dyn std::error::Error + Send + Sync>> {
        if user_id == 0 {
            return Ok(None);
        }

        let user = match self.http.get_user(UserId::new(user_id)).await {
            Ok(user) => user,
            Err(serenity::Error::Http(HttpError::UnsuccessfulRequest(ref resp)))
                if resp.status_code.as_u16() == 404 =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut joined_at = None;
        let mut status = None;
        if let Some(guild) = guild_id.filter(|g| *g != 0).map(GuildId::new) {
            match guild.member(&self.http, user.id).await {
                Ok(member) => joined_at = member.joined_at.and_then(to_utc),
                Err(e) => log::debug!("No member record for {} in {}: {}", user.id, guild, e),
            }
            status = self.cache.guild(guild).and_then(|g| {
                g.presences
                    .get(&user.id)
                    .map(|p| p.status.name().to_string())
            });
        }

        Ok(Some(UserProfile {
            id: user.id.get(),
            name: user.name.clone(),
            status,
            joined_at,
            created_at: to_utc(user.id.created_at()).unwrap_or_default(),
            avatar_url: Some(user.face()),
        }))
    }

    async fn join_voice(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        if guild_id == 0 || user_id == 0 {
            return Ok(None);
        }
        let guild = GuildId::new(guild_id);

        let target = {
            let Some(cached) = self.cache.guild(guild) else {
                return Ok(None);
            };
            cached
                .voice_states
                .get(&UserId::new(user_id))
                .and_then(|state| state.channel_id)
                .map(|channel| {
                    let name = cached
                        .channels
                        .get(&channel)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| channel.to_string());
                    (channel, name)
                })
        };

        let Some((channel, name)) = target else {
            return Ok(None);
        };
        self.voice.join(guild, channel).await?;
        log::info!("Joined voice channel {} in guild {}", name, guild);
        Ok(Some(name))
    }

    async fn leave_voice(
        &self,
        guild_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        if guild_id == 0 {
            return Ok(false);
        }
        let guild = GuildId::new(guild_id);
        if self.voice.get(guild).is_none() {
            return Ok(false);
        }
        self.voice.remove(guild).await?;
        log::info!("Left voice in guild {}", guild);
        Ok(true)
    }
}

struct Handler {
    bot: Arc<Bot>,
    voice: Arc<Songbird>,
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let self_id = ctx.cache.current_user().id;
        let message = to_context(&msg, self_id);
        let platform = DiscordPlatform {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            voice: self.voice.clone(),
        };
        self.bot.handle_message(&platform, &message).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("Logged in as {}", ready.user.name);
        ctx.set_activity(Some(ActivityData::playing(
            self.bot.config().bot.status.clone(),
        )));
    }
}

/// Connect to the gateway and deliver events to `bot` until the connection
/// ends or `shutdown` is cancelled.
pub async fn run(
    bot: Arc<Bot>,
    token: &str,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let voice = Songbird::serenity();
    let handler = Handler {
        bot,
        voice: voice.clone(),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_PRESENCES
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .register_songbird_with(voice)
        .await?;
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                log::error!("Discord client error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown.cancelled() => {
            log::info!("Shutting down gateway connection");
            shard_manager.shutdown_all().await;
        }
    }

    Ok(())
}
