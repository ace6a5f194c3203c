use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::message::{Response, UserProfile};

use super::Platform;

/// In-memory platform that records every outbound call.
#[derive(Default)]
pub struct MockPlatform {
    pub sent: Mutex<Vec<(u64, Response)>>,
    pub deleted: Mutex<Vec<(u64, u64)>>,
    pub users: Mutex<HashMap<u64, UserProfile>>,
    /// user id -> (guild id, voice channel name)
    pub voice_states: Mutex<HashMap<u64, (u64, String)>>,
    pub connected: Mutex<HashSet<u64>>,
    pub fail_deletes: bool,
    pub delete_delay: Option<Duration>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, r)| r.text.clone()).collect()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn send_message(
        &self,
        channel_id: u64,
        response: &Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().push((channel_id, response.clone()));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deletes {
            return Err("missing permissions".into());
        }
        self.deleted.lock().push((channel_id, message_id));
        Ok(())
    }

    async fn fetch_user(
        &self,
        _guild_id: Option<u64>,
        user_id: u64,
    ) -> Result<Option<UserProfile>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.users.lock().get(&user_id).cloned())
    }

    async fn join_voice(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let state = self.voice_states.lock().get(&user_id).cloned();
        match state {
            Some((guild, name)) if guild == guild_id => {
                self.connected.lock().insert(guild_id);
                Ok(Some(name))
            }
            _ => Ok(None),
        }
    }

    async fn leave_voice(
        &self,
        guild_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.connected.lock().remove(&guild_id))
    }
}
