use chrono::{DateTime, Utc};

/// An inbound chat message, stripped down to what the bot needs.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub message_id: u64,
    pub channel_id: u64,
    /// None for direct messages
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub author_name: String,
    /// Set when the message was sent by the bot's own account
    pub is_self: bool,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

impl MessageContext {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.author_id)
    }

    #[cfg(test)]
    pub fn for_test(guild_id: Option<u64>, channel_id: u64, author_id: u64, content: &str) -> Self {
        Self {
            message_id: 1,
            channel_id,
            guild_id,
            author_id,
            author_name: format!("user{}", author_id),
            is_self: false,
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub text: String,
    pub embed: Option<Embed>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embed: None,
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            text: String::new(),
            embed: Some(embed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub thumbnail: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url;
        self
    }

    #[cfg(test)]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What the platform knows about a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub status: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub avatar_url: Option<String>,
}
