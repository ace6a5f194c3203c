use async_trait::async_trait;

use crate::message::{Embed, MessageContext, Response, UserProfile};
use crate::module::{Module, Services};
use crate::util::{format_timestamp, parse_user_ref};

pub struct UserInfoModule;

fn build_embed(user: &UserProfile) -> Embed {
    let joined = user
        .joined_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "N/A".to_string());
    Embed::new(format!("User Info: {}", user.name))
        .field("ID", user.id.to_string())
        .field("Status", user.status.as_deref().unwrap_or("unknown"))
        .field("Joined At", joined)
        .field("Created At", format_timestamp(&user.created_at))
        .thumbnail(user.avatar_url.clone())
}

#[async_trait]
impl Module for UserInfoModule {
    fn name(&self) -> &str {
        "userinfo"
    }

    fn description(&self) -> &str {
        "Show details about a user"
    }

    fn commands(&self) -> &[&str] {
        &["userinfo"]
    }

    async fn handle_command(
        &self,
        _command: &str,
        args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let target = if args.trim().is_empty() {
            ctx.author_id
        } else {
            match parse_user_ref(args) {
                Some(id) => id,
                None => return Ok(Some(vec![Response::text("User not found.")])),
            }
        };

        let response = match services.platform.fetch_user(ctx.guild_id, target).await? {
            Some(user) => Response::embed(build_embed(&user)),
            None => Response::text("User not found."),
        };
        Ok(Some(vec![response]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::platform::mock::MockPlatform;
    use chrono::DateTime;
    use std::path::Path;

    fn profile(id: u64, name: &str) -> UserProfile {
        UserProfile {
            id,
            name: name.to_string(),
            status: Some("online".to_string()),
            joined_at: DateTime::from_timestamp(1_700_000_000, 0),
            created_at: DateTime::from_timestamp(1_600_000_000, 0).unwrap(),
            avatar_url: Some(format!("https://cdn/avatars/{}.png", id)),
        }
    }

    async fn run(platform: &MockPlatform, author: u64, args: &str) -> Response {
        let db = Db::open(Path::new(":memory:")).unwrap();
        let services = Services { db: &db, platform };
        let ctx = MessageContext::for_test(Some(9), 1, author, "");
        let mut responses = UserInfoModule
            .handle_command("userinfo", args, &ctx, &services)
            .await
            .unwrap()
            .unwrap();
        responses.remove(0)
    }

    #[tokio::test]
    async fn test_defaults_to_author() {
        let platform = MockPlatform::new();
        platform.users.lock().insert(5, profile(5, "alice"));

        let response = run(&platform, 5, "").await;
        let embed = response.embed.unwrap();
        assert_eq!(embed.title, "User Info: alice");
        assert_eq!(embed.field_value("ID"), Some("5"));
        assert_eq!(embed.field_value("Status"), Some("online"));
        assert_eq!(embed.field_value("Joined At"), Some("2023-11-14 22:13:20"));
        assert_eq!(embed.field_value("Created At"), Some("2020-09-13 12:26:40"));
        assert_eq!(embed.thumbnail.as_deref(), Some("https://cdn/avatars/5.png"));
    }

    #[tokio::test]
    async fn test_mentioned_user() {
        let platform = MockPlatform::new();
        platform.users.lock().insert(5, profile(5, "alice"));
        platform.users.lock().insert(6, profile(6, "bob"));

        let response = run(&platform, 5, "<@!6>").await;
        assert_eq!(response.embed.unwrap().title, "User Info: bob");
    }

    #[tokio::test]
    async fn test_missing_guild_details() {
        let platform = MockPlatform::new();
        let mut user = profile(7, "carol");
        user.joined_at = None;
        user.status = None;
        platform.users.lock().insert(7, user);

        let embed = run(&platform, 7, "").await.embed.unwrap();
        assert_eq!(embed.field_value("Joined At"), Some("N/A"));
        assert_eq!(embed.field_value("Status"), Some("unknown"));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let platform = MockPlatform::new();
        assert_eq!(run(&platform, 5, "<@404>").await.text, "User not found.");
        assert_eq!(run(&platform, 5, "nobody").await.text, "User not found.");
    }
}
