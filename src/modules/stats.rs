use async_trait::async_trait;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

pub struct StatsModule;

#[async_trait]
impl Module for StatsModule {
    fn name(&self) -> &str {
        "stats"
    }

    fn description(&self) -> &str {
        "Your command usage"
    }

    fn commands(&self) -> &[&str] {
        &["stats"]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let usage = services.db.command_usage(ctx.author_id)?;
        let text = if usage.is_empty() {
            "No commands used yet.".to_string()
        } else {
            let lines: Vec<String> = usage
                .iter()
                .map(|(command, count)| format!("{}: {}", command, count))
                .collect();
            format!("Command usage for {}:\n{}", ctx.author_name, lines.join("\n"))
        };
        Ok(Some(vec![Response::text(text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::platform::mock::MockPlatform;
    use std::path::Path;

    #[tokio::test]
    async fn test_stats_lists_usage() {
        let db = Db::open(Path::new(":memory:")).unwrap();
        let platform = MockPlatform::new();
        let services = Services {
            db: &db,
            platform: &platform,
        };
        let ctx = MessageContext::for_test(None, 1, 3, "");

        let responses = StatsModule
            .handle_command("stats", "", &ctx, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(responses[0].text, "No commands used yet.");

        db.record_command(3, "joke").unwrap();
        db.record_command(3, "joke").unwrap();
        db.record_command(3, "stats").unwrap();

        let responses = StatsModule
            .handle_command("stats", "", &ctx, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            responses[0].text,
            "Command usage for user3:\njoke: 2\nstats: 1"
        );
    }
}
