use std::future::Future;

use crate::message::{MessageContext, Response};
use crate::platform::Platform;

use super::rate_limit::Action;
use super::*;

impl Bot {
    /// Entry point for every inbound message: rate limiting first, then
    /// command dispatch.
    pub async fn handle_message(&self, platform: &dyn Platform, ctx: &MessageContext) {
        if ctx.is_self {
            return;
        }

        let (action, count) = {
            let mut limiter = self.rate_limiter.lock();
            let action = limiter.observe(ctx.channel_id, ctx.author_id, ctx.timestamp);
            (action, limiter.message_count(ctx.channel_id, ctx.author_id))
        };

        if action == Action::Block {
            log::warn!(
                "Rate limited: {} ({}) in channel {}, {} message(s) this window",
                ctx.author_name,
                ctx.author_id,
                ctx.channel_id,
                count.unwrap_or_default()
            );
            self.enforce_limit(platform, ctx).await;
            return;
        }

        self.dispatch_command(platform, ctx).await;
    }

    async fn enforce_limit(&self, platform: &dyn Platform, ctx: &MessageContext) {
        self.call_platform(
            "delete message",
            platform.delete_message(ctx.channel_id, ctx.message_id),
        )
        .await;

        let warning = Response::text(format!(
            "{}, you're sending too many messages too fast!",
            ctx.mention()
        ));
        self.call_platform("send warning", platform.send_message(ctx.channel_id, &warning))
            .await;
    }

    pub(super) async fn send_responses(
        &self,
        platform: &dyn Platform,
        channel_id: u64,
        responses: &[Response],
    ) {
        for response in responses {
            self.call_platform("send message", platform.send_message(channel_id, response))
                .await;
        }
    }

    /// Run a platform call under the configured timeout. Failures are
    /// logged and swallowed; nothing is retried.
    pub(super) async fn call_platform<T, F>(&self, what: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, Box<dyn std::error::Error + Send + Sync>>>,
    {
        match tokio::time::timeout(self.platform_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                log::error!("Failed to {}: {}", what, e);
                None
            }
            Err(_) => {
                log::error!(
                    "Timed out trying to {} after {:?}",
                    what,
                    self.platform_timeout
                );
                None
            }
        }
    }
}
