use crate::message::{MessageContext, Response};
use crate::module::Services;
use crate::platform::Platform;
use crate::prefixes::PrefixStoreError;
use crate::util::parse_channel_ref;

use super::rate_limit::RateLimitError;
use super::*;

const BUILTIN_HELP: &[(&str, &str)] = &[
    ("setprefix", "Change the command prefix"),
    ("setlimit", "Limit how many messages each user may send in a channel"),
];

const SETPREFIX_USAGE: &str = "Usage: setprefix <prefix> | setprefix reset";
const SETLIMIT_USAGE: &str = "Usage: setlimit [#channel] <max messages|off>";

/// Split `text` into command and arguments if it starts with `prefix`.
fn parse_command<'a>(prefix: &str, text: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = text.trim().strip_prefix(prefix)?;
    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (rest, ""),
    };
    if command.is_empty() {
        None
    } else {
        Some((command, args))
    }
}

/// Human wording for a window length, e.g. "hour" or "90 seconds".
fn describe_window(secs: u64) -> String {
    match secs {
        1 => "second".to_string(),
        60 => "minute".to_string(),
        3600 => "hour".to_string(),
        86_400 => "day".to_string(),
        s if s % 86_400 == 0 => format!("{} days", s / 86_400),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

impl Bot {
    pub(super) fn resolve_prefix(&self, ctx: &MessageContext) -> String {
        self.prefixes
            .lock()
            .resolve(ctx.guild_id, ctx.author_id, &self.config.bot.default_prefix)
            .to_string()
    }

    pub(super) async fn dispatch_command(&self, platform: &dyn Platform, ctx: &MessageContext) {
        let prefix = self.resolve_prefix(ctx);
        let (command, args) = match parse_command(&prefix, &ctx.content) {
            Some(parts) => parts,
            None => return,
        };

        let responses = match command {
            "setprefix" => {
                self.record_usage(ctx, command);
                vec![self.cmd_setprefix(args, ctx)]
            }
            "setlimit" | "spam_limit" => {
                self.record_usage(ctx, command);
                vec![self.cmd_setlimit(args, ctx)]
            }
            "help" if self.registry.find_by_command("help").is_some() => {
                self.record_usage(ctx, command);
                vec![Response::text(self.generate_help_text(&prefix))]
            }
            _ => {
                let module = match self.registry.find_by_command(command) {
                    Some(m) => m,
                    None => return,
                };
                self.record_usage(ctx, command);

                let services = Services {
                    db: &self.db,
                    platform,
                };
                let call = module.handle_command(command, args, ctx, &services);
                match tokio::time::timeout(self.platform_timeout, call).await {
                    Ok(Ok(Some(responses))) => responses,
                    Ok(Ok(None)) => return,
                    Ok(Err(e)) => {
                        log::error!("Module {} error: {}", module.name(), e);
                        return;
                    }
                    Err(_) => {
                        log::error!("Module {} timed out on {}", module.name(), command);
                        return;
                    }
                }
            }
        };

        self.send_responses(platform, ctx.channel_id, &responses)
            .await;
    }

    fn record_usage(&self, ctx: &MessageContext, command: &str) {
        log::info!("{} used the {} command.", ctx.author_name, command);
        if let Err(e) = self.db.record_command(ctx.author_id, command) {
            log::error!("Failed to record command usage: {}", e);
        }
    }

    fn cmd_setprefix(&self, args: &str, ctx: &MessageContext) -> Response {
        if args.is_empty() {
            return Response::text(SETPREFIX_USAGE);
        }

        let scope = ctx.guild_id.unwrap_or(ctx.author_id);
        let mut prefixes = self.prefixes.lock();

        if args == "reset" {
            return match prefixes.remove(scope) {
                Ok(_) => Response::text(format!(
                    "Prefix reset to: {}",
                    self.config.bot.default_prefix
                )),
                Err(e) => {
                    log::error!("Failed to reset prefix for {}: {}", scope, e);
                    Response::text("Failed to save prefix.")
                }
            };
        }

        match prefixes.set(scope, args) {
            Ok(()) => {
                log::info!("Prefix for scope {} set to {:?}", scope, args);
                Response::text(format!("Prefix changed to: {}", args))
            }
            Err(PrefixStoreError::EmptyPrefix) => Response::text(SETPREFIX_USAGE),
            Err(e) => {
                log::error!("Failed to save prefix for {}: {}", scope, e);
                Response::text("Failed to save prefix.")
            }
        }
    }

    fn cmd_setlimit(&self, args: &str, ctx: &MessageContext) -> Response {
        if !self.config.is_admin(ctx.author_id) {
            return Response::text("You are not allowed to change spam limits.");
        }

        let parts: Vec<&str> = args.split_whitespace().collect();
        let (channel_id, value) = match parts.as_slice() {
            [value] => (ctx.channel_id, *value),
            [channel, value] => match parse_channel_ref(channel) {
                Some(id) => (id, *value),
                None => return Response::text(SETLIMIT_USAGE),
            },
            _ => return Response::text(SETLIMIT_USAGE),
        };

        let target = if channel_id == ctx.channel_id {
            "this channel".to_string()
        } else {
            format!("<#{}>", channel_id)
        };

        if value.eq_ignore_ascii_case("off") {
            let removed = self.rate_limiter.lock().clear(channel_id);
            return if removed {
                log::info!("Spam limit cleared for channel {}", channel_id);
                Response::text(format!("Spam limit removed for {}.", target))
            } else {
                Response::text(format!("No spam limit was set for {}.", target))
            };
        }

        let Ok(limit) = value.parse::<i64>() else {
            return Response::text(SETLIMIT_USAGE);
        };

        let mut limiter = self.rate_limiter.lock();
        let previous = limiter.limit_for(channel_id);
        match limiter.configure(channel_id, limit) {
            Ok(()) => {
                log::info!(
                    "Spam limit for channel {} set to {} by {} (was {:?})",
                    channel_id,
                    limit,
                    ctx.author_name,
                    previous
                );
                Response::text(format!(
                    "Spam limit for {} set to {} messages per user per {}.",
                    target,
                    limit,
                    describe_window(self.config.bot.rate_limit_window_secs)
                ))
            }
            Err(RateLimitError::InvalidArgument { limit }) => Response::text(format!(
                "Limit must be a positive number (got {}).",
                limit
            )),
        }
    }

    pub(super) fn generate_help_text(&self, prefix: &str) -> String {
        let mut lines = Vec::new();
        for module in self.registry.all() {
            let cmds = module.commands();
            if !cmds.is_empty() {
                let cmd_str = cmds
                    .iter()
                    .map(|c| format!("{}{}", prefix, c))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("{} - {}", cmd_str, module.description()));
            }
        }
        for (command, description) in BUILTIN_HELP {
            lines.push(format!("{}{} - {}", prefix, command, description));
        }
        lines.join("\n")
    }
}
