use async_trait::async_trait;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

pub struct QuotesModule;

impl QuotesModule {
    fn cmd_add(
        &self,
        args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let quote = args.trim();
        if quote.is_empty() {
            return Ok("Usage: add_quote <text>".to_string());
        }
        let index = services.db.add_quote(ctx.author_id, quote)?;
        log::debug!("Stored quote #{} from {}", index, ctx.author_name);
        Ok("Quote added!".to_string())
    }

    fn cmd_get(
        &self,
        args: &str,
        services: &Services<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let Ok(index) = args.trim().parse::<u64>() else {
            return Ok("Usage: get_quote <index>".to_string());
        };
        Ok(match services.db.get_quote(index)? {
            Some(quote) => format!("Quote {}: {}", index, quote),
            None => "Quote not found!".to_string(),
        })
    }
}

#[async_trait]
impl Module for QuotesModule {
    fn name(&self) -> &str {
        "quotes"
    }

    fn description(&self) -> &str {
        "Save and recall quotes"
    }

    fn commands(&self) -> &[&str] {
        &["add_quote", "get_quote"]
    }

    async fn handle_command(
        &self,
        command: &str,
        args: &str,
        ctx: &MessageContext,
        services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let text = match command {
            "add_quote" => self.cmd_add(args, ctx, services)?,
            "get_quote" => self.cmd_get(args, services)?,
            _ => return Ok(None),
        };
        Ok(Some(vec![Response::text(text)]))
    }
}
