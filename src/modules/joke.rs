use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

const JOKES: &[&str] = &[
    "Why don't skeletons fight each other? They don't have the guts.",
    "I told my wife she was drawing her eyebrows too high. She looked surprised.",
    "Why don't some couples go to the gym? Because some relationships don't work out.",
    "I told my computer I needed a break, and it froze.",
];

pub struct JokeModule;

#[async_trait]
impl Module for JokeModule {
    fn name(&self) -> &str {
        "joke"
    }

    fn description(&self) -> &str {
        "Random joke"
    }

    fn commands(&self) -> &[&str] {
        &["joke"]
    }

    async fn handle_command(
        &self,
        _command: &str,
        _args: &str,
        _ctx: &MessageContext,
        _services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let joke = JOKES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        Ok(Some(vec![Response::text(joke)]))
    }
}
