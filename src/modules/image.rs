use std::time::Duration;

use async_trait::async_trait;

use crate::message::{MessageContext, Response};
use crate::module::{Module, Services};

const UNSPLASH_RANDOM_URL: &str = "https://api.unsplash.com/photos/random";

pub struct ImageModule {
    client: reqwest::Client,
    access_key: Option<String>,
}

impl ImageModule {
    pub fn new(
        access_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            access_key: access_key.filter(|k| !k.trim().is_empty()),
        })
    }
}

/// Pull `urls.regular` out of an Unsplash response. The random endpoint
/// returns a single object, or an array when `count` is given.
fn extract_image_url(json: &serde_json::Value) -> Option<String> {
    let photo = match json {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    photo
        .get("urls")?
        .get("regular")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl Module for ImageModule {
    fn name(&self) -> &str {
        "image"
    }

    fn description(&self) -> &str {
        "Random image for a query"
    }

    fn commands(&self) -> &[&str] {
        &["image"]
    }

    async fn handle_command(
        &self,
        _command: &str,
        args: &str,
        _ctx: &MessageContext,
        _services: &Services<'_>,
    ) -> Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(key) = &self.access_key else {
            return Ok(Some(vec![Response::text("Image search is not configured.")]));
        };

        let query = args.trim();
        if query.is_empty() {
            return Ok(Some(vec![Response::text("Usage: image <query>")]));
        }

        let resp = self
            .client
            .get(UNSPLASH_RANDOM_URL)
            .query(&[("query", query), ("client_id", key.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Image API request failed: {}", e);
                e
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Some(vec![Response::text("No images found for your query.")]));
        }
        if !status.is_success() {
            log::error!("Image API returned HTTP {}", status);
            return Ok(Some(vec![Response::text(format!(
                "Image search unavailable (HTTP {})",
                status.as_u16()
            ))]));
        }

        let json: serde_json::Value = resp.json().await?;
        let text = match extract_image_url(&json) {
            Some(url) => url,
            None => "No images found for your query.".to_string(),
        };
        Ok(Some(vec![Response::text(text)]))
    }
}
