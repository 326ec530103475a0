//! OpenRouter chat-completion client

use super::ChatModel;
use crate::config::Config;
use crate::error::{JarvisError, JarvisResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const SERVICE: &str = "OpenRouter";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> JarvisResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.openrouter_url.clone(),
            api_key: config.openrouter_api_key.clone(),
            model: config.ai_model.clone(),
            system_prompt: format!(
                "{} Your boss is {}.",
                config.system_prompt, config.user_name
            ),
        })
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> JarvisResult<String> {
        if self.api_key.is_empty() {
            return Err(JarvisError::service(
                SERVICE,
                "no API key configured (set OPENROUTER_API_KEY)",
            ));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!("🤖 Asking {} ({} chars)", self.model, prompt.len());
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("❌ OpenRouter API error ({}): {}", status, body);
            return Err(JarvisError::service(SERVICE, format!("HTTP {}", status)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| JarvisError::service(SERVICE, format!("malformed reply: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| JarvisError::service(SERVICE, "reply contained no message"))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
