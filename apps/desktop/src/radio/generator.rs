//! Radio script generation through a chat-completions API.

use super::RadioError;
use crate::config::OpenAiConfig;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;
const TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: usize = 2;
const BASE_BACKOFF_MS: u64 = 500;

/// Produces raw script text for a word list.
pub trait ScriptGenerator: Send + Sync {
    fn generate_script(
        &self,
        words: &[String],
    ) -> impl Future<Output = Result<String, RadioError>> + Send;
}

/// Prompt asking for an English radio script using every word, followed by
/// a Korean translation, with `+`/`-` line signs.
pub fn build_prompt(words: &[String]) -> String {
    format!(
        "Write an English radio script that naturally uses all of the following words, \
         and then write its Korean translation:\n\n{}\n\n\
         Make the script flow smoothly as one connected broadcast. The output is parsed by \
         a program: start every English line with a + sign and every Korean line with a - sign.",
        words.join(", ")
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Clone)]
pub struct OpenAiScriptGenerator {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiScriptGenerator {
    /// Fails without a key so the caller can ask for one before any work.
    pub fn new(config: OpenAiConfig) -> Result<Self, RadioError> {
        if !config.has_key() {
            return Err(RadioError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.api_endpoint.trim_end_matches('/'))
    }

    async fn post_with_retry(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, RadioError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(RadioError::MissingApiKey)?;
        let url = self.url();

        let mut retry = 0;
        loop {
            let result = self.client.post(&url).bearer_auth(api_key).json(request).send().await;
            let err = match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return Ok(serde_json::from_slice(&bytes)?);
                    }
                    let body = resp.text().await.unwrap_or_default();
                    if !is_retryable(status) {
                        return Err(RadioError::Http { status, body });
                    }
                    RadioError::Http { status, body }
                }
                Err(e) => RadioError::Request(e),
            };

            if retry >= MAX_RETRIES {
                return Err(err);
            }
            warn!(retry, error = %err, "script request failed, retrying");
            sleep(Duration::from_millis(BASE_BACKOFF_MS * (1 << retry))).await;
            retry += 1;
        }
    }
}

impl ScriptGenerator for OpenAiScriptGenerator {
    async fn generate_script(&self, words: &[String]) -> Result<String, RadioError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: build_prompt(words),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        info!(model = %self.config.model, words = words.len(), "requesting radio script");
        let response = self.post_with_retry(&request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(RadioError::EmptyResponse);
        }
        Ok(content)
    }
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
