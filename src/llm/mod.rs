//! Text generation for requirement extraction and the hackathon copilot.
//!
//! [`LlmClient`] picks a provider from the configured API key: keys starting
//! with `sk-ant-` go to Anthropic, other `sk-` keys go to OpenAI, anything
//! else runs in stub mode. Provider failures are logged and answered with
//! the stub reply, so callers always get text back.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const PLACEHOLDER_KEY: &str = "your-llm-key";

const STUB_PROMPT_CHARS: usize = 160;
const STUB_CONTEXT_CHARS: usize = 120;

/// Settings for [`LlmClient`].
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider API key. Empty selects stub mode.
    pub api_key: String,
    /// Model used with Anthropic keys.
    pub anthropic_model: String,
    /// Model used with OpenAI keys.
    pub openai_model: String,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &Provider::detect(&self.api_key))
            .field("anthropic_model", &self.anthropic_model)
            .field("openai_model", &self.openai_model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            anthropic_model: "claude-3-5-sonnet-20241022".to_string(),
            openai_model: "gpt-4-turbo-preview".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Backend a key is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI chat completions.
    OpenAi,
    /// Deterministic local reply.
    Stub,
}

impl Provider {
    /// Routes an API key to its provider.
    #[must_use]
    pub fn detect(api_key: &str) -> Self {
        let key = api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_KEY {
            Self::Stub
        } else if key.starts_with("sk-ant-") {
            Self::Anthropic
        } else if key.starts_with("sk-") {
            Self::OpenAi
        } else {
            Self::Stub
        }
    }
}

/// Failure talking to a provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport or decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the provider.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response had no text where the provider puts it.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Named JSON values appended to a prompt, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    entries: Vec<(String, serde_json::Value)>,
}

impl PromptContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `key`. Values that fail to serialize become `null`.
    #[must_use]
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.entries.push((key.to_string(), value));
        self
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn render(&self, max_chars: Option<usize>) -> String {
        self.iter()
            .map(|(key, value)| {
                let json = value.to_string();
                let json = match max_chars {
                    Some(limit) => truncate(&json, limit),
                    None => json,
                };
                format!("{key}: {json}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Something that turns a prompt plus context into text.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Generates a reply for `prompt` grounded on `context`.
    async fn generate(&self, prompt: &str, context: &PromptContext) -> Result<String, LlmError>;
}

/// The reply served when no provider is configured or a call fails.
#[must_use]
pub fn stub_reply(prompt: &str, context: &PromptContext) -> String {
    format!(
        "[STUB MODE] Hackathon Copilot response based on prompt: {}\n\nContext:\n{}\n\n\
         Note: Configure LLM_API_KEY to enable real AI responses.",
        truncate(prompt, STUB_PROMPT_CHARS),
        context.render(Some(STUB_CONTEXT_CHARS)),
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

/// Provider-backed [`TextGenerator`] with stub fallback.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
    provider: Provider,
}

impl LlmClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let provider = Provider::detect(&config.api_key);
        Ok(Self {
            http,
            config,
            provider,
        })
    }

    /// The provider the configured key routes to.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.provider
    }

    async fn call_anthropic(&self, full_prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.config.anthropic_model,
            max_tokens: self.config.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: full_prompt,
            }],
        };
        let response = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", self.config.api_key.trim())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let data: AnthropicResponse = response.json().await?;
        data.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| LlmError::MalformedResponse("missing content[0].text".to_string()))
    }

    async fn call_openai(&self, full_prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.config.openai_model,
            max_tokens: self.config.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: full_prompt,
            }],
        };
        let response = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(self.config.api_key.trim())
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let data: OpenAiResponse = response.json().await?;
        data.choices
            .into_iter()
            .find_map(|choice| choice.message?.content)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, context: &PromptContext) -> Result<String, LlmError> {
        let full_prompt = format!("{prompt}\n\nContext:\n{}", context.render(None));
        let result = match self.provider {
            Provider::Anthropic => self.call_anthropic(&full_prompt).await,
            Provider::OpenAi => self.call_openai(&full_prompt).await,
            Provider::Stub => return Ok(stub_reply(prompt, context)),
        };
        match result {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(provider = ?self.provider, error = %e, "llm call failed, using stub reply");
                Ok(stub_reply(prompt, context))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn detects_provider_from_key() {
        assert_eq!(Provider::detect(""), Provider::Stub);
        assert_eq!(Provider::detect("your-llm-key"), Provider::Stub);
        assert_eq!(Provider::detect("sk-ant-api03-abc"), Provider::Anthropic);
        assert_eq!(Provider::detect("sk-proj-abc"), Provider::OpenAi);
        assert_eq!(Provider::detect("gsk_other_vendor"), Provider::Stub);
    }

    #[test]
    fn stub_reply_truncates_prompt_and_context() {
        let prompt = "p".repeat(500);
        let context = PromptContext::new().with("rawText", &"x".repeat(500));
        let reply = stub_reply(&prompt, &context);

        assert!(reply.starts_with("[STUB MODE] Hackathon Copilot response based on prompt: "));
        assert!(reply.contains(&"p".repeat(160)));
        assert!(!reply.contains(&"p".repeat(161)));
        let Some(line) = reply.lines().find(|l| l.starts_with("rawText: ")) else {
            panic!("context line missing");
        };
        assert_eq!(line.chars().count(), "rawText: ".len() + 120);
    }

    #[test]
    fn context_keeps_insertion_order() {
        let context = PromptContext::new()
            .with("b", &1)
            .with("a", &serde_json::json!({"k": "v"}));
        let keys: Vec<&str> = context.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(context.render(None), "b: 1\na: {\"k\":\"v\"}");
    }

    #[test]
    fn debug_hides_the_key() {
        let config = LlmConfig {
            api_key: "sk-ant-secret".to_string(),
            ..LlmConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("Anthropic"));
    }

    #[tokio::test]
    async fn stub_mode_answers_locally() {
        let Ok(client) = LlmClient::new(LlmConfig::default()) else {
            panic!("client should build");
        };
        assert_eq!(client.provider(), Provider::Stub);
        let context = PromptContext::new().with("rawText", "Need a demo video");
        let Ok(reply) = client.generate("Extract submission requirements", &context).await else {
            panic!("stub generation cannot fail");
        };
        assert!(reply.contains("Extract submission requirements"));
        assert!(reply.contains("rawText: \"Need a demo video\""));
    }
}
