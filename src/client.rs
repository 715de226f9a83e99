// src/client.rs
// Blocking bridge to the OpenAI-compatible completion endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::prompt::ChatMessage;

pub const MODEL: &str = "gpt-4o-mini";
pub const MAX_TOKENS: u32 = 2000;

/// Temperature used for the actual simulation runs. High on purpose: the
/// study wants variation between repetitions of the same persona.
pub const TEMP_SIMULATION: f32 = 1.4;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw model output plus the usage accounting that came with it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

/// The seam between the orchestrator and the model service. The retry loop
/// only ever sees this trait, so tests can script arbitrary reply sequences.
pub trait CompletionBackend {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> SimResult<Completion>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Live client. One POST per rating query, no timeout beyond ureq defaults;
/// execution is strictly sequential so nothing else is waiting on us.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_env() -> SimResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| SimError::MissingApiKey)?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self { api_key, base_url })
    }
}

impl CompletionBackend for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> SimResult<Completion> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::to_value(ChatRequest {
            model: MODEL,
            messages,
            temperature,
            max_tokens: MAX_TOKENS,
        })?;

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| SimError::Http(Box::new(e)))?;

        let parsed: ChatResponse = response.into_json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        log::debug!(
            "completion used {} tokens ({} prompt / {} completion)",
            parsed.usage.total_tokens,
            parsed.usage.prompt_tokens,
            parsed.usage.completion_tokens
        );

        Ok(Completion { content, usage: parsed.usage })
    }
}
