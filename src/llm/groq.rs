use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatCompletion, Message};
use crate::error::ApiError;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-style error envelope: `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GroqClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: GROQ_API_URL.to_string(),
            model,
        }
    }

    /// Point the client at a different chat completions endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ApiError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(self)
    }

    /// Send a chat message and get a response (non-streaming)
    pub async fn chat(&self, messages: &[Message]) -> Result<String, ApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: Some(0.3),
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            url = %self.api_url,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: error_message(&text),
            });
        }

        let body = response.text().await.map_err(ApiError::Transport)?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ApiError::EmptyCompletion)
    }
}

impl ChatCompletion for GroqClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, ApiError> {
        self.chat(messages).await
    }
}

/// Pull the provider's message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "(empty response body)".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
