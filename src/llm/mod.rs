pub mod groq;

pub use groq::GroqClient;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat model that turns a conversation into a single completion
#[allow(async_fn_in_trait)]
pub trait ChatCompletion {
    async fn complete(&self, messages: &[Message]) -> Result<String, ApiError>;
}
