use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One turn of a chat-completion conversation. This is also the wire shape
/// sent to the provider, hence the serde derives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
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

#[derive(Debug, Clone)]
pub struct HumorConfig {
    pub model: String,
    pub temperature: f32,
    /// Hard cap on response length. Analyses are meant to be one-liners,
    /// not essays.
    pub max_tokens: u32,
}

impl Default for HumorConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

#[derive(Debug, Error)]
pub enum HumorError {
    #[error("joke is too long ({limit} character limit)")]
    TooLong { limit: usize },

    #[error("there is nothing to analyze")]
    Empty,

    #[error("analysis backend is not configured")]
    NotConfigured,

    #[error("provider error: {0}")]
    Provider(String),
}
