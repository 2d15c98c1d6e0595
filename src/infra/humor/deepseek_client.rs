// DeepSeek chat-completions client implementing the ChatProvider port.

use crate::core::humor::{ChatMessage, ChatProvider, HumorConfig, HumorError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/chat/completions";

pub struct DeepSeekClient {
    client: Client,
    /// None when the operator never configured a key; requests then fail
    /// with `NotConfigured` so commands can show a friendly notice instead
    /// of an HTTP error.
    api_key: Option<String>,
    api_url: String,
}

impl DeepSeekClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEEPSEEK_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn extract_content(body: &serde_json::Value) -> Result<String, HumorError> {
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| HumorError::Provider("response had no message content".to_string()))
    }
}

#[async_trait]
impl ChatProvider for DeepSeekClient {
    async fn chat_complete(
        &self,
        messages: &[ChatMessage],
        config: &HumorConfig,
    ) -> Result<String, HumorError> {
        let api_key = self.api_key.as_deref().ok_or(HumorError::NotConfigured)?;

        let payload = json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| HumorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(HumorError::Provider(format!(
                "DeepSeek API error: {} - {}",
                status, text
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| HumorError::Provider(e.to_string()))?;

        Self::extract_content(&body)
    }
}
