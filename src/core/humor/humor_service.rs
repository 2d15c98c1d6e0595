// Joke analysis - core business logic.
//
// The service owns the analyst persona and the input limits; the actual
// chat completion goes through the `ChatProvider` port so the Discord layer
// and tests never talk to an HTTP API directly.

use super::models::{ChatMessage, HumorConfig, HumorError};
use async_trait::async_trait;

/// Maximum input length accepted for analysis, in characters.
pub const MAX_JOKE_CHARS: usize = 500;

/// The analyst persona sent as the system prompt.
const ANALYSIS_PROMPT: &str = "You are a professional joke critic. In a short, playful tone, \
    break down why the following text is funny: name the setup, the twist that breaks \
    expectations, and any wordplay. If the text is not a joke, find the humor in it anyway \
    and stay gracious about it. Keep the response under 100 words and always end with \
    the exact phrase 'Simply delightful.'";

/// Closing line the prompt asks the model to sign off with. Kept next to
/// the prompt so they cannot drift apart.
pub const SIGNATURE_LINE: &str = "Simply delightful.";

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's reply.
    async fn chat_complete(
        &self,
        messages: &[ChatMessage],
        config: &HumorConfig,
    ) -> Result<String, HumorError>;
}

pub struct HumorService<P: ChatProvider> {
    provider: P,
    config: HumorConfig,
}

impl<P: ChatProvider> HumorService<P> {
    pub fn new(provider: P, config: HumorConfig) -> Self {
        Self { provider, config }
    }

    /// Analyze a joke and return a short written verdict.
    ///
    /// Input is validated before the provider is called: empty input and
    /// input over [`MAX_JOKE_CHARS`] characters are rejected locally.
    pub async fn analyze(&self, joke: &str) -> Result<String, HumorError> {
        let joke = joke.trim();

        if joke.is_empty() {
            return Err(HumorError::Empty);
        }
        if joke.chars().count() > MAX_JOKE_CHARS {
            return Err(HumorError::TooLong {
                limit: MAX_JOKE_CHARS,
            });
        }

        let messages = [ChatMessage::system(ANALYSIS_PROMPT), ChatMessage::user(joke)];

        let reply = self.provider.chat_complete(&messages, &self.config).await?;
        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider that records what it was asked and returns a canned reply.
    struct MockProvider {
        reply: Result<String, HumorError>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl MockProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: HumorError) -> Self {
            Self {
                reply: Err(error),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for MockProvider {
        async fn chat_complete(
            &self,
            messages: &[ChatMessage],
            _config: &HumorConfig,
        ) -> Result<String, HumorError> {
            self.seen.lock().unwrap().extend(messages.iter().cloned());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(HumorError::Provider(msg)) => Err(HumorError::Provider(msg.clone())),
                Err(HumorError::NotConfigured) => Err(HumorError::NotConfigured),
                Err(other) => panic!("unexpected mock error: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn sends_persona_then_joke() {
        let provider = MockProvider::replying("  A classic bait and switch. Simply delightful.  ");
        let service = HumorService::new(provider, HumorConfig::default());

        let verdict = service.analyze("Why did the chicken cross the road?").await.unwrap();

        // Reply is trimmed
        assert_eq!(verdict, "A classic bait and switch. Simply delightful.");

        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, "system");
        assert!(seen[0].content.contains(SIGNATURE_LINE));
        assert_eq!(seen[1].role, "user");
        assert_eq!(seen[1].content, "Why did the chicken cross the road?");
    }

    #[tokio::test]
    async fn rejects_empty_input_without_calling_provider() {
        let provider = MockProvider::replying("should never be returned");
        let service = HumorService::new(provider, HumorConfig::default());

        let result = service.analyze("   \n  ").await;

        assert!(matches!(result, Err(HumorError::Empty)));
        assert!(service.provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_long_input_without_calling_provider() {
        let provider = MockProvider::replying("should never be returned");
        let service = HumorService::new(provider, HumorConfig::default());

        let long_joke = "ha".repeat(251); // 502 chars
        let result = service.analyze(&long_joke).await;

        assert!(matches!(result, Err(HumorError::TooLong { limit: 500 })));
        assert!(service.provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn input_at_the_limit_is_accepted() {
        let provider = MockProvider::replying("ok");
        let service = HumorService::new(provider, HumorConfig::default());

        let joke = "x".repeat(MAX_JOKE_CHARS);
        assert!(service.analyze(&joke).await.is_ok());
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = MockProvider::failing(HumorError::Provider("503 from upstream".into()));
        let service = HumorService::new(provider, HumorConfig::default());

        let result = service.analyze("knock knock").await;

        assert!(matches!(result, Err(HumorError::Provider(msg)) if msg.contains("503")));
    }
}
