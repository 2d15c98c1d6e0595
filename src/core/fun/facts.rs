// Random facts behind a provider port, same shape as the humor service.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Fact {
    pub text: String,
    /// Permalink to the fact on the provider's site, if it has one.
    pub source_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum FactError {
    #[error("fact provider error: {0}")]
    Provider(String),

    #[error("fact provider returned an unreadable response")]
    Malformed,
}

#[async_trait]
pub trait FactProvider: Send + Sync {
    async fn random_fact(&self) -> Result<Fact, FactError>;
}

pub struct FactService<P: FactProvider> {
    provider: P,
}

impl<P: FactProvider> FactService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn random_fact(&self) -> Result<Fact, FactError> {
        let fact = self.provider.random_fact().await?;
        if fact.text.trim().is_empty() {
            return Err(FactError::Malformed);
        }
        Ok(fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedFacts {
        text: &'static str,
    }

    #[async_trait]
    impl FactProvider for CannedFacts {
        async fn random_fact(&self) -> Result<Fact, FactError> {
            Ok(Fact {
                text: self.text.to_string(),
                source_url: Some("https://example.com/fact/1".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn passes_facts_through() {
        let service = FactService::new(CannedFacts {
            text: "Honey never spoils.",
        });

        let fact = service.random_fact().await.unwrap();
        assert_eq!(fact.text, "Honey never spoils.");
        assert!(fact.source_url.is_some());
    }

    #[tokio::test]
    async fn empty_fact_is_malformed() {
        let service = FactService::new(CannedFacts { text: "   " });

        assert!(matches!(
            service.random_fact().await,
            Err(FactError::Malformed)
        ));
    }
}
