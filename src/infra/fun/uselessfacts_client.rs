// Useless Facts API client implementing the FactProvider port.

use crate::core::fun::{Fact, FactError, FactProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const FACTS_API_URL: &str = "https://uselessfacts.jsph.pl/api/v2/facts/random";

#[derive(Debug, Deserialize)]
struct FactResponse {
    text: String,
    permalink: Option<String>,
}

pub struct UselessFactsClient {
    client: Client,
    api_url: String,
}

impl UselessFactsClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_url: FACTS_API_URL.to_string(),
        }
    }
}

impl Default for UselessFactsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactProvider for UselessFactsClient {
    async fn random_fact(&self) -> Result<Fact, FactError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("language", "en")])
            .send()
            .await
            .map_err(|e| FactError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FactError::Provider(format!(
                "facts API returned {}",
                response.status()
            )));
        }

        let body: FactResponse = response.json().await.map_err(|_| FactError::Malformed)?;

        Ok(Fact {
            text: body.text,
            source_url: body.permalink,
        })
    }
}
