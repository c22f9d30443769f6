//! OpenAI embeddings provider, gated behind the `http` feature.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::EmbeddingError;

use super::provider::EmbeddingProvider;

const ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            dimension,
        }
    }
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

#[async_trait(?Send)]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "input": texts,
                "model": self.model,
            }))
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
                attempts: 1,
                message: format!("openai returned status {}", response.status()),
            });
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
    }
}
