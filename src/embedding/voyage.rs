//! Voyage AI embeddings provider, gated behind the `http` feature.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::EmbeddingError;

use super::provider::EmbeddingProvider;

const ENDPOINT: &str = "https://api.voyageai.com/v1/embeddings";

pub struct VoyageProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimension: usize,
}

impl VoyageProvider {
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
struct VoyageResponse {
    data: Vec<VoyageEmbedding>,
}

#[derive(Deserialize)]
struct VoyageEmbedding {
    embedding: Vec<f32>,
}

#[async_trait(?Send)]
impl EmbeddingProvider for VoyageProvider {
    fn name(&self) -> &str {
        "voyage"
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
                message: format!("voyage returned status {}", response.status()),
            });
        }

        let parsed: VoyageResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
    }
}
