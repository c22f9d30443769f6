//! A deterministic, offline stub provider for local development and CI
//! runs without network access. Unlike [`super::mock::MockProvider`], which
//! exists purely for tests, `LocalProvider` is a first-class configuration
//! option (spec §4.3 "providers are interchangeable").

use async_trait::async_trait;

use crate::error::EmbeddingError;

use super::mock::deterministic_vector;
use super::provider::EmbeddingProvider;

pub struct LocalProvider {
    dimension: usize,
}

impl LocalProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait(?Send)]
impl EmbeddingProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| deterministic_vector(t, self.dimension)).collect())
    }
}
