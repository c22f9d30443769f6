//! A fully deterministic provider with no I/O, used by the test suite and
//! by `dry-run` (spec §4.3, §8 "zero external services").

use async_trait::async_trait;

use crate::error::EmbeddingError;

use super::provider::EmbeddingProvider;

pub struct MockProvider {
    dimension: usize,
}

impl MockProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait(?Send)]
impl EmbeddingProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| deterministic_vector(t, self.dimension)).collect())
    }
}

/// A stable, content-derived vector: same text always yields the same
/// output, different text (almost certainly) yields a different one.
pub fn deterministic_vector(text: &str, dimension: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut values = Vec::with_capacity(dimension);
    for i in 0..dimension {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        i.hash(&mut hasher);
        let bucket = hasher.finish();
        values.push(((bucket % 2000) as f32 / 1000.0) - 1.0);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_same_vector() {
        let provider = MockProvider::new(8);
        let texts = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let out = provider.embed(&texts).await.unwrap();
        assert_eq!(out[0], out[1]);
        assert_ne!(out[0], out[2]);
        assert_eq!(out[0].len(), 8);
    }
}
