use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// A fixed-length numeric vector produced by a text-to-vector provider.
///
/// The dimension is validated at construction time against the run's
/// configured `embedding.dimension` (spec invariant 3 / testable property
/// 6); once built, an `Embedding` is guaranteed to have that dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>, expected_dimension: usize, provider: &str) -> Result<Self, EmbeddingError> {
        if values.len() != expected_dimension {
            return Err(EmbeddingError::DimensionMismatch {
                provider: provider.to_string(),
                expected: expected_dimension,
                got: values.len(),
            });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    /// Cosine similarity between two embeddings of equal dimension. Panics
    /// on a dimension mismatch: callers within the pipeline only ever
    /// compare embeddings of the same entity type, which share a dimension
    /// by construction (spec invariant 3).
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        assert_eq!(
            self.0.len(),
            other.0.len(),
            "cosine_similarity requires equal-dimension embeddings"
        );
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        let norm_a = self.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b = other.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }
}
