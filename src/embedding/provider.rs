//! Embedding provider abstraction.
//!
//! This trait defines the interface embedding backends must implement
//! (Voyage, OpenAI, a deterministic local stub, and a fully deterministic
//! mock for tests). All operations are async so HTTP-backed providers can
//! share the orchestrator's `tokio` runtime.

use async_trait::async_trait;

use crate::error::EmbeddingError;

#[async_trait(?Send)]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name as surfaced in error messages and run reports.
    fn name(&self) -> &str;

    /// Fixed output dimension this provider produces.
    fn dimension(&self) -> usize;

    /// Embed a batch of strings, returning one fixed-length vector per
    /// input in the same order.
    ///
    /// # Arguments
    /// * `texts` - input strings to embed
    ///
    /// # Returns
    /// One vector per input text, each of length [`EmbeddingProvider::dimension`].
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
