//! Drives the embedding subsystem across the three embeddable entity
//! types, applying the content-hash cache and bounded retry/backoff
//! (spec §4.3, §5).

use std::time::Duration;

use tracing::warn;

use crate::error::EmbeddingError;
use crate::models::{Embedding, Neighborhood, Property, WikipediaArticle};

use super::cache::EmbeddingCache;
use super::provider::EmbeddingProvider;

/// Embed a batch of texts through `provider`, retrying up to
/// `retry_attempts` times with exponential backoff on failure, and
/// populate `cache` with every newly computed vector.
async fn embed_with_retry(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    retry_attempts: u32,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut attempt = 0;
    loop {
        match provider.embed(texts).await {
            Ok(vectors) => return Ok(vectors),
            Err(e) if attempt + 1 < retry_attempts => {
                attempt += 1;
                let backoff = Duration::from_millis(200 * 2u64.pow(attempt));
                warn!(
                    provider = provider.name(),
                    attempt, error = %e, "embedding call failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                return Err(EmbeddingError::ProviderUnavailable {
                    provider: provider.name().to_string(),
                    attempts: attempt + 1,
                    message: e.to_string(),
                })
            }
        }
    }
}

async fn embed_texts(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
    retry_attempts: u32,
    cache: &mut EmbeddingCache,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
    let mut to_fetch_indices = Vec::new();
    let mut to_fetch_texts = Vec::new();

    for (i, text) in texts.iter().enumerate() {
        if let Some(cached) = cache.get(text) {
            results[i] = Some(cached.clone());
        } else {
            to_fetch_indices.push(i);
            to_fetch_texts.push(text.clone());
        }
    }

    for chunk_start in (0..to_fetch_texts.len()).step_by(batch_size.max(1)) {
        let chunk_end = (chunk_start + batch_size).min(to_fetch_texts.len());
        let chunk = &to_fetch_texts[chunk_start..chunk_end];
        let vectors = embed_with_retry(provider, chunk, retry_attempts).await?;
        if vectors.len() != chunk.len() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: provider.name().to_string(),
                attempts: 1,
                message: "provider returned a different number of vectors than inputs".to_string(),
            });
        }
        for (offset, vector) in vectors.into_iter().enumerate() {
            let original_index = to_fetch_indices[chunk_start + offset];
            cache.insert(&to_fetch_texts[chunk_start + offset], vector.clone());
            results[original_index] = Some(vector);
        }
    }

    Ok(results.into_iter().map(|v| v.expect("every index was filled")).collect())
}

pub async fn populate_properties(
    properties: &mut [Property],
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
    retry_attempts: u32,
    cache: &mut EmbeddingCache,
) -> Result<(), EmbeddingError> {
    let texts: Vec<String> = properties.iter().map(Property::embedding_text).collect();
    let vectors = embed_texts(provider, &texts, batch_size, retry_attempts, cache).await?;
    for (property, vector) in properties.iter_mut().zip(vectors) {
        property.embedding = Some(Embedding::new(vector, provider.dimension(), provider.name())?);
    }
    Ok(())
}

pub async fn populate_neighborhoods(
    neighborhoods: &mut [Neighborhood],
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
    retry_attempts: u32,
    cache: &mut EmbeddingCache,
) -> Result<(), EmbeddingError> {
    let texts: Vec<String> = neighborhoods.iter().map(Neighborhood::embedding_text).collect();
    let vectors = embed_texts(provider, &texts, batch_size, retry_attempts, cache).await?;
    for (neighborhood, vector) in neighborhoods.iter_mut().zip(vectors) {
        neighborhood.embedding =
            Some(Embedding::new(vector, provider.dimension(), provider.name())?);
    }
    Ok(())
}

pub async fn populate_wikipedia(
    articles: &mut [WikipediaArticle],
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
    retry_attempts: u32,
    cache: &mut EmbeddingCache,
) -> Result<(), EmbeddingError> {
    let texts: Vec<String> = articles.iter().map(|a| a.embedding_text().to_string()).collect();
    let vectors = embed_texts(provider, &texts, batch_size, retry_attempts, cache).await?;
    for (article, vector) in articles.iter_mut().zip(vectors) {
        article.embedding = Some(Embedding::new(vector, provider.dimension(), provider.name())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::MockProvider;
    use crate::models::Address;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn property(description: &str) -> Property {
        Property {
            listing_id: "P".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "SF".to_string(),
                city_normalized: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94110".to_string(),
                latitude: None,
                longitude: None,
            },
            price: 500_000.0,
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: 900,
            year_built: None,
            property_type: "condo".to_string(),
            features: BTreeSet::new(),
            description: description.to_string(),
            listing_date: Utc::now(),
            embedding: None,
            neighborhood_id: None,
        }
    }

    #[tokio::test]
    async fn populates_embeddings_and_reuses_cache_for_duplicate_text() {
        let mut properties = vec![property("same"), property("same"), property("different")];
        let provider = MockProvider::new(4);
        let mut cache = EmbeddingCache::new();
        populate_properties(&mut properties, &provider, 32, 3, &mut cache)
            .await
            .unwrap();
        assert!(properties.iter().all(|p| p.embedding.is_some()));
        assert_eq!(
            properties[0].embedding.as_ref().unwrap().as_slice(),
            properties[1].embedding.as_ref().unwrap().as_slice()
        );
    }
}
