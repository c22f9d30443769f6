//! Content-hash deduplication: if the same text was already embedded
//! earlier in the run, reuse the vector instead of calling the provider
//! again (spec §4.3). Cross-run caching is explicitly out of scope.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
pub struct EmbeddingCache {
    by_fingerprint: HashMap<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, text: &str) -> Option<&Vec<f32>> {
        self.by_fingerprint.get(&Self::fingerprint(text))
    }

    pub fn insert(&mut self, text: &str, vector: Vec<f32>) {
        self.by_fingerprint.insert(Self::fingerprint(text), vector);
    }

    pub fn len(&self) -> usize {
        self.by_fingerprint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fingerprint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_vector_for_identical_text() {
        let mut cache = EmbeddingCache::new();
        cache.insert("hello", vec![1.0, 2.0]);
        assert_eq!(cache.get("hello"), Some(&vec![1.0, 2.0]));
        assert_eq!(cache.get("goodbye"), None);
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(EmbeddingCache::fingerprint("x"), EmbeddingCache::fingerprint("x"));
        assert_ne!(EmbeddingCache::fingerprint("x"), EmbeddingCache::fingerprint("y"));
    }
}
