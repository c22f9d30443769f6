//! Embedding subsystem (spec §4.3): provider abstraction, content-hash
//! dedup cache, and the populate pass that fills in the `embedding` column
//! on Property, Neighborhood, and WikipediaArticle rows.

pub mod cache;
pub mod local;
pub mod mock;
pub mod populate;
pub mod provider;

#[cfg(feature = "http")]
pub mod openai;
#[cfg(feature = "http")]
pub mod voyage;

pub use cache::EmbeddingCache;
pub use local::LocalProvider;
pub use mock::MockProvider;
pub use populate::{populate_neighborhoods, populate_properties, populate_wikipedia};
pub use provider::EmbeddingProvider;

#[cfg(feature = "http")]
pub use openai::OpenAiProvider;
#[cfg(feature = "http")]
pub use voyage::VoyageProvider;

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::error::ConfigError;

/// Build the configured provider from `EmbeddingConfig`.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>, ConfigError> {
    match config.provider {
        EmbeddingProviderKind::Mock => Ok(Box::new(MockProvider::new(config.dimension))),
        EmbeddingProviderKind::Local => Ok(Box::new(LocalProvider::new(config.dimension))),
        #[cfg(feature = "http")]
        EmbeddingProviderKind::Voyage => {
            let api_key = config.api_key.clone().ok_or_else(|| ConfigError::MissingField(
                "embedding.api_key (required for provider = \"voyage\")".to_string(),
            ))?;
            Ok(Box::new(VoyageProvider::new(
                api_key,
                "voyage-2".to_string(),
                config.dimension,
            )))
        }
        #[cfg(feature = "http")]
        EmbeddingProviderKind::OpenAi => {
            let api_key = config.api_key.clone().ok_or_else(|| ConfigError::MissingField(
                "embedding.api_key (required for provider = \"openai\")".to_string(),
            ))?;
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                "text-embedding-3-small".to_string(),
                config.dimension,
            )))
        }
        #[cfg(not(feature = "http"))]
        EmbeddingProviderKind::Voyage | EmbeddingProviderKind::OpenAi => {
            Err(ConfigError::InvalidValue {
                field: "embedding.provider".to_string(),
                reason: format!("{} requires the `http` feature", config.provider),
            })
        }
    }
}
