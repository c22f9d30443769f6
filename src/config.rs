//! Configuration surface
//!
//! Parsed from a TOML file (default `realty-pipeline.toml`) with environment
//! variable overrides, following the same convention as the teacher's
//! `database::config` module (`DATA_MODEL_DB_BACKEND` etc.) but namespaced
//! under `RE_PIPELINE_*`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding `embedding.provider`.
pub const ENV_EMBEDDING_PROVIDER: &str = "RE_PIPELINE_EMBEDDING_PROVIDER";
/// Environment variable overriding `destinations.search.host`.
pub const ENV_SEARCH_HOST: &str = "RE_PIPELINE_SEARCH_HOST";
/// Environment variable overriding `destinations.graph.uri`.
pub const ENV_GRAPH_URI: &str = "RE_PIPELINE_GRAPH_URI";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub properties_path: PathBuf,
    pub neighborhoods_path: PathBuf,
    pub wikipedia_db_path: PathBuf,
    #[serde(default)]
    pub locations_path: Option<PathBuf>,
    /// Testing knob: if set, truncate every source to at most N records.
    #[serde(default)]
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    Voyage,
    OpenAi,
    Local,
    Mock,
}

impl std::fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EmbeddingProviderKind::Voyage => "voyage",
            EmbeddingProviderKind::OpenAi => "openai",
            EmbeddingProviderKind::Local => "local",
            EmbeddingProviderKind::Mock => "mock",
        };
        write!(f, "{s}")
    }
}

fn default_batch_size() -> usize {
    32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub dimension: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// API key / token for non-local providers. Usually supplied via
    /// environment rather than committed to a config file.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

fn default_retry_attempts() -> u32 {
    3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    File,
    Search,
    Graph,
}

fn default_search_batch_size() -> usize {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDestinationConfig {
    pub host: String,
    #[serde(default = "default_search_port")]
    pub port: u16,
    #[serde(default)]
    pub auth: Option<SearchAuth>,
    #[serde(default = "default_search_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_port() -> u16 {
    9200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDestinationConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDestinationConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationsConfig {
    pub enabled: Vec<Destination>,
    #[serde(default)]
    pub search: Option<SearchDestinationConfig>,
    #[serde(default)]
    pub graph: Option<GraphDestinationConfig>,
    #[serde(default)]
    pub file: Option<FileDestinationConfig>,
}

fn default_top_k() -> usize {
    10
}

fn default_threshold() -> f32 {
    0.85
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityScope {
    SameNeighborhood,
    SameCity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_scope")]
    pub scope: SimilarityScope,
}

fn default_scope() -> SimilarityScope {
    SimilarityScope::SameNeighborhood
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: default_threshold(),
            scope: default_scope(),
        }
    }
}

fn default_max_related_wikipedia() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenormalizationConfig {
    #[serde(default = "default_max_related_wikipedia")]
    pub max_related_wikipedia: usize,
}

impl Default for DenormalizationConfig {
    fn default() -> Self {
        Self {
            max_related_wikipedia: default_max_related_wikipedia(),
        }
    }
}

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sources: SourcesConfig,
    pub embedding: EmbeddingConfig,
    pub destinations: DestinationsConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub denormalization: DenormalizationConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file, applying environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: PipelineConfig = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var(ENV_EMBEDDING_PROVIDER) {
            if let Some(kind) = parse_provider(&provider) {
                self.embedding.provider = kind;
            }
        }
        if let Ok(host) = std::env::var(ENV_SEARCH_HOST) {
            if let Some(search) = self.destinations.search.as_mut() {
                search.host = host;
            }
        }
        if let Ok(uri) = std::env::var(ENV_GRAPH_URI) {
            if let Some(graph) = self.destinations.graph.as_mut() {
                graph.uri = uri;
            }
        }
    }

    /// Validate cross-field invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations.enabled.is_empty() {
            return Err(ConfigError::NoDestinationsEnabled);
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimension".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        for dest in &self.destinations.enabled {
            match dest {
                Destination::Search if self.destinations.search.is_none() => {
                    return Err(ConfigError::MissingField(
                        "destinations.search".to_string(),
                    ));
                }
                Destination::Graph if self.destinations.graph.is_none() => {
                    return Err(ConfigError::MissingField("destinations.graph".to_string()));
                }
                Destination::File if self.destinations.file.is_none() => {
                    return Err(ConfigError::MissingField("destinations.file".to_string()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_provider(s: &str) -> Option<EmbeddingProviderKind> {
    match s.to_lowercase().as_str() {
        "voyage" => Some(EmbeddingProviderKind::Voyage),
        "openai" => Some(EmbeddingProviderKind::OpenAi),
        "local" => Some(EmbeddingProviderKind::Local),
        "mock" => Some(EmbeddingProviderKind::Mock),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
        [sources]
        properties_path = "data/properties.json"
        neighborhoods_path = "data/neighborhoods.json"
        wikipedia_db_path = "data/wikipedia.db"

        [embedding]
        provider = "mock"
        dimension = 8

        [destinations]
        enabled = ["file"]

        [destinations.file]
        output_dir = "out"
        "#
    }

    #[test]
    fn parses_minimal_config() {
        let config: PipelineConfig = toml::from_str(sample_toml()).unwrap();
        assert_eq!(config.embedding.dimension, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_missing_destination_section() {
        let toml_str = sample_toml().replace("[destinations]", "[destinations]\n# none");
        let mut config: PipelineConfig = toml::from_str(&toml_str).unwrap();
        config.destinations.enabled = vec![Destination::Search];
        config.destinations.search = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn rejects_zero_dimension() {
        let mut config: PipelineConfig = toml::from_str(sample_toml()).unwrap();
        config.embedding.dimension = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
