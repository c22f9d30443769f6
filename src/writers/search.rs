//! Search-Store Writer (spec §4.6): bulk-indexes per-entity documents into
//! an Elasticsearch/OpenSearch-shaped HTTP API.

use async_trait::async_trait;
#[cfg(feature = "http")]
use base64::Engine;
use serde_json::{json, Value};

use crate::config::SearchDestinationConfig;
use crate::error::DestinationError;
use crate::gold::{NeighborhoodDocument, PropertyDocument, WikipediaDocument};

/// Thin abstraction over the bulk HTTP API so tests can substitute an
/// in-memory fake instead of a live Elasticsearch/OpenSearch cluster.
#[async_trait(?Send)]
pub trait SearchStoreClient: Send + Sync {
    /// Create `index` with `mapping` if it does not already exist.
    /// Mapping creation is idempotent.
    async fn ensure_index(&self, index: &str, mapping: Value) -> Result<(), DestinationError>;

    /// Bulk-index `(id, document)` pairs into `index`, in batches of
    /// `batch_size`. A non-2xx bulk response aborts the run.
    async fn bulk_index(
        &self,
        index: &str,
        documents: Vec<(String, Value)>,
        batch_size: usize,
    ) -> Result<usize, DestinationError>;

    /// Fetch a single document by id, used by the denormalization builder.
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, DestinationError>;

    /// Read every document currently in `index`, used by the
    /// denormalization builder's scroll step.
    async fn scroll_all(&self, index: &str) -> Result<Vec<Value>, DestinationError>;
}

#[cfg(feature = "http")]
pub struct HttpSearchStoreClient {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpSearchStoreClient {
    pub fn new(config: &SearchDestinationConfig) -> Result<Self, DestinationError> {
        let mut builder = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));
        if let Some(auth) = &config.auth {
            let mut headers = reqwest::header::HeaderMap::new();
            let credential = format!("{}:{}", auth.username, auth.password);
            let encoded = base64::engine::general_purpose::STANDARD.encode(credential.as_bytes());
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Basic {encoded}")
                    .parse()
                    .map_err(|_| DestinationError::Http("invalid auth header".to_string()))?,
            );
            builder = builder.default_headers(headers);
        }
        let client = builder
            .build()
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: format!("{}:{}", config.host, config.port),
        })
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl SearchStoreClient for HttpSearchStoreClient {
    async fn ensure_index(&self, index: &str, mapping: Value) -> Result<(), DestinationError> {
        let response = self
            .client
            .put(format!("{}/{index}", self.base_url))
            .json(&mapping)
            .send()
            .await
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        // 400 "resource_already_exists_exception" is the idempotent case.
        if !response.status().is_success() && response.status().as_u16() != 400 {
            return Err(DestinationError::BulkWriteRejected {
                destination: "search".to_string(),
                batch_index: 0,
                message: format!("ensure_index returned {}", response.status()),
            });
        }
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: Vec<(String, Value)>,
        batch_size: usize,
    ) -> Result<usize, DestinationError> {
        let mut written = 0;
        for (batch_index, chunk) in documents.chunks(batch_size.max(1)).enumerate() {
            let mut body = String::new();
            for (id, document) in chunk {
                body.push_str(&json!({"index": {"_index": index, "_id": id}}).to_string());
                body.push('\n');
                body.push_str(&document.to_string());
                body.push('\n');
            }
            let response = self
                .client
                .post(format!("{}/_bulk", self.base_url))
                .header("Content-Type", "application/x-ndjson")
                .body(body)
                .send()
                .await
                .map_err(|e| DestinationError::Http(e.to_string()))?;
            if !response.status().is_success() {
                return Err(DestinationError::BulkWriteRejected {
                    destination: "search".to_string(),
                    batch_index,
                    message: format!("bulk returned {}", response.status()),
                });
            }
            written += chunk.len();
        }
        Ok(written)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, DestinationError> {
        let response = self
            .client
            .get(format!("{}/{index}/_doc/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DestinationError::Http(format!("get_document returned {}", response.status())));
        }
        let body: Value = response.json().await.map_err(|e| DestinationError::Http(e.to_string()))?;
        Ok(body.get("_source").cloned())
    }

    async fn scroll_all(&self, index: &str) -> Result<Vec<Value>, DestinationError> {
        let response = self
            .client
            .get(format!("{}/{index}/_search?size=10000", self.base_url))
            .send()
            .await
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DestinationError::Http(format!("scroll_all returned {}", response.status())));
        }
        let body: Value = response.json().await.map_err(|e| DestinationError::Http(e.to_string()))?;
        let hits = body
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(hits
            .into_iter()
            .filter_map(|hit| hit.get("_source").cloned())
            .collect())
    }
}

/// Build the `{lat, lon}` geo-point field from coordinate columns, spec §4.6.
pub fn location_field(latitude: Option<f64>, longitude: Option<f64>) -> Option<Value> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(json!({ "lat": lat, "lon": lon })),
        _ => None,
    }
}

/// Fixed, entity-specific `search_text` composition (spec §4.6).
pub fn property_search_text(doc: &PropertyDocument) -> String {
    format!(
        "{} {} {} {} {}",
        doc.street,
        doc.city,
        doc.description,
        doc.property_type,
        doc.features.iter().cloned().collect::<Vec<_>>().join(" ")
    )
}

pub fn neighborhood_search_text(doc: &NeighborhoodDocument) -> String {
    format!(
        "{} {} {} {}",
        doc.name,
        doc.city,
        doc.description,
        doc.lifestyle_tags.iter().cloned().collect::<Vec<_>>().join(" ")
    )
}

pub fn wikipedia_search_text(doc: &WikipediaDocument) -> String {
    format!("{} {}", doc.title, doc.short_summary)
}

/// Convert a [`PropertyDocument`] into the JSON body sent to the bulk API,
/// with `location` and `search_text` added and numeric fields already
/// IEEE-754 doubles (every numeric field in this crate's models is `f64`/
/// `f32`/integer, so no decimal coercion is needed at this layer).
pub fn property_to_document(doc: &PropertyDocument) -> Value {
    let mut value = serde_json::to_value(doc).expect("PropertyDocument always serializes");
    if let Some(location) = location_field(doc.latitude, doc.longitude) {
        value["location"] = location;
    }
    value["search_text"] = json!(property_search_text(doc));
    value
}

pub fn neighborhood_to_document(doc: &NeighborhoodDocument) -> Value {
    let mut value = serde_json::to_value(doc).expect("NeighborhoodDocument always serializes");
    value["search_text"] = json!(neighborhood_search_text(doc));
    value
}

pub fn wikipedia_to_document(doc: &WikipediaDocument) -> Value {
    let mut value = serde_json::to_value(doc).expect("WikipediaDocument always serializes");
    value["search_text"] = json!(wikipedia_search_text(doc));
    value
}
