//! In-memory `SearchStoreClient`/`GraphStoreClient` implementations, used
//! by the `dry-run` CLI subcommand (spec §8: "zero external services") and
//! by integration tests in place of a live Elasticsearch/Neo4j-shaped
//! endpoint.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DestinationError;
use crate::models::{Edge, EntityKind};

use super::graph::GraphStoreClient;
use super::search::SearchStoreClient;

/// Keeps every indexed document in memory, keyed by `(index, id)`.
#[derive(Default)]
pub struct InMemorySearchStoreClient {
    indexes: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl InMemorySearchStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every document currently indexed, for test assertions.
    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.indexes
            .lock()
            .expect("lock poisoned")
            .get(index)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl SearchStoreClient for InMemorySearchStoreClient {
    async fn ensure_index(&self, index: &str, _mapping: Value) -> Result<(), DestinationError> {
        self.indexes.lock().expect("lock poisoned").entry(index.to_string()).or_default();
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: Vec<(String, Value)>,
        _batch_size: usize,
    ) -> Result<usize, DestinationError> {
        let mut indexes = self.indexes.lock().expect("lock poisoned");
        let target = indexes.entry(index.to_string()).or_default();
        let written = documents.len();
        for (id, document) in documents {
            target.insert(id, document);
        }
        Ok(written)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, DestinationError> {
        Ok(self
            .indexes
            .lock()
            .expect("lock poisoned")
            .get(index)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn scroll_all(&self, index: &str) -> Result<Vec<Value>, DestinationError> {
        Ok(self.documents(index))
    }
}

/// Keeps every merged node and edge in memory, keyed by entity/edge kind.
#[derive(Default)]
pub struct InMemoryGraphStoreClient {
    nodes: Mutex<BTreeMap<&'static str, BTreeMap<String, Value>>>,
    edge_count: Mutex<usize>,
}

impl InMemoryGraphStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self, kind: EntityKind) -> usize {
        self.nodes
            .lock()
            .expect("lock poisoned")
            .get(kind.label())
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        *self.edge_count.lock().expect("lock poisoned")
    }
}

#[async_trait(?Send)]
impl GraphStoreClient for InMemoryGraphStoreClient {
    async fn ensure_constraint(&self, _kind: EntityKind, _id_property: &str) -> Result<(), DestinationError> {
        Ok(())
    }

    async fn ensure_index(&self, _kind: EntityKind, _property: &str) -> Result<(), DestinationError> {
        Ok(())
    }

    async fn merge_nodes(&self, kind: EntityKind, nodes: Vec<Value>) -> Result<usize, DestinationError> {
        let mut table = self.nodes.lock().expect("lock poisoned");
        let target = table.entry(kind.label()).or_default();
        let written = nodes.len();
        for node in nodes {
            let id = node
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| DestinationError::Io("node missing id".to_string()))?
                .to_string();
            target.insert(id, node);
        }
        Ok(written)
    }

    async fn merge_edges(&self, edges: &[Edge]) -> Result<usize, DestinationError> {
        *self.edge_count.lock().expect("lock poisoned") += edges.len();
        Ok(edges.len())
    }
}
