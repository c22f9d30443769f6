//! Writer Orchestrator (spec §4.4): sequences writes to the enabled
//! destinations in a fixed order, aborting the run on the first error
//! (fail-fast, no parallel destination writes, no partial-success
//! reporting).

use serde_json::{json, Value};

use crate::config::{Destination, DestinationsConfig};
use crate::engine::AnalyticalEngine;
use crate::error::DestinationError;
use crate::gold::GoldTables;
use crate::models::derived;
use crate::models::{Edge, EdgeKind, EntityKind};
use crate::report::RunReport;

use super::file::FileWriter;
use super::graph::GraphStoreClient;
use super::search::{
    neighborhood_to_document, property_to_document, wikipedia_to_document, SearchStoreClient,
};

/// Entities the orchestrator knows how to route to the search and graph
/// destinations. File destination entities are a mix of existing engine
/// tables and staged `GoldTables` vectors (see [`Orchestrator::write_file`]).
pub struct Orchestrator<'a> {
    pub config: &'a DestinationsConfig,
    pub search_client: Option<&'a dyn SearchStoreClient>,
    pub graph_client: Option<&'a dyn GraphStoreClient>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a DestinationsConfig) -> Self {
        Self {
            config,
            search_client: None,
            graph_client: None,
        }
    }

    pub fn with_search_client(mut self, client: &'a dyn SearchStoreClient) -> Self {
        self.search_client = Some(client);
        self
    }

    pub fn with_graph_client(mut self, client: &'a dyn GraphStoreClient) -> Self {
        self.graph_client = Some(client);
        self
    }

    fn enabled(&self, destination: Destination) -> bool {
        self.config.enabled.contains(&destination)
    }

    /// Run every enabled destination in the fixed order (file, search,
    /// graph), aborting on the first error.
    pub async fn run(
        &self,
        engine: &AnalyticalEngine,
        gold: &GoldTables,
        edges: &[Edge],
        report: &mut RunReport,
    ) -> Result<(), DestinationError> {
        if self.enabled(Destination::File) {
            self.write_file(engine, gold, report)?;
        }
        if self.enabled(Destination::Search) {
            self.write_search(gold, report).await?;
        }
        if self.enabled(Destination::Graph) {
            self.write_graph(gold, edges, report).await?;
        }
        Ok(())
    }

    /// Write every Gold entity kind to its own directory (spec §4.5: "one
    /// directory per entity type"). The three document tables already live
    /// in `engine` as silver tables and are copied out directly; properties
    /// is partitioned by `city_normalized` (spec §6: "a small-cardinality
    /// column, e.g. city"). The eight derived kinds only exist as
    /// `GoldTables` vectors, so they are staged into landing tables first
    /// (see [`FileWriter::write_rows`]) — this brings file coverage to all
    /// eleven `EntityKind`s, matching the graph destination.
    fn write_file(
        &self,
        engine: &AnalyticalEngine,
        gold: &GoldTables,
        report: &mut RunReport,
    ) -> Result<(), DestinationError> {
        let Some(config) = &self.config.file else {
            return Err(DestinationError::Io("file destination enabled with no configuration".to_string()));
        };
        let writer = FileWriter::new(&config.output_dir);
        let document_tables: [(&str, &str, &[&str]); 3] = [
            ("silver_properties", "properties", &["city_normalized"]),
            ("silver_neighborhoods", "neighborhoods", &[]),
            ("silver_wikipedia", "wikipedia", &[]),
        ];
        let counts = report.destination_counts_mut("file");
        for (table, entity, partition_by) in document_tables {
            if engine.table_exists(table).unwrap_or(false) {
                writer.write_table(engine, table, entity, partition_by)?;
                counts.documents_written += engine.count(table).unwrap_or(0);
                counts.batches_sent += 1;
            }
        }

        let n = writer.write_rows(engine, "states", |s: &derived::State| s.abbreviation.clone(), &gold.states)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(engine, "counties", |c: &derived::County| c.id(), &gold.counties)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(engine, "cities", |c: &derived::City| c.id(), &gold.cities)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(engine, "zip_codes", |z: &derived::ZipCode| z.code.clone(), &gold.zip_codes)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(
            engine,
            "property_types",
            |p: &derived::PropertyTypeNode| p.type_name.clone(),
            &gold.property_types,
        )?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(engine, "features", |f: &derived::Feature| f.name.clone(), &gold.features)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(
            engine,
            "price_ranges",
            |p: &derived::PriceRangeNode| p.bucket.key().to_string(),
            &gold.price_ranges,
        )?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }
        let n = writer.write_rows(engine, "topic_clusters", |t: &derived::TopicCluster| t.label.clone(), &gold.topic_clusters)?;
        if n > 0 {
            counts.documents_written += n;
            counts.batches_sent += 1;
        }

        Ok(())
    }

    async fn write_search(&self, gold: &GoldTables, report: &mut RunReport) -> Result<(), DestinationError> {
        let Some(client) = self.search_client else {
            return Err(DestinationError::Io("search destination enabled with no client configured".to_string()));
        };
        let Some(config) = &self.config.search else {
            return Err(DestinationError::Io("search destination enabled with no configuration".to_string()));
        };

        client.ensure_index("properties", property_mapping()).await?;
        client.ensure_index("neighborhoods", neighborhood_mapping()).await?;
        client.ensure_index("wikipedia", wikipedia_mapping()).await?;

        let properties: Vec<(String, Value)> = gold
            .property_documents
            .iter()
            .map(|d| (d.listing_id.clone(), property_to_document(d)))
            .collect();
        let neighborhoods: Vec<(String, Value)> = gold
            .neighborhood_documents
            .iter()
            .map(|d| (d.neighborhood_id.clone(), neighborhood_to_document(d)))
            .collect();
        let wikipedia: Vec<(String, Value)> = gold
            .wikipedia_documents
            .iter()
            .map(|d| (d.page_id.to_string(), wikipedia_to_document(d)))
            .collect();

        let counts = report.destination_counts_mut("search");
        counts.documents_written += client.bulk_index("properties", properties, config.batch_size).await?;
        counts.documents_written += client.bulk_index("neighborhoods", neighborhoods, config.batch_size).await?;
        counts.documents_written += client.bulk_index("wikipedia", wikipedia, config.batch_size).await?;
        counts.batches_sent += 3;
        Ok(())
    }

    async fn write_graph(
        &self,
        gold: &GoldTables,
        edges: &[Edge],
        report: &mut RunReport,
    ) -> Result<(), DestinationError> {
        let Some(client) = self.graph_client else {
            return Err(DestinationError::Io("graph destination enabled with no client configured".to_string()));
        };

        // Spec §4.7: a uniqueness constraint on the primary id is ensured
        // for every node kind before write, geographic/classification kinds
        // included.
        for kind in EntityKind::WRITE_ORDER {
            client.ensure_constraint(kind, "id").await?;
        }
        client.ensure_index(EntityKind::Property, "embedding").await?;
        client.ensure_index(EntityKind::Neighborhood, "embedding").await?;
        client.ensure_index(EntityKind::Property, "price").await?;
        client.ensure_index(EntityKind::Property, "property_type").await?;
        client.ensure_index(EntityKind::Neighborhood, "walkability_score").await?;

        let counts = report.destination_counts_mut("graph");

        // Node write order follows `EntityKind::WRITE_ORDER` (§4.4):
        // geographic hierarchy, classification, primary entities, derived.
        for kind in EntityKind::WRITE_ORDER {
            let nodes: Vec<Value> = match kind {
                EntityKind::State => gold
                    .states
                    .iter()
                    .map(|s| json!({ "id": format!("State:{}", s.abbreviation), "props": s }))
                    .collect(),
                EntityKind::County => gold
                    .counties
                    .iter()
                    .map(|c| json!({ "id": format!("County:{}", c.id()), "props": c }))
                    .collect(),
                EntityKind::City => gold
                    .cities
                    .iter()
                    .map(|c| json!({ "id": format!("City:{}", c.id()), "props": c }))
                    .collect(),
                EntityKind::ZipCode => gold
                    .zip_codes
                    .iter()
                    .map(|z| json!({ "id": format!("ZipCode:{}", z.code), "props": z }))
                    .collect(),
                EntityKind::PropertyType => gold
                    .property_types
                    .iter()
                    .map(|p| json!({ "id": format!("PropertyType:{}", p.type_name), "props": p }))
                    .collect(),
                EntityKind::Feature => gold
                    .features
                    .iter()
                    .map(|f| json!({ "id": format!("Feature:{}", f.name), "props": f }))
                    .collect(),
                EntityKind::PriceRange => gold
                    .price_ranges
                    .iter()
                    .map(|p| json!({ "id": format!("PriceRange:{}", p.bucket.key()), "props": p }))
                    .collect(),
                EntityKind::Neighborhood => gold
                    .neighborhood_graph_nodes
                    .iter()
                    .map(|n| json!({ "id": format!("Neighborhood:{}", n.neighborhood_id), "props": n }))
                    .collect(),
                EntityKind::Property => gold
                    .property_graph_nodes
                    .iter()
                    .map(|n| json!({ "id": format!("Property:{}", n.listing_id), "props": n }))
                    .collect(),
                EntityKind::WikipediaArticle => gold
                    .wikipedia_graph_nodes
                    .iter()
                    .map(|n| json!({ "id": format!("WikipediaArticle:{}", n.page_id), "props": n }))
                    .collect(),
                EntityKind::TopicCluster => gold
                    .topic_clusters
                    .iter()
                    .map(|t| json!({ "id": format!("TopicCluster:{}", t.label), "props": t }))
                    .collect(),
            };
            if nodes.is_empty() {
                continue;
            }
            counts.nodes_written += client.merge_nodes(kind, nodes).await?;
        }

        for kind in EdgeKind::EMIT_ORDER {
            let batch: Vec<Edge> = edges.iter().filter(|e| e.kind == kind).cloned().collect();
            if batch.is_empty() {
                continue;
            }
            counts.edges_written += client.merge_edges(&batch).await?;
        }
        Ok(())
    }
}

fn property_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "listing_id": { "type": "keyword" },
                "description": { "type": "text" },
                "search_text": { "type": "text" },
                "location": { "type": "geo_point" },
                "embedding": { "type": "dense_vector" }
            }
        }
    })
}

fn neighborhood_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "neighborhood_id": { "type": "keyword" },
                "description": { "type": "text" },
                "search_text": { "type": "text" },
                "embedding": { "type": "dense_vector" }
            }
        }
    })
}

fn wikipedia_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "page_id": { "type": "keyword" },
                "long_summary": { "type": "text" },
                "search_text": { "type": "text" },
                "embedding": { "type": "dense_vector" }
            }
        }
    })
}
