//! End-to-end scenarios exercising Silver through the writer orchestrator
//! and denormalization builder on in-memory destinations, without a live
//! search/graph cluster or an on-disk SQLite fixture.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use realty_pipeline::config::{
    Destination, DestinationsConfig, SearchDestinationConfig, SimilarityConfig, SimilarityScope,
};
use realty_pipeline::denorm;
use realty_pipeline::error::DestinationError;
use realty_pipeline::extract::{self, ExtractedEntities};
use realty_pipeline::gold;
use realty_pipeline::models::{Address, Embedding, EntityKind, Neighborhood, Property, WikipediaArticle, WikipediaCorrelation};
use realty_pipeline::relationships;
use realty_pipeline::report::RunReport;
use realty_pipeline::writers::{InMemoryGraphStoreClient, InMemorySearchStoreClient, Orchestrator, SearchStoreClient};

fn property(listing_id: &str, neighborhood_id: Option<&str>, city: &str, state: &str, zip: &str) -> Property {
    let city_normalized = realty_pipeline::silver::normalize::canonicalize_city(city);
    Property {
        listing_id: listing_id.to_string(),
        address: Address {
            street: "1 Main St".to_string(),
            city: city.to_string(),
            city_normalized,
            state: state.to_string(),
            zip_code: zip.to_string(),
            latitude: None,
            longitude: None,
        },
        price: 600_000.0,
        bedrooms: 3,
        bathrooms: 2.0,
        square_feet: 1_500,
        year_built: Some(2005),
        property_type: "single_family".to_string(),
        features: BTreeSet::from(["pool".to_string(), "garage".to_string()]),
        description: "A lovely home".to_string(),
        listing_date: Utc::now(),
        embedding: None,
        neighborhood_id: neighborhood_id.map(str::to_string),
    }
}

fn neighborhood(id: &str, name: &str, city: &str, state: &str) -> Neighborhood {
    Neighborhood {
        neighborhood_id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        population: Some(40_000),
        walkability_score: Some(85.0),
        school_score: Some(70.0),
        crime_score: Some(20.0),
        description: "A walkable neighborhood".to_string(),
        lifestyle_tags: BTreeSet::from(["walkable".to_string()]),
        embedding: None,
        wikipedia_correlations: Vec::new(),
    }
}

fn destinations_for(kinds: &[Destination]) -> DestinationsConfig {
    DestinationsConfig {
        enabled: kinds.to_vec(),
        search: Some(SearchDestinationConfig {
            host: "localhost".to_string(),
            port: 9200,
            auth: None,
            batch_size: 500,
            timeout_secs: 30,
        }),
        graph: Some(realty_pipeline::config::GraphDestinationConfig {
            uri: "bolt://localhost".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            timeout_secs: 30,
        }),
        file: None,
    }
}

/// Scenario A (spec §8 minimal happy path): one property, one neighborhood,
/// zero Wikipedia articles.
#[tokio::test]
async fn scenario_a_minimal_happy_path() {
    let properties = vec![property("P1", Some("N1"), "SF", "CA", "94110")];
    let neighborhoods = vec![neighborhood("N1", "Mission", "San Francisco", "CA")];
    let articles: Vec<WikipediaArticle> = Vec::new();

    let geography = extract::extract_geography(&properties, None);
    let extracted = ExtractedEntities {
        features: extract::extract_features(&properties),
        property_types: extract::extract_property_types(&properties),
        price_ranges: extract::extract_price_ranges(&properties),
        cities: geography.cities,
        counties: geography.counties,
        states: geography.states,
        zip_codes: geography.zip_codes,
        topic_clusters: Vec::new(),
    };

    let gold = gold::compose(&properties, &neighborhoods, &articles, extracted);
    let similarity = SimilarityConfig::default();
    let edges = relationships::build_all(&properties, &neighborhoods, &articles, None, &similarity);

    let destinations = destinations_for(&[Destination::Search, Destination::Graph]);
    let search_client = InMemorySearchStoreClient::new();
    let graph_client = InMemoryGraphStoreClient::new();
    let orchestrator = Orchestrator::new(&destinations)
        .with_search_client(&search_client)
        .with_graph_client(&graph_client);

    let mut report = RunReport::new();
    orchestrator.run(&dummy_engine(), &gold, &edges, &mut report).await.unwrap();

    let doc = search_client.get_document("properties", "P1").await.unwrap().unwrap();
    assert_eq!(doc["city"], Value::String("SF".to_string()));
    assert_eq!(doc["property_type"], Value::String("single_family".to_string()));

    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "Neighborhood:N1" && e.kind.relationship_name() == "LOCATED_IN"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "Feature:pool" && e.kind.relationship_name() == "HAS_FEATURE"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "Feature:garage" && e.kind.relationship_name() == "HAS_FEATURE"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "PropertyType:single_family" && e.kind.relationship_name() == "OF_TYPE"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "PriceRange:500k_750k" && e.kind.relationship_name() == "IN_PRICE_RANGE"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "ZipCode:94110" && e.kind.relationship_name() == "IN_ZIP_CODE"));

    assert_eq!(graph_client.node_count(EntityKind::Property), 1);
    assert_eq!(graph_client.node_count(EntityKind::WikipediaArticle), 0);
}

/// Scenario B (spec §8 denormalization): a property/neighborhood pair plus
/// one correlated Wikipedia article; the denormalization builder should
/// embed the neighborhood and ranked articles into `property_relationships`.
#[tokio::test]
async fn scenario_b_denormalization_embeds_neighborhood_and_articles() {
    let properties = vec![property("P1", Some("N1"), "San Francisco", "CA", "94110")];
    let mut n1 = neighborhood("N1", "Mission", "San Francisco", "CA");
    n1.wikipedia_correlations = vec![WikipediaCorrelation {
        page_id: 12345,
        relationship_kind: "primary".to_string(),
        confidence: 0.9,
    }];
    let neighborhoods = vec![n1];
    let articles = vec![WikipediaArticle {
        page_id: 12345,
        title: "Mission District".to_string(),
        long_summary: "The Mission District is a neighborhood in San Francisco.".to_string(),
        short_summary: "A San Francisco neighborhood.".to_string(),
        embedding: None,
        neighborhood_ids: Some(vec!["N1".to_string()]),
        truncated: false,
    }];

    let geography = extract::extract_geography(&properties, None);
    let extracted = ExtractedEntities {
        features: extract::extract_features(&properties),
        property_types: extract::extract_property_types(&properties),
        price_ranges: extract::extract_price_ranges(&properties),
        cities: geography.cities,
        counties: geography.counties,
        states: geography.states,
        zip_codes: geography.zip_codes,
        topic_clusters: Vec::new(),
    };
    let gold = gold::compose(&properties, &neighborhoods, &articles, extracted);
    let similarity = SimilarityConfig::default();
    let edges = relationships::build_all(&properties, &neighborhoods, &articles, None, &similarity);

    assert!(edges.iter().any(|e| e.from_id == "WikipediaArticle:12345" && e.to_id == "Neighborhood:N1" && e.kind.relationship_name() == "DESCRIBES"));

    let destinations = destinations_for(&[Destination::Search]);
    let search_client = InMemorySearchStoreClient::new();
    let orchestrator = Orchestrator::new(&destinations).with_search_client(&search_client);

    let mut report = RunReport::new();
    orchestrator.run(&dummy_engine(), &gold, &edges, &mut report).await.unwrap();

    let denormalization = realty_pipeline::config::DenormalizationConfig::default();
    denorm::build_and_index(&search_client, &denormalization, 500).await.unwrap();

    let relationship_doc = search_client.get_document("property_relationships", "P1").await.unwrap().unwrap();
    assert_eq!(relationship_doc["neighborhood"]["neighborhood_id"], Value::String("N1".to_string()));
    let wikipedia_articles = relationship_doc["wikipedia_articles"].as_array().unwrap();
    assert_eq!(wikipedia_articles.len(), 1);
    assert_eq!(wikipedia_articles[0]["page_id"].as_i64(), Some(12345));
    assert_eq!(wikipedia_articles[0]["title"], Value::String("Mission District".to_string()));
}

/// Scenario C (spec §8 city alias normalization): two properties whose
/// address city differs only by alias (`"SF"` vs `"San Francisco"`) collapse
/// onto a single `City` node.
#[tokio::test]
async fn scenario_c_city_alias_normalization_collapses_to_one_node() {
    let properties = vec![
        property("P1", None, "SF", "CA", "94110"),
        property("P2", None, "San Francisco", "CA", "94115"),
    ];
    assert_eq!(properties[0].address.city, "SF");
    assert_eq!(properties[0].address.city_normalized, "San Francisco");

    let geography = extract::extract_geography(&properties, None);
    assert_eq!(geography.cities.len(), 1);
    assert_eq!(geography.cities[0].id(), "San_Francisco_CA");

    let in_city_edges = relationships::builder::in_city(&properties, &[]);
    assert!(in_city_edges.iter().any(|e| e.from_id == "ZipCode:94110" && e.to_id == "City:San_Francisco_CA"));
    assert!(in_city_edges.iter().any(|e| e.from_id == "ZipCode:94115" && e.to_id == "City:San_Francisco_CA"));
}

/// Scenario D (spec §8 similarity scoping): three properties in the same
/// neighborhood; the closest pair and the next-closest pair clear the
/// threshold while the most distant pair does not.
#[tokio::test]
async fn scenario_d_similarity_scoping_respects_threshold_and_scope() {
    let mut p1 = property("P1", Some("N1"), "San Francisco", "CA", "94110");
    p1.embedding = Some(Embedding::new(vec![1.0, 0.0], 2, "mock").unwrap());
    let mut p2 = property("P2", Some("N1"), "San Francisco", "CA", "94110");
    p2.embedding = Some(Embedding::new(vec![0.9063, 0.4226], 2, "mock").unwrap());
    let mut p3 = property("P3", Some("N1"), "San Francisco", "CA", "94110");
    p3.embedding = Some(Embedding::new(vec![0.6428, 0.7660], 2, "mock").unwrap());

    let properties = vec![p1, p2, p3];
    let similarity = SimilarityConfig {
        top_k: 10,
        threshold: 0.85,
        scope: SimilarityScope::SameNeighborhood,
    };
    let edges = relationships::builder::similar_to(&properties, &similarity);

    assert_eq!(edges.len(), 2);
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "Property:P2"));
    assert!(edges.iter().any(|e| e.from_id == "Property:P2" && e.to_id == "Property:P3"));
    assert!(!edges.iter().any(|e| (e.from_id == "Property:P1" && e.to_id == "Property:P3") || (e.from_id == "Property:P3" && e.to_id == "Property:P1")));
}

struct FailingSearchStoreClient {
    inner: InMemorySearchStoreClient,
    bulk_index_calls: AtomicUsize,
}

impl FailingSearchStoreClient {
    fn new() -> Self {
        Self {
            inner: InMemorySearchStoreClient::new(),
            bulk_index_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait(?Send)]
impl SearchStoreClient for FailingSearchStoreClient {
    async fn ensure_index(&self, index: &str, mapping: Value) -> Result<(), DestinationError> {
        self.inner.ensure_index(index, mapping).await
    }

    async fn bulk_index(&self, index: &str, documents: Vec<(String, Value)>, batch_size: usize) -> Result<usize, DestinationError> {
        let call = self.bulk_index_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 3 {
            return Err(DestinationError::BulkWriteRejected {
                destination: "search".to_string(),
                batch_index: call,
                message: "simulated rejection".to_string(),
            });
        }
        self.inner.bulk_index(index, documents, batch_size).await
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, DestinationError> {
        self.inner.get_document(index, id).await
    }

    async fn scroll_all(&self, index: &str) -> Result<Vec<Value>, DestinationError> {
        self.inner.scroll_all(index).await
    }
}

/// Scenario E (spec §8 fail-fast): the search writer's third batch (the
/// wikipedia index) is rejected, so the run aborts before the graph writer
/// is ever invoked.
#[tokio::test]
async fn scenario_e_fails_fast_before_graph_writer() {
    let properties = vec![property("P1", Some("N1"), "San Francisco", "CA", "94110")];
    let neighborhoods = vec![neighborhood("N1", "Mission", "San Francisco", "CA")];
    let articles: Vec<WikipediaArticle> = vec![WikipediaArticle {
        page_id: 1,
        title: "Test".to_string(),
        long_summary: "Summary".to_string(),
        short_summary: "Summary".to_string(),
        embedding: None,
        neighborhood_ids: None,
        truncated: false,
    }];

    let geography = extract::extract_geography(&properties, None);
    let extracted = ExtractedEntities {
        features: extract::extract_features(&properties),
        property_types: extract::extract_property_types(&properties),
        price_ranges: extract::extract_price_ranges(&properties),
        cities: geography.cities,
        counties: geography.counties,
        states: geography.states,
        zip_codes: geography.zip_codes,
        topic_clusters: Vec::new(),
    };
    let gold = gold::compose(&properties, &neighborhoods, &articles, extracted);
    let similarity = SimilarityConfig::default();
    let edges = relationships::build_all(&properties, &neighborhoods, &articles, None, &similarity);

    let destinations = destinations_for(&[Destination::Search, Destination::Graph]);
    let search_client = FailingSearchStoreClient::new();
    let graph_client = InMemoryGraphStoreClient::new();
    let orchestrator = Orchestrator::new(&destinations)
        .with_search_client(&search_client)
        .with_graph_client(&graph_client);

    let mut report = RunReport::new();
    let result = orchestrator.run(&dummy_engine(), &gold, &edges, &mut report).await;

    assert!(matches!(result, Err(DestinationError::BulkWriteRejected { .. })));
    assert_eq!(graph_client.node_count(EntityKind::Property), 0);
    assert_eq!(graph_client.edge_count(), 0);
}

/// Scenario F (spec §8 excluded-fields rule, invariant 4): the search
/// document exposes `property_type`, but the graph projection never carries
/// it as a node property — only as an `OF_TYPE` edge to a `PropertyType`
/// node.
#[tokio::test]
async fn scenario_f_excluded_fields_rule() {
    let properties = vec![property("P1", None, "San Francisco", "CA", "94110")];
    let geography = extract::extract_geography(&properties, None);
    let extracted = ExtractedEntities {
        features: extract::extract_features(&properties),
        property_types: extract::extract_property_types(&properties),
        price_ranges: extract::extract_price_ranges(&properties),
        cities: geography.cities,
        counties: geography.counties,
        states: geography.states,
        zip_codes: geography.zip_codes,
        topic_clusters: Vec::new(),
    };
    let gold = gold::compose(&properties, &[], &[], extracted);

    let document = gold::PropertyDocument::from_property(&properties[0]);
    assert_eq!(document.property_type, "single_family");

    let graph_node = gold::PropertyGraphNode::from_property(&properties[0]);
    let graph_json = serde_json::to_value(&graph_node).unwrap();
    assert!(graph_json.get("property_type").is_none());
    assert!(graph_json.get("city").is_none());
    assert!(graph_json.get("state").is_none());
    assert!(graph_json.get("zip_code").is_none());

    let edges = relationships::builder::of_type(&properties);
    assert!(edges.iter().any(|e| e.from_id == "Property:P1" && e.to_id == "PropertyType:single_family"));
    assert_eq!(gold.property_types[0].type_name, "single_family");
}

fn dummy_engine() -> realty_pipeline::engine::AnalyticalEngine {
    realty_pipeline::engine::AnalyticalEngine::in_memory().expect("in-memory duckdb connection")
}
