//! Run orchestration: wires Bronze ingestion, Silver transformation, entity
//! extraction, the embedding subsystem, Gold composition, the relationship
//! builder, the writer orchestrator, and the denormalization builder into a
//! single run (spec §3 Processing Pipeline, §5 Concurrency & Resource
//! Model: one engine per run, no cross-run state).
//!
//! Mirrors the teacher's `workspace::sync` entry points: a thin `run`
//! function that builds every collaborator from configuration and threads a
//! single mutable report through the whole pass, returning it regardless of
//! outcome so the caller can always print a summary.

use std::time::Instant;

use tracing::info;

use crate::bronze;
use crate::bronze::quarantine::QuarantineTable;
use crate::config::{Destination, EmbeddingProviderKind, PipelineConfig};
use crate::denorm;
use crate::embedding::{self, EmbeddingCache};
use crate::engine::AnalyticalEngine;
use crate::error::PipelineError;
use crate::extract::{self, ExtractedEntities, LocationReference};
use crate::gold;
use crate::relationships;
use crate::report::RunReport;
use crate::writers::{GraphStoreClient, InMemoryGraphStoreClient, InMemorySearchStoreClient, Orchestrator, SearchStoreClient};

#[cfg(feature = "http")]
use crate::writers::{HttpGraphStoreClient, HttpSearchStoreClient};

/// Run the pipeline end to end against the destinations named in
/// `config.destinations.enabled`, using real HTTP clients for search and
/// graph (requires the `http` feature). Always returns a [`RunReport`]:
/// failures are recorded on it rather than discarding partial progress.
pub async fn run(config: &PipelineConfig) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::new();

    #[cfg(feature = "http")]
    let outcome = {
        let search_client = match build_http_search_client(config) {
            Ok(client) => client,
            Err(e) => {
                report.record_fatal(&e);
                report.duration = started.elapsed();
                return report;
            }
        };
        let graph_client = match build_http_graph_client(config) {
            Ok(client) => client,
            Err(e) => {
                report.record_fatal(&e);
                report.duration = started.elapsed();
                return report;
            }
        };
        execute(
            config,
            search_client.as_ref().map(|c| c as &dyn SearchStoreClient),
            graph_client.as_ref().map(|c| c as &dyn GraphStoreClient),
            &mut report,
        )
        .await
    };

    #[cfg(not(feature = "http"))]
    let outcome = {
        if config.destinations.enabled.contains(&Destination::Search)
            || config.destinations.enabled.contains(&Destination::Graph)
        {
            Err(PipelineError::Configuration(crate::error::ConfigError::InvalidValue {
                field: "destinations.enabled".to_string(),
                reason: "search/graph destinations require the `http` feature".to_string(),
            }))
        } else {
            execute(config, None, None, &mut report).await
        }
    };

    if let Err(e) = outcome {
        report.record_fatal(&e);
    }
    report.duration = started.elapsed();
    report
}

/// Run the pipeline against in-memory fake destinations and a forced
/// [`EmbeddingProviderKind::Mock`] provider (spec §8: "zero external
/// services"). Used by the `dry-run` CLI subcommand and by integration
/// tests that exercise the full pipeline without a network.
pub async fn dry_run(config: &PipelineConfig) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::new();

    let mut dry_config = config.clone();
    dry_config.embedding.provider = EmbeddingProviderKind::Mock;

    let search_client = InMemorySearchStoreClient::new();
    let graph_client = InMemoryGraphStoreClient::new();
    let outcome = execute(&dry_config, Some(&search_client), Some(&graph_client), &mut report).await;

    if let Err(e) = outcome {
        report.record_fatal(&e);
    }
    report.duration = started.elapsed();
    report
}

#[cfg(feature = "http")]
fn build_http_search_client(config: &PipelineConfig) -> Result<Option<HttpSearchStoreClient>, PipelineError> {
    if !config.destinations.enabled.contains(&Destination::Search) {
        return Ok(None);
    }
    let Some(search_config) = &config.destinations.search else {
        return Ok(None);
    };
    Ok(Some(HttpSearchStoreClient::new(search_config)?))
}

#[cfg(feature = "http")]
fn build_http_graph_client(config: &PipelineConfig) -> Result<Option<HttpGraphStoreClient>, PipelineError> {
    if !config.destinations.enabled.contains(&Destination::Graph) {
        return Ok(None);
    }
    let Some(graph_config) = &config.destinations.graph else {
        return Ok(None);
    };
    Ok(Some(HttpGraphStoreClient::new(graph_config)?))
}

/// The actual run: ingest, transform, extract, embed, compose, relate,
/// write, denormalize. Every stage's counts land on `report` as it goes so
/// a partial run (one that fails midway) still reports what it completed.
async fn execute(
    config: &PipelineConfig,
    search_client: Option<&dyn SearchStoreClient>,
    graph_client: Option<&dyn GraphStoreClient>,
    report: &mut RunReport,
) -> Result<(), PipelineError> {
    let engine = AnalyticalEngine::in_memory()?;
    let mut quarantine = QuarantineTable::new();

    info!(path = %config.sources.properties_path.display(), "loading properties");
    let property_bronze = bronze::load_properties(
        &engine,
        &config.sources.properties_path,
        config.sources.sample_size,
        &mut quarantine,
    )?;
    report.properties.bronze_rows = property_bronze.rows_loaded;

    info!(path = %config.sources.neighborhoods_path.display(), "loading neighborhoods");
    let neighborhood_bronze = bronze::load_neighborhoods(
        &engine,
        &config.sources.neighborhoods_path,
        config.sources.sample_size,
        &mut quarantine,
    )?;
    report.neighborhoods.bronze_rows = neighborhood_bronze.rows_loaded;

    info!(path = %config.sources.wikipedia_db_path.display(), "loading wikipedia");
    let wikipedia_bronze = bronze::load_wikipedia(
        &engine,
        &config.sources.wikipedia_db_path,
        config.sources.sample_size,
    )?;
    report.wikipedia_articles.bronze_rows = wikipedia_bronze.rows_loaded;
    report.quarantined_rows = quarantine.len();

    let (property_silver, mut properties) = crate::silver::transform_property(&engine)?;
    report.properties.silver_rows = property_silver.rows_out;

    let (neighborhood_silver, mut neighborhoods) = crate::silver::transform_neighborhood(&engine)?;
    report.neighborhoods.silver_rows = neighborhood_silver.rows_out;

    let (wikipedia_silver, mut articles) = crate::silver::transform_wikipedia(&engine)?;
    report.wikipedia_articles.silver_rows = wikipedia_silver.rows_out;

    let location_reference = match &config.sources.locations_path {
        Some(path) => Some(LocationReference::load(path)?),
        None => None,
    };

    let geography = extract::extract_geography(&properties, location_reference.as_ref());
    let extracted = ExtractedEntities {
        features: extract::extract_features(&properties),
        property_types: extract::extract_property_types(&properties),
        price_ranges: extract::extract_price_ranges(&properties),
        cities: geography.cities,
        counties: geography.counties,
        states: geography.states,
        zip_codes: geography.zip_codes,
        // No topic-cluster configuration surface exists yet; clustering is
        // skipped rather than run with arbitrary defaults.
        topic_clusters: extract::extract_topic_clusters(&articles, None),
    };

    let provider = embedding::build_provider(&config.embedding)?;
    let mut cache = EmbeddingCache::new();

    embedding::populate_properties(
        &mut properties,
        provider.as_ref(),
        config.embedding.batch_size,
        config.embedding.retry_attempts,
        &mut cache,
    )
    .await?;
    embedding::populate_neighborhoods(
        &mut neighborhoods,
        provider.as_ref(),
        config.embedding.batch_size,
        config.embedding.retry_attempts,
        &mut cache,
    )
    .await?;
    embedding::populate_wikipedia(
        &mut articles,
        provider.as_ref(),
        config.embedding.batch_size,
        config.embedding.retry_attempts,
        &mut cache,
    )
    .await?;

    let total_embeddable = properties.len() + neighborhoods.len() + articles.len();
    report.embeddings_computed = cache.len();
    report.embeddings_deduplicated = total_embeddable.saturating_sub(cache.len());
    report.embedding_batches = [properties.len(), neighborhoods.len(), articles.len()]
        .into_iter()
        .filter(|n| *n > 0)
        .map(|n| n.div_ceil(config.embedding.batch_size.max(1)))
        .sum();

    report.properties.gold_rows = properties.len();
    report.neighborhoods.gold_rows = neighborhoods.len();
    report.wikipedia_articles.gold_rows = articles.len();

    let gold = gold::compose(&properties, &neighborhoods, &articles, extracted);
    let edges = relationships::build_all(
        &properties,
        &neighborhoods,
        &articles,
        location_reference.as_ref(),
        &config.similarity,
    );

    let mut orchestrator = Orchestrator::new(&config.destinations);
    if let Some(client) = search_client {
        orchestrator = orchestrator.with_search_client(client);
    }
    if let Some(client) = graph_client {
        orchestrator = orchestrator.with_graph_client(client);
    }
    orchestrator.run(&engine, &gold, &edges, report).await?;

    if config.destinations.enabled.contains(&Destination::Search) {
        if let Some(client) = search_client {
            let batch_size = config
                .destinations
                .search
                .as_ref()
                .map(|s| s.batch_size)
                .unwrap_or(500);
            let written = denorm::build_and_index(client, &config.denormalization, batch_size).await?;
            let counts = report.destination_counts_mut("search");
            counts.documents_written += written;
            counts.batches_sent += 1;
        }
    }

    Ok(())
}
