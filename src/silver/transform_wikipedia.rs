//! `transform_wikipedia`: bronze Wikipedia page summaries -> silver
//! Wikipedia articles.
//!
//! Unlike the JSON-backed tiers, `bronze_wikipedia` already has typed
//! columns (it was copied straight from SQLite), so this transformer reads
//! them directly rather than through an embedded `raw_json` blob.

use serde_json::Value;

use crate::engine::AnalyticalEngine;
use crate::error::{EngineError, SchemaError};
use crate::models::WikipediaArticle;

use super::normalize::graph_node_id;
use super::SilverStats;

const TABLE: &str = "silver_wikipedia";

fn create_table(engine: &AnalyticalEngine) -> Result<(), EngineError> {
    engine.execute_batch(&format!(
        "CREATE TABLE {TABLE} (
            page_id BIGINT,
            title VARCHAR,
            long_summary VARCHAR,
            short_summary VARCHAR,
            truncated BOOLEAN,
            graph_node_id VARCHAR
        );"
    ))
}

fn parse_one(raw: &Value) -> WikipediaArticle {
    let page_id = raw.get("page_id").and_then(Value::as_i64).unwrap_or(0);
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let long_summary = raw
        .get("long_summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let short_summary = raw
        .get("short_summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut article = WikipediaArticle {
        page_id,
        title,
        long_summary,
        short_summary,
        embedding: None,
        neighborhood_ids: None,
        truncated: false,
    };
    article.enforce_summary_cap();
    article
}

fn insert_row(engine: &AnalyticalEngine, article: &WikipediaArticle) -> Result<(), EngineError> {
    let node_id = graph_node_id("WikipediaArticle", &article.page_id.to_string());
    engine.execute_params(
        &format!("INSERT INTO {TABLE} VALUES (?, ?, ?, ?, ?, ?)"),
        &[
            &article.page_id,
            &article.title,
            &article.long_summary,
            &article.short_summary,
            &article.truncated,
            &node_id,
        ],
    )?;
    Ok(())
}

/// Transform `bronze_wikipedia` into `silver_wikipedia`.
pub fn transform_wikipedia(
    engine: &AnalyticalEngine,
) -> Result<(SilverStats, Vec<WikipediaArticle>), SchemaError> {
    if !engine.table_exists("bronze_wikipedia").unwrap_or(false) {
        // No Wikipedia source configured for this run; that is a valid,
        // non-fatal state (spec §8: "zero Wikipedia").
        return Ok((SilverStats::default(), Vec::new()));
    }

    create_table(engine).map_err(|_| SchemaError::TransformerFailed {
        table: "silver_wikipedia".to_string(),
    })?;

    let rows = engine
        .query_json("SELECT * FROM bronze_wikipedia")
        .map_err(|_| SchemaError::TransformerFailed {
            table: "silver_wikipedia".to_string(),
        })?;

    let mut articles = Vec::with_capacity(rows.len());
    for raw in &rows {
        let article = parse_one(raw);
        insert_row(engine, &article).map_err(|_| SchemaError::TransformerFailed {
            table: "silver_wikipedia".to_string(),
        })?;
        articles.push(article);
    }

    let stats = SilverStats {
        rows_in: rows.len(),
        rows_out: articles.len(),
    };
    Ok((stats, articles))
}
