//! `transform_neighborhood`: bronze neighborhoods -> silver neighborhoods.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;

use crate::engine::AnalyticalEngine;
use crate::error::{EngineError, SchemaError};
use crate::models::{Neighborhood, WikipediaCorrelation};

use super::normalize::{canonicalize_city, canonicalize_state, graph_node_id};
use super::SilverStats;

const TABLE: &str = "silver_neighborhoods";

fn create_table(engine: &AnalyticalEngine) -> Result<(), EngineError> {
    engine.execute_batch(&format!(
        "CREATE TABLE {TABLE} (
            neighborhood_id VARCHAR,
            name VARCHAR,
            city VARCHAR,
            state VARCHAR,
            population BIGINT,
            walkability_score DOUBLE,
            school_score DOUBLE,
            crime_score DOUBLE,
            description VARCHAR,
            lifestyle_tags_json VARCHAR,
            wikipedia_correlations_json VARCHAR,
            graph_node_id VARCHAR,
            city_normalized VARCHAR,
            state_normalized VARCHAR
        );"
    ))
}

fn parse_one(raw: &Value) -> Neighborhood {
    let neighborhood_id = raw
        .get("neighborhood_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let city = canonicalize_city(raw.get("city").and_then(Value::as_str).unwrap_or_default());
    let state = canonicalize_state(raw.get("state").and_then(Value::as_str).unwrap_or_default());
    let population = raw.get("population").and_then(Value::as_u64);
    let walkability_score = raw.get("walkability_score").and_then(Value::as_f64).map(|v| v as f32);
    let school_score = raw.get("school_score").and_then(Value::as_f64).map(|v| v as f32);
    let crime_score = raw.get("crime_score").and_then(Value::as_f64).map(|v| v as f32);
    let description = raw
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let lifestyle_tags: BTreeSet<String> = raw
        .get("lifestyle_tags")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let wikipedia_correlations = raw
        .get("wikipedia_correlations")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|c| {
                    Some(WikipediaCorrelation {
                        page_id: c.get("page_id")?.as_i64()?,
                        relationship_kind: c
                            .get("type")
                            .or_else(|| c.get("relationship_kind"))
                            .and_then(Value::as_str)
                            .unwrap_or("related")
                            .to_string(),
                        confidence: c.get("confidence").and_then(Value::as_f64).unwrap_or(0.0) as f32,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Neighborhood {
        neighborhood_id,
        name,
        city,
        state,
        population,
        walkability_score,
        school_score,
        crime_score,
        description,
        lifestyle_tags,
        embedding: None,
        wikipedia_correlations,
    }
}

fn insert_row(engine: &AnalyticalEngine, n: &Neighborhood) -> Result<(), EngineError> {
    let tags_json = serde_json::to_string(&n.lifestyle_tags).expect("always serializes");
    let correlations_json =
        serde_json::to_string(&n.wikipedia_correlations).expect("always serializes");
    let node_id = graph_node_id("Neighborhood", &n.neighborhood_id);
    engine.execute_params(
        &format!("INSERT INTO {TABLE} VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
        &[
            &n.neighborhood_id,
            &n.name,
            &n.city,
            &n.state,
            &n.population.map(|v| v as i64),
            &n.walkability_score.map(|v| v as f64),
            &n.school_score.map(|v| v as f64),
            &n.crime_score.map(|v| v as f64),
            &n.description,
            &tags_json,
            &correlations_json,
            &node_id,
            &n.city,
            &n.state,
        ],
    )?;
    Ok(())
}

/// Transform `bronze_neighborhoods` into `silver_neighborhoods`.
pub fn transform_neighborhood(
    engine: &AnalyticalEngine,
) -> Result<(SilverStats, Vec<Neighborhood>), SchemaError> {
    if !engine.table_exists("bronze_neighborhoods").unwrap_or(false) {
        return Err(SchemaError::TransformerFailed {
            table: "silver_neighborhoods".to_string(),
        });
    }

    create_table(engine).map_err(|_| SchemaError::TransformerFailed {
        table: "silver_neighborhoods".to_string(),
    })?;

    let rows = engine
        .query_json("SELECT raw_json FROM bronze_neighborhoods")
        .map_err(|_| SchemaError::TransformerFailed {
            table: "silver_neighborhoods".to_string(),
        })?;

    let mut neighborhoods = Vec::with_capacity(rows.len());
    for row in &rows {
        let raw_str = row.get("raw_json").and_then(Value::as_str).unwrap_or("{}");
        let raw: Value = match serde_json::from_str(raw_str) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping bronze row with invalid embedded JSON");
                continue;
            }
        };
        let neighborhood = parse_one(&raw);
        insert_row(engine, &neighborhood).map_err(|_| SchemaError::TransformerFailed {
            table: "silver_neighborhoods".to_string(),
        })?;
        neighborhoods.push(neighborhood);
    }

    let stats = SilverStats {
        rows_in: rows.len(),
        rows_out: neighborhoods.len(),
    };
    Ok((stats, neighborhoods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bronze::{load_neighborhoods, quarantine::QuarantineTable};

    #[test]
    fn parses_wikipedia_correlations() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neighborhoods.json");
        std::fs::write(
            &path,
            r#"[{
                "neighborhood_id": "N1",
                "name": "Mission",
                "city": "San Francisco",
                "state": "CA",
                "wikipedia_correlations": [{"page_id": 12345, "type": "primary", "confidence": 0.9}]
            }]"#,
        )
        .unwrap();

        let mut quarantine = QuarantineTable::new();
        load_neighborhoods(&engine, &path, None, &mut quarantine).unwrap();

        let (_, neighborhoods) = transform_neighborhood(&engine).unwrap();
        assert_eq!(neighborhoods.len(), 1);
        assert_eq!(neighborhoods[0].wikipedia_correlations.len(), 1);
        assert_eq!(neighborhoods[0].wikipedia_correlations[0].page_id, 12345);
    }
}
