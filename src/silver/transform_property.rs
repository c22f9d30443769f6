//! `transform_property`: bronze properties -> silver properties.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::engine::AnalyticalEngine;
use crate::error::{EngineError, SchemaError};
use crate::models::{Address, Property};

use super::normalize::{
    canonicalize_city, canonicalize_state, graph_node_id, normalize_feature,
    normalize_property_type, truncate_zip,
};
use super::SilverStats;

const TABLE: &str = "silver_properties";

fn create_table(engine: &AnalyticalEngine) -> Result<(), EngineError> {
    engine.execute_batch(&format!(
        "CREATE TABLE {TABLE} (
            listing_id VARCHAR,
            address_street VARCHAR,
            address_city VARCHAR,
            address_state VARCHAR,
            address_zip VARCHAR,
            latitude DOUBLE,
            longitude DOUBLE,
            price DOUBLE,
            bedrooms INTEGER,
            bathrooms DOUBLE,
            square_feet INTEGER,
            year_built INTEGER,
            property_type VARCHAR,
            features_json VARCHAR,
            description VARCHAR,
            listing_date VARCHAR,
            neighborhood_id VARCHAR,
            graph_node_id VARCHAR,
            city_normalized VARCHAR,
            state_normalized VARCHAR
        );"
    ))
}

fn parse_address(raw: &Value) -> Address {
    let addr = raw.get("address").cloned().unwrap_or(Value::Null);
    let street = addr
        .get("street")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let city = addr
        .get("city")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let city_normalized = canonicalize_city(&city);
    let state = canonicalize_state(addr.get("state").and_then(Value::as_str).unwrap_or_default());
    let zip_code = truncate_zip(
        addr.get("zip_code")
            .or_else(|| addr.get("zip"))
            .and_then(Value::as_str)
            .unwrap_or_default(),
    );
    let (latitude, longitude) = addr
        .get("coordinates")
        .map(|c| {
            (
                c.get("latitude").and_then(Value::as_f64),
                c.get("longitude").and_then(Value::as_f64),
            )
        })
        .unwrap_or((None, None));

    Address {
        street,
        city,
        city_normalized,
        state,
        zip_code,
        latitude,
        longitude,
    }
}

fn parse_one(raw: &Value) -> Property {
    let listing_id = raw
        .get("listing_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let address = parse_address(raw);
    let price = raw.get("price").and_then(Value::as_f64).unwrap_or(0.0);
    let bedrooms = raw.get("bedrooms").and_then(Value::as_u64).unwrap_or(0) as u32;
    let bathrooms = raw.get("bathrooms").and_then(Value::as_f64).unwrap_or(0.0) as f32;
    let square_feet = raw.get("square_feet").and_then(Value::as_u64).unwrap_or(0) as u32;
    let year_built = raw.get("year_built").and_then(Value::as_u64).map(|v| v as u32);
    let property_type = normalize_property_type(
        raw.get("property_type")
            .and_then(Value::as_str)
            .unwrap_or("unknown"),
    );
    let features: BTreeSet<String> = raw
        .get("features")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(normalize_feature)
                .filter(|f| !f.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let description = raw
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let listing_date = raw
        .get("listing_date")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    let neighborhood_id = raw
        .get("neighborhood_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    Property {
        listing_id,
        address,
        price,
        bedrooms,
        bathrooms,
        square_feet,
        year_built,
        property_type,
        features,
        description,
        listing_date,
        embedding: None,
        neighborhood_id,
    }
}

fn insert_row(engine: &AnalyticalEngine, property: &Property) -> Result<(), EngineError> {
    let features_json =
        serde_json::to_string(&property.features).expect("BTreeSet<String> always serializes");
    let node_id = graph_node_id("Property", &property.listing_id);
    engine.execute_params(
        &format!(
            "INSERT INTO {TABLE} VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ),
        &[
            &property.listing_id,
            &property.address.street,
            &property.address.city,
            &property.address.state,
            &property.address.zip_code,
            &property.address.latitude,
            &property.address.longitude,
            &property.price,
            &(property.bedrooms as i64),
            &(property.bathrooms as f64),
            &(property.square_feet as i64),
            &property.year_built.map(|v| v as i64),
            &property.property_type,
            &features_json,
            &property.description,
            &property.listing_date.to_rfc3339(),
            &property.neighborhood_id,
            &node_id,
            &property.address.city_normalized,
            &property.address.state,
        ],
    )?;
    Ok(())
}

/// Transform `bronze_properties` into `silver_properties`, returning the
/// parsed properties for downstream gold/extraction/writer use alongside
/// engine statistics.
pub fn transform_property(
    engine: &AnalyticalEngine,
) -> Result<(SilverStats, Vec<Property>), SchemaError> {
    if !engine.table_exists("bronze_properties").unwrap_or(false) {
        return Err(SchemaError::TransformerFailed {
            table: "silver_properties".to_string(),
        });
    }

    create_table(engine).map_err(|_| SchemaError::TransformerFailed {
        table: "silver_properties".to_string(),
    })?;

    let rows = engine
        .query_json("SELECT raw_json FROM bronze_properties")
        .map_err(|_| SchemaError::TransformerFailed {
            table: "silver_properties".to_string(),
        })?;

    let mut properties = Vec::with_capacity(rows.len());
    for row in &rows {
        let raw_str = row.get("raw_json").and_then(Value::as_str).unwrap_or("{}");
        let raw: Value = match serde_json::from_str(raw_str) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping bronze row with invalid embedded JSON");
                continue;
            }
        };
        let property = parse_one(&raw);
        insert_row(engine, &property).map_err(|_| SchemaError::TransformerFailed {
            table: "silver_properties".to_string(),
        })?;
        properties.push(property);
    }

    let stats = SilverStats {
        rows_in: rows.len(),
        rows_out: properties.len(),
    };
    Ok((stats, properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bronze::{load_properties, quarantine::QuarantineTable};

    #[test]
    fn flattens_and_normalizes_address() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties.json");
        std::fs::write(
            &path,
            r#"[{
                "listing_id": "P1",
                "neighborhood_id": "N1",
                "price": 600000,
                "bedrooms": 3,
                "bathrooms": 2,
                "square_feet": 1500,
                "features": ["Pool", "Garage", "pool"],
                "property_type": "Single Family",
                "description": "Nice house",
                "address": {"street": "1 Main St", "city": "SF", "state": "California", "zip_code": "94110-1234"}
            }]"#,
        )
        .unwrap();

        let mut quarantine = QuarantineTable::new();
        load_properties(&engine, &path, None, &mut quarantine).unwrap();

        let (stats, properties) = transform_property(&engine).unwrap();
        assert_eq!(stats.rows_out, 1);
        let p = &properties[0];
        assert_eq!(p.address.city, "SF");
        assert_eq!(p.address.city_normalized, "San Francisco");
        assert_eq!(p.address.state, "CA");
        assert_eq!(p.address.zip_code, "94110");
        assert_eq!(p.property_type, "single_family");
        assert_eq!(p.features.len(), 2);
        assert!(p.features.contains("pool"));
    }
}
