use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::embedding::Embedding;

/// Structured postal address, as flattened by the silver tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    /// Raw city string as recorded by the source, preserved verbatim
    /// (spec scenario A: a search document echoes back `"SF"`, not
    /// `"San Francisco"`).
    pub city: String,
    /// Alias-resolved city name (spec scenario C: `"SF"` -> `"San
    /// Francisco"`), used to derive the `City` node and `IN_CITY` edge so
    /// aliased spellings collapse onto one node.
    pub city_normalized: String,
    /// Two-letter state abbreviation, canonicalized (spec §4.1).
    pub state: String,
    /// Truncated to five digits (spec §4.1).
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Free-form property type string as provided by the source, normalized to
/// lowercase/underscore form by the silver tier.
pub type PropertyType = String;

/// A single real-estate listing.
///
/// `listing_id` is the source-provided primary id and is unique within a
/// run (spec invariant 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub listing_id: String,
    pub address: Address,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub year_built: Option<u32>,
    pub property_type: PropertyType,
    /// Lowercased, deduplicated feature strings.
    pub features: BTreeSet<String>,
    pub description: String,
    pub listing_date: DateTime<Utc>,
    /// Present once the gold tier's embedding subsystem has run; absent on
    /// bronze/silver rows.
    pub embedding: Option<Embedding>,
    /// Unresolved references are dropped with a warning during silver
    /// transformation (spec invariant 2), so by gold this is either a
    /// verified reference or `None`.
    pub neighborhood_id: Option<String>,
}

impl Property {
    /// `graph_node_id` derived key used internally by the silver tier
    /// (spec §4.1): `{entity_label}:{primary_id}`.
    pub fn graph_node_id(&self) -> String {
        format!("Property:{}", self.listing_id)
    }

    /// Text selected for embedding (spec §4.3): address + price + bed/bath
    /// counts + square_feet + description + features joined.
    pub fn embedding_text(&self) -> String {
        format!(
            "{street}, {city}, {state} {zip} | ${price:.0} | {bed} bed {bath} bath | {sqft} sqft | {desc} | {features}",
            street = self.address.street,
            city = self.address.city,
            state = self.address.state,
            zip = self.address.zip_code,
            price = self.price,
            bed = self.bedrooms,
            bath = self.bathrooms,
            sqft = self.square_feet,
            desc = self.description,
            features = self.features.iter().cloned().collect::<Vec<_>>().join(", "),
        )
    }
}
