//! Graph-projection node shapes with the excluded-fields rule applied
//! (spec invariant 4, §4.7): Property nodes never carry `city`, `state`,
//! `zip_code`, or `property_type`; Neighborhood nodes never carry `city` or
//! `state`. Those fields are represented only as edges in the graph
//! destination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Embedding, Neighborhood, Property, WikipediaArticle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyGraphNode {
    pub listing_id: String,
    pub street: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub year_built: Option<u32>,
    pub features: BTreeSet<String>,
    pub description: String,
    pub listing_date: DateTime<Utc>,
    pub embedding: Option<Embedding>,
}

impl PropertyGraphNode {
    pub fn from_property(property: &Property) -> Self {
        Self {
            listing_id: property.listing_id.clone(),
            street: property.address.street.clone(),
            latitude: property.address.latitude,
            longitude: property.address.longitude,
            price: property.price,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            square_feet: property.square_feet,
            year_built: property.year_built,
            features: property.features.clone(),
            description: property.description.clone(),
            listing_date: property.listing_date,
            embedding: property.embedding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodGraphNode {
    pub neighborhood_id: String,
    pub name: String,
    pub population: Option<u64>,
    pub walkability_score: Option<f32>,
    pub school_score: Option<f32>,
    pub crime_score: Option<f32>,
    pub description: String,
    pub lifestyle_tags: BTreeSet<String>,
    pub embedding: Option<Embedding>,
}

impl NeighborhoodGraphNode {
    pub fn from_neighborhood(neighborhood: &Neighborhood) -> Self {
        Self {
            neighborhood_id: neighborhood.neighborhood_id.clone(),
            name: neighborhood.name.clone(),
            population: neighborhood.population,
            walkability_score: neighborhood.walkability_score,
            school_score: neighborhood.school_score,
            crime_score: neighborhood.crime_score,
            description: neighborhood.description.clone(),
            lifestyle_tags: neighborhood.lifestyle_tags.clone(),
            embedding: neighborhood.embedding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaGraphNode {
    pub page_id: i64,
    pub title: String,
    pub long_summary: String,
    pub short_summary: String,
    pub embedding: Option<Embedding>,
}

impl WikipediaGraphNode {
    pub fn from_article(article: &WikipediaArticle) -> Self {
        Self {
            page_id: article.page_id,
            title: article.title.clone(),
            long_summary: article.long_summary.clone(),
            short_summary: article.short_summary.clone(),
            embedding: article.embedding.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use serde_json::to_value;

    #[test]
    fn property_graph_node_excludes_denormalized_fields() {
        let property = Property {
            listing_id: "P1".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "San Francisco".to_string(),
                city_normalized: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94110".to_string(),
                latitude: None,
                longitude: None,
            },
            price: 500_000.0,
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: 900,
            year_built: None,
            property_type: "condo".to_string(),
            features: BTreeSet::new(),
            description: String::new(),
            listing_date: Utc::now(),
            embedding: None,
            neighborhood_id: None,
        };
        let node = PropertyGraphNode::from_property(&property);
        let json = to_value(&node).unwrap();
        assert!(json.get("city").is_none());
        assert!(json.get("state").is_none());
        assert!(json.get("zip_code").is_none());
        assert!(json.get("property_type").is_none());
    }
}
