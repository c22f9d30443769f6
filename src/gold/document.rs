//! Denormalized Gold documents: the shape the search and file writers
//! consume (spec §4.1 Gold enrichment, §4.6, §4.5). These carry every field
//! on the source entity, including the ones the graph projection excludes
//! (see [`super::graph_projection`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Embedding, Neighborhood, Property, WikipediaArticle, WikipediaCorrelation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDocument {
    pub listing_id: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub year_built: Option<u32>,
    pub property_type: String,
    pub features: BTreeSet<String>,
    pub description: String,
    pub listing_date: DateTime<Utc>,
    pub neighborhood_id: Option<String>,
    pub embedding: Option<Embedding>,
}

impl PropertyDocument {
    pub fn from_property(property: &Property) -> Self {
        Self {
            listing_id: property.listing_id.clone(),
            street: property.address.street.clone(),
            city: property.address.city.clone(),
            state: property.address.state.clone(),
            zip_code: property.address.zip_code.clone(),
            latitude: property.address.latitude,
            longitude: property.address.longitude,
            price: property.price,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            square_feet: property.square_feet,
            year_built: property.year_built,
            property_type: property.property_type.clone(),
            features: property.features.clone(),
            description: property.description.clone(),
            listing_date: property.listing_date,
            neighborhood_id: property.neighborhood_id.clone(),
            embedding: property.embedding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodDocument {
    pub neighborhood_id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub population: Option<u64>,
    pub walkability_score: Option<f32>,
    pub school_score: Option<f32>,
    pub crime_score: Option<f32>,
    pub description: String,
    pub lifestyle_tags: BTreeSet<String>,
    pub wikipedia_correlations: Vec<WikipediaCorrelation>,
    pub embedding: Option<Embedding>,
}

impl NeighborhoodDocument {
    pub fn from_neighborhood(neighborhood: &Neighborhood) -> Self {
        Self {
            neighborhood_id: neighborhood.neighborhood_id.clone(),
            name: neighborhood.name.clone(),
            city: neighborhood.city.clone(),
            state: neighborhood.state.clone(),
            population: neighborhood.population,
            walkability_score: neighborhood.walkability_score,
            school_score: neighborhood.school_score,
            crime_score: neighborhood.crime_score,
            description: neighborhood.description.clone(),
            lifestyle_tags: neighborhood.lifestyle_tags.clone(),
            wikipedia_correlations: neighborhood.wikipedia_correlations.clone(),
            embedding: neighborhood.embedding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaDocument {
    pub page_id: i64,
    pub title: String,
    pub long_summary: String,
    pub short_summary: String,
    pub truncated: bool,
    pub neighborhood_ids: Option<Vec<String>>,
    pub embedding: Option<Embedding>,
}

impl WikipediaDocument {
    pub fn from_article(article: &WikipediaArticle) -> Self {
        Self {
            page_id: article.page_id,
            title: article.title.clone(),
            long_summary: article.long_summary.clone(),
            short_summary: article.short_summary.clone(),
            truncated: article.truncated,
            neighborhood_ids: article.neighborhood_ids.clone(),
            embedding: article.embedding.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    #[test]
    fn property_document_carries_denormalized_fields() {
        let property = Property {
            listing_id: "P1".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "San Francisco".to_string(),
                city_normalized: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94110".to_string(),
                latitude: Some(37.0),
                longitude: Some(-122.0),
            },
            price: 500_000.0,
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: 900,
            year_built: Some(1990),
            property_type: "condo".to_string(),
            features: BTreeSet::new(),
            description: String::new(),
            listing_date: Utc::now(),
            embedding: None,
            neighborhood_id: Some("N1".to_string()),
        };
        let doc = PropertyDocument::from_property(&property);
        assert_eq!(doc.city, "San Francisco");
        assert_eq!(doc.property_type, "condo");
    }
}
