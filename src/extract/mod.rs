//! Entity extraction: derive classification and geographic nodes from
//! Silver/Gold (spec §4.2). Every extractor below is entity-specific; none
//! dispatch dynamically on a runtime tag (spec §9).

pub mod feature;
pub mod geographic;
pub mod price_range;
pub mod property_type;
pub mod topic_cluster;

pub use feature::extract_features;
pub use geographic::{extract_geography, LocationReference};
pub use price_range::extract_price_ranges;
pub use property_type::extract_property_types;
pub use topic_cluster::extract_topic_clusters;

use crate::models::derived::{
    City, County, Feature, PriceRangeNode, PropertyTypeNode, State, TopicCluster, ZipCode,
};

/// All classification/geography entities extracted for one run.
#[derive(Debug, Clone, Default)]
pub struct ExtractedEntities {
    pub features: Vec<Feature>,
    pub property_types: Vec<PropertyTypeNode>,
    pub price_ranges: Vec<PriceRangeNode>,
    pub cities: Vec<City>,
    pub counties: Vec<County>,
    pub states: Vec<State>,
    pub zip_codes: Vec<ZipCode>,
    pub topic_clusters: Vec<TopicCluster>,
}
