use serde::{Deserialize, Serialize};

/// The closed set of node kinds produced by the pipeline. Replaces the
/// runtime type inspection used upstream (§9 Design Notes): every writer
/// and extractor switches on this enum exhaustively instead of dispatching
/// on a dynamic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    State,
    County,
    City,
    ZipCode,
    PropertyType,
    Feature,
    PriceRange,
    Neighborhood,
    Property,
    WikipediaArticle,
    TopicCluster,
}

impl EntityKind {
    /// Per-destination write order (§4.4): geographic hierarchy first,
    /// classification next, primary entities, then derived.
    pub const WRITE_ORDER: [EntityKind; 11] = [
        EntityKind::State,
        EntityKind::County,
        EntityKind::City,
        EntityKind::ZipCode,
        EntityKind::PropertyType,
        EntityKind::Feature,
        EntityKind::PriceRange,
        EntityKind::Neighborhood,
        EntityKind::Property,
        EntityKind::WikipediaArticle,
        EntityKind::TopicCluster,
    ];

    /// Graph node label / search index name for this kind (both coincide
    /// with the entity name verbatim, per spec §4.6).
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::County => "County",
            EntityKind::City => "City",
            EntityKind::ZipCode => "ZipCode",
            EntityKind::PropertyType => "PropertyType",
            EntityKind::Feature => "Feature",
            EntityKind::PriceRange => "PriceRange",
            EntityKind::Neighborhood => "Neighborhood",
            EntityKind::Property => "Property",
            EntityKind::WikipediaArticle => "WikipediaArticle",
            EntityKind::TopicCluster => "TopicCluster",
        }
    }
}
