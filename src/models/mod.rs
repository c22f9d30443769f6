//! Core entity and edge models shared across tiers.
//!
//! Field-level doc comments follow the teacher's density in
//! `models::relationship` for the primary entities; derived entities are
//! documented more tersely, the way the teacher documents smaller
//! supporting types (`models::table::ForeignKeyDetails`).

mod edge;
mod embedding;
mod entity_kind;
mod neighborhood;
mod property;
mod wikipedia;

pub use edge::{Edge, EdgeKind};
pub use embedding::Embedding;
pub use entity_kind::EntityKind;
pub use neighborhood::{Neighborhood, WikipediaCorrelation};
pub use property::{Address, Property, PropertyType};
pub use wikipedia::{WikipediaArticle, LONG_SUMMARY_HARD_CAP};

/// Derived classification/geography nodes. Identity rules are defined in
/// spec §3; these are cheap newtypes over `String` rather than full structs
/// because the only data they carry beyond identity is aggregate counts
/// computed by the extractors (see [`crate::extract`]).
pub mod derived {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Feature {
        /// Lowercased feature name; this *is* the node identity.
        pub name: String,
        pub property_count: usize,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PropertyTypeNode {
        /// Normalized (lowercase, underscored) type string; node identity.
        pub type_name: String,
        pub property_count: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum PriceRangeBucket {
        Under250k,
        From250kTo500k,
        From500kTo750k,
        From750kTo1m,
        From1mTo2m,
        From2mAndUp,
    }

    impl PriceRangeBucket {
        /// Assign a property's price to one of the fixed buckets (spec §4.1).
        pub fn bucket_for(price: f64) -> Self {
            if price < 250_000.0 {
                Self::Under250k
            } else if price < 500_000.0 {
                Self::From250kTo500k
            } else if price < 750_000.0 {
                Self::From500kTo750k
            } else if price < 1_000_000.0 {
                Self::From750kTo1m
            } else if price < 2_000_000.0 {
                Self::From1mTo2m
            } else {
                Self::From2mAndUp
            }
        }

        /// Stable identity key used as the node id and search document id.
        pub fn key(&self) -> &'static str {
            match self {
                Self::Under250k => "under_250k",
                Self::From250kTo500k => "250k_500k",
                Self::From500kTo750k => "500k_750k",
                Self::From750kTo1m => "750k_1m",
                Self::From1mTo2m => "1m_2m",
                Self::From2mAndUp => "2m_plus",
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PriceRangeNode {
        pub bucket: PriceRangeBucket,
        pub min_price: f64,
        pub max_price: f64,
        pub property_count: usize,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct City {
        pub name: String,
        pub state: String,
    }

    impl City {
        /// `{name}_{state}` identity, per spec §3.
        pub fn id(&self) -> String {
            format!("{}_{}", self.name.replace(' ', "_"), self.state)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct County {
        pub name: String,
        pub state: String,
    }

    impl County {
        pub fn id(&self) -> String {
            format!("{}_{}", self.name.replace(' ', "_"), self.state)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct State {
        /// Two-letter abbreviation; this is the node identity.
        pub abbreviation: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ZipCode {
        /// Five-digit zip string; this is the node identity.
        pub code: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TopicCluster {
        pub label: String,
        pub page_ids: Vec<i64>,
    }
}
