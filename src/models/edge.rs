use serde::{Deserialize, Serialize};

/// The closed set of edge types emitted by the relationship builder
/// (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    LocatedIn,
    InZipCode,
    InCity,
    InCounty,
    InState,
    Near,
    HasFeature,
    OfType,
    InPriceRange,
    SimilarTo,
    Describes,
}

impl EdgeKind {
    /// Emission order within a destination (§4.4: "Edges last, in the order
    /// listed in §4.2").
    pub const EMIT_ORDER: [EdgeKind; 11] = [
        EdgeKind::LocatedIn,
        EdgeKind::InZipCode,
        EdgeKind::InCity,
        EdgeKind::InCounty,
        EdgeKind::InState,
        EdgeKind::Near,
        EdgeKind::HasFeature,
        EdgeKind::OfType,
        EdgeKind::InPriceRange,
        EdgeKind::SimilarTo,
        EdgeKind::Describes,
    ];

    /// Cypher-style relationship type name used by the graph writer.
    pub fn relationship_name(&self) -> &'static str {
        match self {
            EdgeKind::LocatedIn => "LOCATED_IN",
            EdgeKind::InZipCode => "IN_ZIP_CODE",
            EdgeKind::InCity => "IN_CITY",
            EdgeKind::InCounty => "IN_COUNTY",
            EdgeKind::InState => "IN_STATE",
            EdgeKind::Near => "NEAR",
            EdgeKind::HasFeature => "HAS_FEATURE",
            EdgeKind::OfType => "OF_TYPE",
            EdgeKind::InPriceRange => "IN_PRICE_RANGE",
            EdgeKind::SimilarTo => "SIMILAR_TO",
            EdgeKind::Describes => "DESCRIBES",
        }
    }

    /// Whether this kind is materialized as undirected by destinations that
    /// support it natively (see Open Question 2 in DESIGN.md).
    pub fn is_undirected(&self) -> bool {
        matches!(self, EdgeKind::Near | EdgeKind::SimilarTo)
    }
}

/// A single typed edge. `weight` is only populated for kinds that carry one
/// (`SimilarTo`); everything else leaves it `None`.
///
/// Edge tables use set semantics over `(from_id, to_id, kind)` — emitters
/// are responsible for deduplicating before constructing these, so this
/// type itself carries no identity beyond its three key fields plus an
/// optional weight (spec invariant 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl Edge {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// The `(from_id, to_id, kind)` key used for set-semantics dedup.
    pub fn key(&self) -> (String, String, EdgeKind) {
        (self.from_id.clone(), self.to_id.clone(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_ignores_weight() {
        let a = Edge::new("P1", "P2", EdgeKind::SimilarTo).with_weight(0.9);
        let b = Edge::new("P1", "P2", EdgeKind::SimilarTo).with_weight(0.95);
        assert_eq!(a.key(), b.key());
    }
}
