//! Silver tier: entity-specific flattening, normalization, and derived-key
//! computation.
//!
//! One transformer per entity type, invoked by name from the orchestrator
//! (`transform_property`, `transform_neighborhood`, `transform_wikipedia`)
//! — never dispatched dynamically on a runtime tag (spec §4.1).

pub mod normalize;
mod transform_neighborhood;
mod transform_property;
mod transform_wikipedia;

pub use transform_neighborhood::transform_neighborhood;
pub use transform_property::transform_property;
pub use transform_wikipedia::transform_wikipedia;

use serde::{Deserialize, Serialize};

/// Statistics from one silver transformation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SilverStats {
    pub rows_in: usize,
    pub rows_out: usize,
}
