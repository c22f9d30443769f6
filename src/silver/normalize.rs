//! Geographic and string normalization helpers shared by the silver
//! transformers (spec §4.1).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// State name/abbreviation canonicalization table. Not exhaustive — only
/// the forms observed in real-estate listing sources are covered; anything
/// already a valid two-letter uppercase abbreviation passes through
/// unchanged.
static STATE_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("california", "CA"),
        ("texas", "TX"),
        ("new york", "NY"),
        ("florida", "FL"),
        ("washington", "WA"),
        ("oregon", "OR"),
        ("nevada", "NV"),
        ("arizona", "AZ"),
        ("colorado", "CO"),
        ("illinois", "IL"),
        ("massachusetts", "MA"),
        ("pennsylvania", "PA"),
        ("georgia", "GA"),
        ("north carolina", "NC"),
        ("virginia", "VA"),
    ])
});

/// Common city alias table (spec scenario C: `"SF"` -> `"San Francisco"`).
static CITY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("sf", "San Francisco"),
        ("nyc", "New York"),
        ("la", "Los Angeles"),
        ("philly", "Philadelphia"),
        ("dc", "Washington"),
        ("chi", "Chicago"),
        ("vegas", "Las Vegas"),
    ])
});

/// Canonicalize a state string to its two-letter uppercase abbreviation.
/// Already-abbreviated input passes through uppercased and unchanged.
pub fn canonicalize_state(state: &str) -> String {
    let trimmed = state.trim();
    if trimmed.len() == 2 {
        return trimmed.to_uppercase();
    }
    STATE_ABBREVIATIONS
        .get(trimmed.to_lowercase().as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| trimmed.to_uppercase())
}

/// Canonicalize a city alias (e.g. `"SF"` -> `"San Francisco"`). Anything
/// not recognized as an alias passes through with whitespace trimmed.
pub fn canonicalize_city(city: &str) -> String {
    let trimmed = city.trim();
    CITY_ALIASES
        .get(trimmed.to_lowercase().as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Truncate a zip code to its first five digits, stripping any ZIP+4
/// suffix or non-digit characters.
pub fn truncate_zip(zip: &str) -> String {
    let digits: String = zip.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.chars().take(5).collect()
}

/// Lowercase and trim a feature string.
pub fn normalize_feature(feature: &str) -> String {
    feature.trim().to_lowercase()
}

/// Normalize a property type string to lowercase/underscore form.
pub fn normalize_property_type(property_type: &str) -> String {
    property_type
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('-', "_")
}

/// `{entity_label}:{primary_id}` derived key (spec §4.1).
pub fn graph_node_id(entity_label: &str, primary_id: &str) -> String {
    format!("{entity_label}:{primary_id}")
}
