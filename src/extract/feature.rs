//! Feature extraction (spec §4.2): one `Feature` node per distinct
//! normalized feature string across all properties, with a property count.

use std::collections::BTreeMap;

use crate::models::derived::Feature;
use crate::models::Property;

/// Count how many properties carry each distinct feature.
pub fn extract_features(properties: &[Property]) -> Vec<Feature> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for property in properties {
        for feature in &property.features {
            *counts.entry(feature.clone()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, property_count)| Feature {
            name,
            property_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Property};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn property(features: &[&str]) -> Property {
        Property {
            listing_id: "P".to_string(),
            address: Address {
                street: String::new(),
                city: String::new(),
                city_normalized: String::new(),
                state: String::new(),
                zip_code: String::new(),
                latitude: None,
                longitude: None,
            },
            price: 0.0,
            bedrooms: 0,
            bathrooms: 0.0,
            square_feet: 0,
            year_built: None,
            property_type: "house".to_string(),
            features: features.iter().map(|f| f.to_string()).collect::<BTreeSet<_>>(),
            description: String::new(),
            listing_date: Utc::now(),
            embedding: None,
            neighborhood_id: None,
        }
    }

    #[test]
    fn counts_features_across_properties() {
        let properties = vec![property(&["pool", "garage"]), property(&["pool"])];
        let features = extract_features(&properties);
        let pool = features.iter().find(|f| f.name == "pool").unwrap();
        assert_eq!(pool.property_count, 2);
        let garage = features.iter().find(|f| f.name == "garage").unwrap();
        assert_eq!(garage.property_count, 1);
    }
}
