//! Price range extraction: bucket properties by price (spec §4.1) and
//! aggregate min/max/count per bucket actually populated.

use std::collections::BTreeMap;

use crate::models::derived::{PriceRangeBucket, PriceRangeNode};
use crate::models::Property;

pub fn extract_price_ranges(properties: &[Property]) -> Vec<PriceRangeNode> {
    let mut buckets: BTreeMap<PriceRangeBucket, (f64, f64, usize)> = BTreeMap::new();

    for property in properties {
        let bucket = PriceRangeBucket::bucket_for(property.price);
        let entry = buckets
            .entry(bucket)
            .or_insert((f64::MAX, f64::MIN, 0));
        entry.0 = entry.0.min(property.price);
        entry.1 = entry.1.max(property.price);
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket, (min_price, max_price, property_count))| PriceRangeNode {
            bucket,
            min_price,
            max_price,
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

    fn property(price: f64) -> Property {
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
            price,
            bedrooms: 0,
            bathrooms: 0.0,
            square_feet: 0,
            year_built: None,
            property_type: "house".to_string(),
            features: BTreeSet::new(),
            description: String::new(),
            listing_date: Utc::now(),
            embedding: None,
            neighborhood_id: None,
        }
    }

    #[test]
    fn only_populated_buckets_are_emitted() {
        let properties = vec![property(100_000.0), property(150_000.0), property(3_000_000.0)];
        let ranges = extract_price_ranges(&properties);
        assert_eq!(ranges.len(), 2);
        let under = ranges
            .iter()
            .find(|r| r.bucket == PriceRangeBucket::Under250k)
            .unwrap();
        assert_eq!(under.property_count, 2);
        assert_eq!(under.min_price, 100_000.0);
        assert_eq!(under.max_price, 150_000.0);
    }
}
