//! Property type extraction: one `PropertyTypeNode` per distinct normalized
//! `property_type`, with a property count.

use std::collections::BTreeMap;

use crate::models::derived::PropertyTypeNode;
use crate::models::Property;

pub fn extract_property_types(properties: &[Property]) -> Vec<PropertyTypeNode> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for property in properties {
        *counts.entry(property.property_type.clone()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(type_name, property_count)| PropertyTypeNode {
            type_name,
            property_count,
        })
        .collect()
}
