//! Geographic extraction: City / County / State / ZipCode nodes derived
//! from property addresses (spec §4.1, §6).
//!
//! County is only populated when a `locations_path` reference dataset is
//! configured; without one, properties are geocoded from their own address
//! fields and no county-level entity is produced (spec §6 Open Question 1,
//! decided in DESIGN.md).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::models::derived::{City, County, State, ZipCode};
use crate::models::Property;

#[derive(Debug, Deserialize)]
struct LocationRecord {
    zip_code: String,
    city: String,
    state: String,
    county: Option<String>,
}

/// A loaded zip -> (city, state, county) reference table.
#[derive(Debug, Clone, Default)]
pub struct LocationReference {
    by_zip: HashMap<String, LocationEntry>,
}

#[derive(Debug, Clone)]
struct LocationEntry {
    city: String,
    state: String,
    county: Option<String>,
}

impl LocationReference {
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let records: Vec<LocationRecord> =
            serde_json::from_str(&text).map_err(|e| SourceError::Json {
                path: path.display().to_string(),
                source: e,
            })?;

        let by_zip = records
            .into_iter()
            .map(|r| {
                (
                    r.zip_code,
                    LocationEntry {
                        city: r.city,
                        state: r.state,
                        county: r.county,
                    },
                )
            })
            .collect();
        Ok(Self { by_zip })
    }

    fn county_for(&self, zip: &str) -> Option<String> {
        self.by_zip.get(zip).and_then(|e| e.county.clone())
    }

    /// Public alias used by the relationship builder (`relationships::builder::in_county`).
    pub fn county_for_zip(&self, zip: &str) -> Option<String> {
        self.county_for(zip)
    }
}

pub struct GeographicEntities {
    pub cities: Vec<City>,
    pub counties: Vec<County>,
    pub states: Vec<State>,
    pub zip_codes: Vec<ZipCode>,
}

pub fn extract_geography(
    properties: &[Property],
    reference: Option<&LocationReference>,
) -> GeographicEntities {
    let mut cities: BTreeMap<String, City> = BTreeMap::new();
    let mut counties: BTreeMap<String, County> = BTreeMap::new();
    let mut states: BTreeMap<String, State> = BTreeMap::new();
    let mut zip_codes: BTreeMap<String, ZipCode> = BTreeMap::new();

    for property in properties {
        let address = &property.address;
        if !address.city_normalized.is_empty() {
            cities.entry(address.city_normalized.clone()).or_insert(City {
                name: address.city_normalized.clone(),
                state: address.state.clone(),
            });
        }
        if !address.state.is_empty() {
            states
                .entry(address.state.clone())
                .or_insert(State {
                    abbreviation: address.state.clone(),
                });
        }
        if !address.zip_code.is_empty() {
            zip_codes
                .entry(address.zip_code.clone())
                .or_insert(ZipCode {
                    code: address.zip_code.clone(),
                });
        }
        if let Some(reference) = reference {
            if let Some(county_name) = reference.county_for(&address.zip_code) {
                counties
                    .entry(format!("{county_name}_{}", address.state))
                    .or_insert(County {
                        name: county_name,
                        state: address.state.clone(),
                    });
            }
        }
    }

    GeographicEntities {
        cities: cities.into_values().collect(),
        counties: counties.into_values().collect(),
        states: states.into_values().collect(),
        zip_codes: zip_codes.into_values().collect(),
    }
}

/// Raw JSON convenience wrapper used by the locations-path CLI validation
/// path to sanity check a reference file before a full run.
pub fn is_valid_location_file(value: &Value) -> bool {
    value.is_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn property(city: &str, state: &str, zip: &str) -> Property {
        Property {
            listing_id: "P".to_string(),
            address: Address {
                street: String::new(),
                city: city.to_string(),
                city_normalized: city.to_string(),
                state: state.to_string(),
                zip_code: zip.to_string(),
                latitude: None,
                longitude: None,
            },
            price: 0.0,
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
    fn deduplicates_city_state_zip_across_properties() {
        let properties = vec![
            property("San Francisco", "CA", "94110"),
            property("San Francisco", "CA", "94110"),
            property("Oakland", "CA", "94601"),
        ];
        let geo = extract_geography(&properties, None);
        assert_eq!(geo.cities.len(), 2);
        assert_eq!(geo.states.len(), 1);
        assert_eq!(geo.zip_codes.len(), 2);
        assert!(geo.counties.is_empty());
    }

    #[test]
    fn counties_only_populated_with_reference_dataset() {
        let reference = LocationReference {
            by_zip: HashMap::from([(
                "94110".to_string(),
                LocationEntry {
                    city: "San Francisco".to_string(),
                    state: "CA".to_string(),
                    county: Some("San Francisco County".to_string()),
                },
            )]),
        };
        let properties = vec![property("San Francisco", "CA", "94110")];
        let geo = extract_geography(&properties, Some(&reference));
        assert_eq!(geo.counties.len(), 1);
        assert_eq!(geo.counties[0].name, "San Francisco County");
    }
}
