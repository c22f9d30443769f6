use criterion::{black_box, criterion_group, criterion_main, Criterion};
use realty_pipeline::config::{SimilarityConfig, SimilarityScope};
use realty_pipeline::models::{Address, Embedding, Property};
use realty_pipeline::relationships::builder::similar_to;
use std::collections::BTreeSet;

fn property(listing_id: &str, neighborhood_id: &str, vector: Vec<f32>) -> Property {
    Property {
        listing_id: listing_id.to_string(),
        address: Address {
            street: "1 Main St".to_string(),
            city: "San Francisco".to_string(),
            city_normalized: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip_code: "94110".to_string(),
            latitude: None,
            longitude: None,
        },
        price: 750_000.0,
        bedrooms: 3,
        bathrooms: 2.0,
        square_feet: 1_400,
        year_built: Some(1998),
        property_type: "condo".to_string(),
        features: BTreeSet::new(),
        description: "A lovely condo".to_string(),
        listing_date: chrono::Utc::now(),
        embedding: Some(Embedding::new(vector, 8, "mock").unwrap()),
        neighborhood_id: Some(neighborhood_id.to_string()),
    }
}

fn properties(n: usize) -> Vec<Property> {
    (0..n)
        .map(|i| {
            let vector: Vec<f32> = (0..8).map(|d| ((i * 7 + d) % 11) as f32 / 11.0).collect();
            property(&format!("P{i}"), "N1", vector)
        })
        .collect()
}

fn bench_similar_to(c: &mut Criterion) {
    let data = properties(500);
    let config = SimilarityConfig {
        top_k: 10,
        threshold: 0.0,
        scope: SimilarityScope::SameNeighborhood,
    };

    let mut group = c.benchmark_group("similar_to");
    group.throughput(criterion::Throughput::Elements(data.len() as u64));
    group.bench_function("500_properties_same_neighborhood", |b| {
        b.iter(|| black_box(similar_to(black_box(&data), black_box(&config))))
    });
    group.finish();
}

criterion_group!(benches, bench_similar_to);
criterion_main!(benches);
