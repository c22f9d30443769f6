//! Topic cluster extraction (spec §4.2, Open Question 3).
//!
//! Clustering Wikipedia articles into topics requires an explicit
//! similarity threshold and minimum cluster size to be configured; absent
//! that, this extractor emits nothing rather than guessing a clustering
//! scheme (decided in DESIGN.md).

use crate::models::derived::TopicCluster;
use crate::models::WikipediaArticle;

/// Configuration for the (currently disabled-by-default) clustering pass.
#[derive(Debug, Clone)]
pub struct TopicClusterConfig {
    pub similarity_threshold: f32,
    pub min_cluster_size: usize,
}

pub fn extract_topic_clusters(
    articles: &[WikipediaArticle],
    config: Option<&TopicClusterConfig>,
) -> Vec<TopicCluster> {
    let Some(config) = config else {
        return Vec::new();
    };

    let embedded: Vec<&WikipediaArticle> = articles
        .iter()
        .filter(|a| a.embedding.is_some())
        .collect();

    let mut assigned = vec![false; embedded.len()];
    let mut clusters = Vec::new();

    for i in 0..embedded.len() {
        if assigned[i] {
            continue;
        }
        let mut members = vec![i];
        assigned[i] = true;
        let base = embedded[i].embedding.as_ref().unwrap();
        for j in (i + 1)..embedded.len() {
            if assigned[j] {
                continue;
            }
            let other = embedded[j].embedding.as_ref().unwrap();
            if base.cosine_similarity(other) >= config.similarity_threshold {
                members.push(j);
                assigned[j] = true;
            }
        }
        if members.len() >= config.min_cluster_size {
            let page_ids = members.iter().map(|&idx| embedded[idx].page_id).collect();
            clusters.push(TopicCluster {
                label: format!("cluster_{}", clusters.len()),
                page_ids,
            });
        }
    }

    clusters
}
