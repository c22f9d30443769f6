//! Denormalization Builder (spec §4.8): assembles one document per
//! property embedding its neighborhood and up to N Wikipedia articles.
//! Runs after the per-entity search-store writes complete, reading back
//! through [`SearchStoreClient`] rather than Gold tables so it operates on
//! exactly what was indexed.

use serde_json::{json, Value};

use crate::config::DenormalizationConfig;
use crate::error::DestinationError;
use crate::writers::SearchStoreClient;

const PRIMARY_MIN_CONFIDENCE: f32 = 0.3;

/// Build the `property_relationships` documents for every property
/// currently in the `properties` index.
pub async fn build(
    client: &dyn SearchStoreClient,
    config: &DenormalizationConfig,
) -> Result<Vec<(String, Value)>, DestinationError> {
    let properties = client.scroll_all("properties").await?;
    let mut documents = Vec::with_capacity(properties.len());

    for property in properties {
        let listing_id = property
            .get("listing_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let neighborhood_id = property.get("neighborhood_id").and_then(Value::as_str);
        let neighborhood = match neighborhood_id {
            Some(id) => client.get_document("neighborhoods", id).await?,
            None => None,
        };

        let wikipedia_articles = match &neighborhood {
            Some(neighborhood) => fetch_ranked_articles(client, neighborhood, config.max_related_wikipedia).await?,
            None => Vec::new(),
        };

        let combined_text = combined_text(&property, neighborhood.as_ref(), &wikipedia_articles);

        let document = json!({
            "listing_id": listing_id,
            "property": property,
            "neighborhood": neighborhood,
            "wikipedia_articles": wikipedia_articles,
            "combined_text": combined_text,
        });
        documents.push((listing_id, document));
    }

    Ok(documents)
}

/// Index the built documents into `property_relationships` (spec §4.8
/// step 6).
pub async fn build_and_index(
    client: &dyn SearchStoreClient,
    config: &DenormalizationConfig,
    batch_size: usize,
) -> Result<usize, DestinationError> {
    let documents = build(client, config).await?;
    client.bulk_index("property_relationships", documents, batch_size).await
}

async fn fetch_ranked_articles(
    client: &dyn SearchStoreClient,
    neighborhood: &Value,
    max_related: usize,
) -> Result<Vec<Value>, DestinationError> {
    let correlations = neighborhood
        .get("wikipedia_correlations")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut primary: Vec<&Value> = correlations
        .iter()
        .filter(|c| c.get("relationship_kind").and_then(Value::as_str) == Some("primary"))
        .collect();
    let mut related: Vec<&Value> = correlations
        .iter()
        .filter(|c| {
            c.get("relationship_kind").and_then(Value::as_str) != Some("primary")
                && c.get("confidence").and_then(Value::as_f64).unwrap_or(0.0) as f32 > PRIMARY_MIN_CONFIDENCE
        })
        .take(max_related)
        .collect();
    primary.append(&mut related);

    let mut articles = Vec::with_capacity(primary.len());
    for correlation in primary {
        let Some(page_id) = correlation.get("page_id").and_then(Value::as_i64) else {
            continue;
        };
        if let Some(article) = client.get_document("wikipedia", &page_id.to_string()).await? {
            articles.push(article);
        }
    }
    Ok(articles)
}

fn combined_text(property: &Value, neighborhood: Option<&Value>, articles: &[Value]) -> String {
    let property_description = property.get("description").and_then(Value::as_str).unwrap_or("");
    let neighborhood_description = neighborhood
        .and_then(|n| n.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let article_summaries: Vec<&str> = articles
        .iter()
        .filter_map(|a| a.get("short_summary").and_then(Value::as_str))
        .collect();

    format!(
        "{property_description} {neighborhood_description} {}",
        article_summaries.join(" ")
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_text_concatenates_available_sections() {
        let property = json!({ "description": "Nice condo" });
        let neighborhood = json!({ "description": "Walkable area" });
        let articles = vec![json!({ "short_summary": "Historic district" })];
        let text = combined_text(&property, Some(&neighborhood), &articles);
        assert_eq!(text, "Nice condo Walkable area Historic district");
    }

    #[test]
    fn combined_text_tolerates_missing_neighborhood() {
        let property = json!({ "description": "Nice condo" });
        let text = combined_text(&property, None, &[]);
        assert_eq!(text, "Nice condo");
    }
}
