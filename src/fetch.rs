use crate::catalog::{Category, ProductRecord, Row};
use crate::scoring::{calculate_score, Direction, ScoreResult, ScoringConfig};
use crate::store::{StoreClient, StoreError};
use futures::stream::{FuturesUnordered, StreamExt};
use std::cmp::Ordering;

pub type ScoredProduct = (ProductRecord, ScoreResult);

/// Decode and score raw rows, preserving the order the store returned them in.
pub fn score_rows(category: Category, rows: &[Row], scoring: &ScoringConfig) -> Vec<ScoredProduct> {
    rows.iter()
        .map(|row| {
            let record = ProductRecord::from_row(category, row);
            let result = calculate_score(&record, scoring);
            (record, result)
        })
        .collect()
}

/// Fetch one category table and score every row.
///
/// Any failure other than a rejected token is logged and yields an empty
/// list. `StoreError::Unauthorized` is returned so the caller can
/// re-authenticate.
pub async fn fetch_and_score(
    client: &StoreClient,
    category: Category,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Result<Vec<ScoredProduct>, StoreError> {
    if verbose {
        crate::buffered_eprintln!("Fetching {} from table '{}'", category.label(), category.table());
    }

    match client.select(category.table()).await {
        Ok(rows) => {
            if verbose {
                crate::buffered_eprintln!("  {} rows for {}", rows.len(), category.label());
            }
            Ok(score_rows(category, &rows, scoring))
        }
        Err(e) if e.is_unauthorized() => Err(e),
        Err(e) => {
            crate::buffered_eprintln!("Error fetching {}: {}", category.label(), e);
            Ok(Vec::new())
        }
    }
}

/// Fetch every category concurrently, one request per table.
/// Results come back in `Category::ALL` order regardless of completion order.
pub async fn fetch_all(
    client: &StoreClient,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Result<Vec<(Category, Vec<ScoredProduct>)>, StoreError> {
    let mut futures = FuturesUnordered::new();
    for category in Category::ALL {
        let client = client.clone();
        let scoring = scoring.clone();
        futures.push(async move {
            let result = fetch_and_score(&client, category, &scoring, verbose).await;
            (category, result)
        });
    }

    let mut sections = Vec::with_capacity(Category::ALL.len());
    while let Some((category, result)) = futures.next().await {
        sections.push((category, result?));
    }

    sections.sort_by_key(|(category, _)| *category);
    Ok(sections)
}

/// Best-first ordering. Each result's direction decides whether high or low
/// scores lead; sentinel scores go last. Stable for ties.
pub fn rank_products(products: &mut [ScoredProduct]) {
    products.sort_by(|(_, a), (_, b)| compare_best_first(a, b));
}

fn compare_best_first(a: &ScoreResult, b: &ScoreResult) -> Ordering {
    match (a.sentinel.is_some(), b.sentinel.is_some()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let cmp = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
            match a.direction {
                Direction::HigherIsBetter => cmp.reverse(),
                Direction::LowerIsBetter => cmp,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BikeVariant, Sentinel};
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn names(products: &[ScoredProduct]) -> Vec<&str> {
        products.iter().map(|(p, _)| p.display_name()).collect()
    }

    #[test]
    fn test_score_rows_keeps_store_order() {
        let scored = score_rows(
            Category::Car,
            &rows(json!([
                {"id": 1, "name": "Heavy", "production_emissions": 25000},
                {"id": 2, "name": "Light", "production_emissions": 10000},
                {"id": 3, "name": "Unknown"}
            ])),
            &ScoringConfig::default(),
        );
        assert_eq!(names(&scored), vec!["Heavy", "Light", "Unknown"]);
        assert!((scored[0].1.score - 50.0).abs() < 1e-9);
        assert!((scored[1].1.score - 80.0).abs() < 1e-9);
        assert!((scored[2].1.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_rows_empty() {
        assert!(score_rows(Category::Mobile, &[], &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_rank_higher_is_better() {
        let mut scored = score_rows(
            Category::Car,
            &rows(json!([
                {"name": "Heavy", "production_emissions": 25000},
                {"name": "Unknown"},
                {"name": "Light", "production_emissions": 10000}
            ])),
            &ScoringConfig::default(),
        );
        rank_products(&mut scored);
        assert_eq!(names(&scored), vec!["Unknown", "Light", "Heavy"]);
    }

    #[test]
    fn test_rank_lower_is_better_with_sentinels_last() {
        let scoring = ScoringConfig {
            bike_variant: BikeVariant::LifetimeCo2,
        };
        let mut scored = score_rows(
            Category::Bike,
            &rows(json!([
                {"name": "Electric", "engine_capacity_cc": 0, "fuel_tank_liters": 0},
                {"name": "Thirsty", "engine_capacity_cc": 125, "fuel_tank_liters": 10, "mileage_kmpl": 40},
                {"name": "Broken", "engine_capacity_cc": 70, "fuel_tank_liters": 8},
                {"name": "Frugal", "engine_capacity_cc": 70, "fuel_tank_liters": 8, "mileage_kmpl": 50}
            ])),
            &scoring,
        );
        rank_products(&mut scored);
        assert_eq!(names(&scored), vec!["Frugal", "Thirsty", "Electric", "Broken"]);
        assert_eq!(scored[2].1.sentinel, Some(Sentinel::Electric));
        assert_eq!(scored[3].1.sentinel, Some(Sentinel::InvalidMileage));
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let mut scored = score_rows(
            Category::AirConditioner,
            &rows(json!([
                {"name": "First", "power_kw": 1.0},
                {"name": "Second", "power_kw": 1.0},
                {"name": "Third", "power_kw": 1.0}
            ])),
            &ScoringConfig::default(),
        );
        rank_products(&mut scored);
        assert_eq!(names(&scored), vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_list() {
        crate::install_crypto_provider();
        // Nothing listens on the discard port
        let client = StoreClient::new(
            reqwest::Client::new(),
            &crate::config::StoreConfig {
                url: "http://127.0.0.1:9".to_string(),
                anon_key: "anon".to_string(),
            },
            "token",
        );
        let products = fetch_and_score(&client, Category::Car, &ScoringConfig::default(), false)
            .await
            .unwrap();
        assert!(products.is_empty());
    }
}
