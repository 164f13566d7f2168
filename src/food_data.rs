//! # Nutrition Data Provider
//!
//! Client for the FoodData Central food search API plus the cache-first
//! wrapper the nutrition aggregator talks to. Requests are blocking and
//! sequential; HTTP 429 and 500 are retried a fixed number of times with a
//! fixed delay, every other failure aborts that ingredient's lookup only.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{FoodDataConfig, RetryConfig};
use crate::errors::LookupError;
use crate::nutrient_cache::{FoodLookup, NutrientCache, NutrientRecord};
use crate::synonyms::normalize;

/// Nutrient names kept from provider responses
pub const TRACKED_NUTRIENTS: [&str; 39] = [
    "Total lipid (fat)",
    "Fatty acids, total saturated",
    "Fatty acids, total monounsaturated",
    "Fatty acids, total polyunsaturated",
    "Fatty acids, total trans",
    "Cholesterol",
    "Carbohydrate, by difference",
    "Sodium, Na",
    "Fiber, total dietary",
    "Protein",
    "Sugars, Total",
    "Energy",
    "Vitamin A, RAE",
    "Vitamin C, total ascorbic acid",
    "Vitamin D (D2 + D3)",
    "Vitamin E (alpha-tocopherol)",
    "Vitamin K (phylloquinone)",
    "Thiamin",
    "Riboflavin",
    "Niacin",
    "Vitamin B-6",
    "Folate, total",
    "Vitamin B-12",
    "Calcium, Ca",
    "Iron, Fe",
    "Phosphorus, P",
    "Magnesium, Mg",
    "Zinc, Zn",
    "Copper, Cu",
    "Manganese, Mn",
    "Selenium, Se",
    "Potassium, K",
    "Ash",
    "Nitrogen",
    "Water",
    "Fructose",
    "Glucose",
    "Sucrose",
    "Galactose",
];

/// Anything that can fetch raw nutrient records for an ingredient
pub trait NutrientSource {
    fn lookup(&mut self, ingredient: &str) -> Result<FoodLookup, LookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    score: Option<f64>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_name: Option<String>,
    unit_name: Option<String>,
    value: Option<f64>,
}

/// Reduce a search response body to the tracked nutrients of its best match
pub fn extract_nutrients(body: &str, min_score: f64) -> Result<FoodLookup, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(best) = response.foods.into_iter().next() else {
        return Ok(FoodLookup::NotFound);
    };
    if best.score.is_some_and(|score| score < min_score) {
        debug!(score = ?best.score, min_score, "Best match scored too low");
        return Ok(FoodLookup::NotFound);
    }

    let tracked: HashSet<&str> = TRACKED_NUTRIENTS.into_iter().collect();
    let records: Vec<NutrientRecord> = best
        .food_nutrients
        .into_iter()
        .filter_map(|n| {
            let name = n.nutrient_name?;
            if !tracked.contains(name.as_str()) {
                return None;
            }
            Some(NutrientRecord {
                name,
                unit: n.unit_name.unwrap_or_default(),
                value: n.value?,
            })
        })
        .collect();

    if records.is_empty() {
        debug!("Best match carries no tracked nutrients");
        return Ok(FoodLookup::NotFound);
    }
    Ok(FoodLookup::Found(records))
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// Only transient errors are retried; the delay between attempts is fixed.
pub fn with_retries<T>(
    retry: &RetryConfig,
    mut op: impl FnMut(u32) -> Result<T, LookupError>,
) -> Result<T, LookupError> {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                info!(attempt, max_attempts, error = %e, "Transient failure, retrying");
                thread::sleep(Duration::from_millis(retry.retry_delay_ms));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Blocking FoodData Central search client
pub struct FoodDataClient {
    config: FoodDataConfig,
    http: reqwest::blocking::Client,
}

impl FoodDataClient {
    pub fn new(config: FoodDataConfig) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.retry.request_timeout_secs))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn search(&self, ingredient: &str, api_key: &str) -> Result<FoodLookup, LookupError> {
        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        let query = format!("\"{ingredient}\"");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("api_key", api_key),
                ("dataType", self.config.data_type.as_str()),
                ("pageSize", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::from_status(status.as_u16()));
        }

        let body = response.text()?;
        extract_nutrients(&body, self.config.min_match_score)
    }
}

impl NutrientSource for FoodDataClient {
    fn lookup(&mut self, ingredient: &str) -> Result<FoodLookup, LookupError> {
        let Some(api_key) = self.config.api_key.clone() else {
            return Err(LookupError::MissingApiKey);
        };

        with_retries(&self.config.retry, |attempt| {
            debug!(ingredient, attempt, "Querying nutrition API");
            self.search(ingredient, &api_key)
        })
    }
}

/// Cache-first wrapper around a nutrient source.
///
/// Completed lookups (found or not found) are written to the cache before
/// being returned; failures are never cached.
pub struct CachedNutrientSource<S, C> {
    source: S,
    cache: C,
}

impl<S: NutrientSource, C: NutrientCache> CachedNutrientSource<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: NutrientSource, C: NutrientCache> NutrientSource for CachedNutrientSource<S, C> {
    fn lookup(&mut self, ingredient: &str) -> Result<FoodLookup, LookupError> {
        let key = normalize(ingredient);

        if let Some(cached) = self.cache.get(&key) {
            debug!(ingredient = %key, "Nutrient cache hit");
            return Ok(cached);
        }

        debug!(ingredient = %key, "Nutrient cache miss");
        let lookup = self.source.lookup(&key)?;
        if let Err(e) = self.cache.put(&key, lookup.clone()) {
            warn!(ingredient = %key, error = %e, "Failed to persist nutrient cache");
        }
        Ok(lookup)
    }
}
