//! # Configuration Module
//!
//! This module defines configuration structures for the nutrition assistant,
//! including data file locations, nutrition API settings and retry behaviour.

use std::env;
use std::path::{Path, PathBuf};

// Constants for default configuration
pub const DEFAULT_DATA_DIR: &str = "data";
pub const MODEL_FILE: &str = "best_classifier_model.json";
pub const DAILY_VALUES_FILE: &str = "daily.tsv";
pub const RECIPES_FILE: &str = "recipes_for_similarity.csv";
pub const CACHE_FILE: &str = "ingredient_nutrient_cache.json";
pub const FOOD_DATA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const FOOD_DATA_TYPE: &str = "Foundation";
pub const MIN_MATCH_SCORE: f64 = 200.0;
pub const DEFAULT_TOP_N: usize = 3;

/// Retry configuration for nutrition API requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 2000,     // 2 seconds
            request_timeout_secs: 10, // 10 seconds
        }
    }
}

/// Settings for the external nutrition-data provider
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDataConfig {
    /// Base URL of the FoodData Central API
    pub base_url: String,
    /// API key; lookups fail softly when absent
    pub api_key: Option<String>,
    /// Value of the `dataType` search filter
    pub data_type: String,
    /// Best match must score at least this much to count as found
    pub min_match_score: f64,
    /// Retry behaviour for transient failures
    pub retry: RetryConfig,
}

impl Default for FoodDataConfig {
    fn default() -> Self {
        Self {
            base_url: FOOD_DATA_BASE_URL.to_string(),
            api_key: None,
            data_type: FOOD_DATA_TYPE.to_string(),
            min_match_score: MIN_MATCH_SCORE,
            retry: RetryConfig::default(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the model, reference tables and corpus
    pub data_dir: PathBuf,
    /// Override for the nutrient cache location (defaults into `data_dir`)
    pub cache_file: Option<PathBuf>,
    /// Number of similar recipes to report
    pub top_n: usize,
    /// Nutrition API settings
    pub food_data: FoodDataConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_file: None,
            top_n: DEFAULT_TOP_N,
            food_data: FoodDataConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build a configuration from the environment.
    ///
    /// Loads a `.env` file when present, then reads `USDA_API_KEY`,
    /// `NUTRITIONIST_DATA_DIR` and `NUTRITIONIST_CACHE_FILE`.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        if let Ok(dir) = env::var("NUTRITIONIST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("NUTRITIONIST_CACHE_FILE") {
            config.cache_file = Some(PathBuf::from(file));
        }
        config.food_data.api_key = env::var("USDA_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        config
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILE)
    }

    pub fn daily_values_path(&self) -> PathBuf {
        self.data_dir.join(DAILY_VALUES_FILE)
    }

    pub fn recipes_path(&self) -> PathBuf {
        self.data_dir.join(RECIPES_FILE)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CACHE_FILE))
    }

    /// Point every data file at a different directory
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_defaults() {
        let retry = RetryConfig::default();

        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.retry_delay_ms, 2000);
        assert_eq!(retry.request_timeout_secs, 10);
    }

    #[test]
    fn test_app_config_paths() {
        let config = AppConfig::default().with_data_dir("/tmp/nutri");

        assert_eq!(config.model_path(), PathBuf::from("/tmp/nutri/best_classifier_model.json"));
        assert_eq!(config.daily_values_path(), PathBuf::from("/tmp/nutri/daily.tsv"));
        assert_eq!(config.recipes_path(), PathBuf::from("/tmp/nutri/recipes_for_similarity.csv"));
        assert_eq!(
            config.cache_path(),
            PathBuf::from("/tmp/nutri/ingredient_nutrient_cache.json")
        );
    }

    #[test]
    fn test_cache_file_override() {
        let config = AppConfig {
            cache_file: Some(PathBuf::from("/var/cache/nutri.json")),
            ..Default::default()
        };

        assert_eq!(config.cache_path(), PathBuf::from("/var/cache/nutri.json"));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.food_data.min_match_score, 200.0);
    }
}
