//! # Nutritionist
//!
//! A command-line food assistant. Given a list of ingredients it forecasts
//! whether they make a good dish using a pre-trained classifier, reports
//! nutrition facts as percent of daily value, and finds similar recipes by
//! cosine similarity over ingredient vectors.

pub mod app;
pub mod config;
pub mod daily_values;
pub mod errors;
pub mod feature_vector;
pub mod food_data;
pub mod localization;
pub mod menu;
pub mod nutrient_cache;
pub mod nutrition;
pub mod rating;
pub mod recipes;
pub mod report;
pub mod similarity;
pub mod synonyms;
pub mod unit_conversion;
