//! # Application Context
//!
//! Everything loaded once at startup (model, reference tables, corpus and the
//! cached nutrition source) lives in [`AppContext`], which every operation
//! takes explicitly. Tests assemble one from in-memory parts with
//! [`AppContext::new`].

use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

use crate::config::AppConfig;
use crate::daily_values::DailyValueTable;
use crate::feature_vector::{FeatureSet, FeatureVectorizer, Vectorization};
use crate::food_data::{CachedNutrientSource, FoodDataClient, NutrientSource};
use crate::menu::{generate_daily_menu, DailyMenu};
use crate::nutrient_cache::JsonFileCache;
use crate::nutrition::{aggregate, NutritionReport};
use crate::rating::{load_classifier, Classifier, RatingOutcome, RatingPredictor};
use crate::recipes::RecipeCorpus;
use crate::similarity::{top_n, SimilarRecipe};

/// Split a comma-separated ingredient argument, dropping blank items
pub fn parse_ingredient_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Full result of analyzing one ingredient list
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub vectorization: Vectorization,
    pub rating: RatingOutcome,
    pub nutrition: NutritionReport,
    pub similar: Vec<SimilarRecipe>,
}

pub struct AppContext {
    vectorizer: FeatureVectorizer,
    predictor: RatingPredictor,
    daily_values: DailyValueTable,
    corpus: RecipeCorpus,
    nutrients: Box<dyn NutrientSource>,
}

impl AppContext {
    /// Assemble a context from prebuilt parts.
    ///
    /// The feature set is taken from the classifier; `corpus` must have been
    /// loaded against the same feature names.
    pub fn new(
        classifier: Box<dyn Classifier>,
        daily_values: DailyValueTable,
        corpus: RecipeCorpus,
        nutrients: Box<dyn NutrientSource>,
    ) -> Self {
        let features = FeatureSet::new(classifier.feature_names().to_vec());
        Self {
            vectorizer: FeatureVectorizer::new(features),
            predictor: RatingPredictor::new(classifier),
            daily_values,
            corpus,
            nutrients,
        }
    }

    /// Load every startup artifact; any failure here is fatal
    pub fn load(config: &AppConfig) -> Result<Self> {
        let model_path = config.model_path();
        let classifier = load_classifier(&model_path)
            .with_context(|| format!("Failed to load model {}", model_path.display()))?;
        let features = FeatureSet::new(classifier.feature_names().to_vec());

        let daily_values = DailyValueTable::load(&config.daily_values_path())?;
        let corpus = RecipeCorpus::load(&config.recipes_path(), &features)?;

        let client = FoodDataClient::new(config.food_data.clone())
            .context("Failed to build nutrition API client")?;
        let cache = JsonFileCache::open(config.cache_path());
        let nutrients = CachedNutrientSource::new(client, cache);

        info!(
            features = features.len(),
            recipes = corpus.len(),
            daily_values = daily_values.len(),
            "Application context ready"
        );
        Ok(Self::new(classifier, daily_values, corpus, Box::new(nutrients)))
    }

    pub fn features(&self) -> &FeatureSet {
        self.vectorizer.features()
    }

    pub fn daily_values(&self) -> &DailyValueTable {
        &self.daily_values
    }

    pub fn corpus(&self) -> &RecipeCorpus {
        &self.corpus
    }

    pub fn vectorize<S: AsRef<str>>(&self, ingredients: &[S]) -> Vectorization {
        self.vectorizer.vectorize_detailed(ingredients)
    }

    pub fn predict_rating<S: AsRef<str>>(&self, ingredients: &[S]) -> RatingOutcome {
        let vector = self.vectorizer.vectorize(ingredients);
        self.predictor.predict(vector.as_ref())
    }

    pub fn nutrition_facts<S: AsRef<str>>(&mut self, ingredients: &[S]) -> NutritionReport {
        aggregate(ingredients, self.nutrients.as_mut(), &self.daily_values)
    }

    pub fn similar_recipes<S: AsRef<str>>(&self, ingredients: &[S], n: usize) -> Vec<SimilarRecipe> {
        let vector = self.vectorizer.vectorize(ingredients);
        top_n(vector.as_ref(), &self.corpus, n)
    }

    /// Forecast, nutrition facts and similar recipes from a single vectorization
    pub fn analyze<S: AsRef<str>>(&mut self, ingredients: &[S], n: usize) -> Analysis {
        let vectorization = self.vectorizer.vectorize_detailed(ingredients);
        let rating = self.predictor.predict(vectorization.vector.as_ref());
        let nutrition = self.nutrition_facts(ingredients);
        let similar = top_n(vectorization.vector.as_ref(), &self.corpus, n);

        Analysis {
            vectorization,
            rating,
            nutrition,
            similar,
        }
    }

    pub fn daily_menu<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DailyMenu, String> {
        generate_daily_menu(
            &self.corpus,
            self.vectorizer.features(),
            self.nutrients.as_mut(),
            &self.daily_values,
            rng,
        )
    }
}
