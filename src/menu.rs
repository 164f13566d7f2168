//! # Daily Menu
//!
//! Picks one recipe per meal from the corpus and attaches nutrition facts for
//! its ingredients. Meals are matched on the corpus `meal_type` column.

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::daily_values::DailyValueTable;
use crate::feature_vector::FeatureSet;
use crate::food_data::NutrientSource;
use crate::nutrition::{aggregate, NutritionReport};
use crate::recipes::{Recipe, RecipeCorpus};

pub const MEALS: [&str; 3] = ["breakfast", "lunch", "dinner"];
pub const MISSING_MEAL_TYPE_MESSAGE: &str =
    "Cannot generate menu: meal_type column missing in recipe data";

/// One planned meal
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub title: String,
    pub rating: String,
    pub url: String,
    pub ingredients: Vec<String>,
    pub nutrients: NutritionReport,
}

/// Meal name to planned item or an error message
pub type DailyMenu = IndexMap<String, Result<MenuItem, String>>;

/// Build a breakfast/lunch/dinner menu.
///
/// Fails as a whole only when the corpus has no meal types at all.
pub fn generate_daily_menu<S, R>(
    corpus: &RecipeCorpus,
    features: &FeatureSet,
    source: &mut S,
    daily: &DailyValueTable,
    rng: &mut R,
) -> Result<DailyMenu, String>
where
    S: NutrientSource + ?Sized,
    R: Rng + ?Sized,
{
    if !corpus.has_meal_types() {
        warn!("Recipe corpus has no meal_type column");
        return Err(MISSING_MEAL_TYPE_MESSAGE.to_string());
    }

    let mut menu = DailyMenu::new();
    for meal in MEALS {
        let candidates: Vec<&Recipe> = corpus
            .recipes()
            .iter()
            .filter(|r| {
                r.meal_type
                    .as_deref()
                    .is_some_and(|m| m.trim().eq_ignore_ascii_case(meal))
            })
            .collect();

        let Some(recipe) = candidates.choose(rng) else {
            warn!(meal, "No recipes found for meal");
            menu.insert(meal.to_string(), Err(format!("No recipes found for {meal}")));
            continue;
        };

        info!(meal, title = %recipe.title, "Selected recipe");
        let ingredients: Vec<String> = recipe
            .ingredient_names(features)
            .into_iter()
            .map(str::to_string)
            .collect();
        let nutrients = aggregate(&ingredients, source, daily);

        menu.insert(
            meal.to_string(),
            Ok(MenuItem {
                title: recipe.title.clone(),
                rating: recipe.rating.clone(),
                url: recipe.url.clone(),
                ingredients,
                nutrients,
            }),
        );
    }

    Ok(menu)
}
