//! # Nutrition Aggregator
//!
//! Turns raw nutrient records into percent-of-daily-value figures for each
//! requested ingredient. Results are keyed by normalized ingredient name and
//! keep input order; a repeated ingredient overwrites its earlier entry.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::daily_values::DailyValueTable;
use crate::food_data::{NutrientSource, TRACKED_NUTRIENTS};
use crate::nutrient_cache::{FoodLookup, NutrientRecord};
use crate::synonyms::normalize;
use crate::unit_conversion::{convert, NutrientUnit};

pub const NOT_FOUND_MESSAGE: &str = "Nutritional data not found";
pub const LOOKUP_FAILED_MESSAGE: &str = "Nutritional data lookup failed";

/// Percent daily value per nutrient, in provider order
pub type NutrientPercentages = IndexMap<String, f64>;

/// Nutrition result for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NutritionEntry {
    Facts(NutrientPercentages),
    Unavailable { error: String },
}

impl NutritionEntry {
    pub fn unavailable(message: impl Into<String>) -> Self {
        NutritionEntry::Unavailable {
            error: message.into(),
        }
    }

    pub fn facts(&self) -> Option<&NutrientPercentages> {
        match self {
            NutritionEntry::Facts(facts) => Some(facts),
            NutritionEntry::Unavailable { .. } => None,
        }
    }
}

/// Ordered nutrition results keyed by normalized ingredient name
pub type NutritionReport = IndexMap<String, NutritionEntry>;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percent daily value for each tracked record with a reference value
pub fn percent_daily_values(records: &[NutrientRecord], daily: &DailyValueTable) -> NutrientPercentages {
    let mut percentages = NutrientPercentages::new();

    for record in records {
        // cached records bypass the provider filter
        if !TRACKED_NUTRIENTS.contains(&record.name.as_str()) {
            debug!(nutrient = %record.name, "Untracked nutrient, skipping");
            continue;
        }
        let Some(daily_value) = daily.get(&record.name) else {
            continue;
        };
        if daily_value == 0.0 {
            warn!(nutrient = %record.name, "Daily value is zero, skipping");
            continue;
        }
        let unit = NutrientUnit::parse(&record.unit);
        let converted = convert(record.value, &unit, &record.name, daily);
        percentages.insert(record.name.clone(), round2(converted / daily_value * 100.0));
    }

    percentages
}

/// Look up and convert nutrition facts for each ingredient
pub fn aggregate<S, I>(
    ingredients: &[I],
    source: &mut S,
    daily: &DailyValueTable,
) -> NutritionReport
where
    S: NutrientSource + ?Sized,
    I: AsRef<str>,
{
    let mut report = NutritionReport::new();

    for ingredient in ingredients {
        let name = normalize(ingredient.as_ref());
        if name.is_empty() {
            continue;
        }

        let entry = match source.lookup(&name) {
            Ok(FoodLookup::Found(records)) => {
                debug!(ingredient = %name, records = records.len(), "Nutrient records found");
                NutritionEntry::Facts(percent_daily_values(&records, daily))
            }
            Ok(FoodLookup::NotFound) => {
                debug!(ingredient = %name, "No nutrition data");
                NutritionEntry::unavailable(NOT_FOUND_MESSAGE)
            }
            Err(e) => {
                warn!(ingredient = %name, error = %e, "Nutrition lookup failed");
                NutritionEntry::unavailable(format!("{LOOKUP_FAILED_MESSAGE}: {e}"))
            }
        };
        report.insert(name, entry);
    }

    report
}
