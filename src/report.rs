//! # Report Rendering
//!
//! Console rendering of forecasts, nutrition facts, similar recipes and daily
//! menus. All wording comes from the message catalog.

use crate::localization::LocalizationManager;
use crate::menu::DailyMenu;
use crate::nutrition::{NutritionEntry, NutritionReport};
use crate::rating::{ClassLabel, RatingOutcome};
use crate::similarity::SimilarRecipe;

/// Capitalize the first letter of every word, lowercasing the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Uppercase the first character and lowercase the remainder
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn forecast_key(outcome: &RatingOutcome) -> Option<&'static str> {
    match outcome {
        RatingOutcome::Unknown => Some("forecast-unknown"),
        RatingOutcome::Error(_) => None,
        RatingOutcome::Class(label) => match label {
            ClassLabel::Code(0) => Some("forecast-bad"),
            ClassLabel::Code(1) => Some("forecast-so-so"),
            ClassLabel::Code(2) => Some("forecast-great"),
            ClassLabel::Name(name) => match name.as_str() {
                "bad" => Some("forecast-bad"),
                "so-so" => Some("forecast-so-so"),
                "great" => Some("forecast-great"),
                _ => None,
            },
            ClassLabel::Code(_) => None,
        },
    }
}

pub fn render_forecast(l10n: &LocalizationManager, outcome: &RatingOutcome) -> String {
    let body = match forecast_key(outcome) {
        Some(key) => l10n.t(key),
        None => l10n.t_args("forecast-error", &[("label", &outcome.to_string())]),
    };
    format!("{}\n{}", l10n.t("forecast-header"), body)
}

pub fn render_nutrition(l10n: &LocalizationManager, report: &NutritionReport) -> String {
    let mut blocks = Vec::new();

    for (ingredient, entry) in report {
        let mut lines = vec![capitalize(ingredient)];
        match entry {
            NutritionEntry::Facts(facts) => {
                let details: Vec<String> = facts
                    .iter()
                    .filter(|(_, percent)| **percent > 0.0)
                    .map(|(nutrient, percent)| {
                        l10n.t_args(
                            "nutrient-line",
                            &[
                                ("nutrient", &title_case(nutrient)),
                                ("percent", &format!("{percent:.1}")),
                            ],
                        )
                    })
                    .collect();
                if details.is_empty() {
                    lines.push(l10n.t("nutrient-none"));
                } else {
                    lines.extend(details);
                }
            }
            NutritionEntry::Unavailable { error } => {
                lines.push(l10n.t_args("nutrient-error", &[("error", error)]));
            }
        }
        blocks.push(lines.join("\n"));
    }

    let separator = format!("\n{}\n", l10n.t("nutrition-separator"));
    format!("{}\n{}", l10n.t("nutrition-header"), blocks.join(&separator))
}

pub fn render_similar(l10n: &LocalizationManager, recipes: &[SimilarRecipe], requested: usize) -> String {
    let mut lines = vec![l10n.t_args("similar-header", &[("count", &requested.to_string())])];

    if recipes.is_empty() {
        lines.push(l10n.t("similar-none"));
    }
    for recipe in recipes {
        lines.push(l10n.t_args(
            "similar-line",
            &[("title", &recipe.title), ("rating", &recipe.rating)],
        ));
        lines.push(l10n.t_args("similar-url", &[("url", &recipe.url)]));
    }

    lines.join("\n")
}

pub fn render_menu(l10n: &LocalizationManager, menu: &Result<DailyMenu, String>) -> String {
    let menu = match menu {
        Ok(menu) => menu,
        Err(error) => return l10n.t_args("menu-error", &[("error", error)]),
    };

    let mut lines = Vec::new();
    for (meal, item) in menu {
        lines.push(meal.to_uppercase());
        lines.push("---------------------".to_string());

        match item {
            Ok(item) => {
                lines.push(l10n.t_args(
                    "menu-title",
                    &[("title", &item.title), ("rating", &item.rating)],
                ));
                lines.push(l10n.t("menu-ingredients"));
                for ingredient in &item.ingredients {
                    lines.push(l10n.t_args("menu-ingredient", &[("ingredient", ingredient)]));
                }
                lines.push(l10n.t("menu-nutrients"));
                for (ingredient, entry) in &item.nutrients {
                    lines.push(l10n.t_args(
                        "menu-nutrient-ingredient",
                        &[("ingredient", &capitalize(ingredient))],
                    ));
                    match entry {
                        NutritionEntry::Facts(facts) => {
                            let before = lines.len();
                            for (nutrient, percent) in facts.iter().filter(|(_, p)| **p > 0.0) {
                                lines.push(l10n.t_args(
                                    "menu-nutrient-line",
                                    &[
                                        ("nutrient", &title_case(nutrient)),
                                        ("percent", &format!("{percent:.1}")),
                                    ],
                                ));
                            }
                            if lines.len() == before {
                                lines.push(l10n.t("menu-no-nutrients"));
                            }
                        }
                        NutritionEntry::Unavailable { error } => {
                            lines.push(l10n.t_args("menu-nutrient-error", &[("error", error)]));
                        }
                    }
                }
                lines.push(l10n.t_args("menu-url", &[("url", &item.url)]));
            }
            Err(error) => {
                lines.push(l10n.t_args("menu-meal-error", &[("meal", meal), ("error", error)]));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
