//! # Unit Converter
//!
//! Normalizes nutrient amounts reported in grams, milligrams or micrograms
//! onto the scale of the daily value table.
//!
//! This is an approximation, not a unit system. The daily value table carries
//! no unit metadata, so the display unit of each nutrient is inferred from the
//! magnitude of its reference value:
//!
//! - daily value above 100: the nutrient is tracked in grams
//! - daily value above 10 (micrograms only): tracked in milligrams
//! - otherwise the reported unit is kept
//!
//! The thresholds 100 and 10 reproduce existing output and must not be tuned
//! without revisiting every percent-daily-value figure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::daily_values::DailyValueTable;

const GRAM_SCALE_THRESHOLD: f64 = 100.0;
const MILLIGRAM_SCALE_THRESHOLD: f64 = 10.0;

/// Unit tag as reported by the nutrition provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientUnit {
    G,
    Mg,
    Ug,
    Other(String),
}

impl NutrientUnit {
    /// Parse a provider unit name (`"G"`, `"MG"`, `"UG"`, `"KCAL"`, ...)
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_uppercase().as_str() {
            "G" => NutrientUnit::G,
            "MG" => NutrientUnit::Mg,
            "UG" | "µG" | "MCG" => NutrientUnit::Ug,
            _ => NutrientUnit::Other(unit.trim().to_string()),
        }
    }
}

impl fmt::Display for NutrientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientUnit::G => write!(f, "G"),
            NutrientUnit::Mg => write!(f, "MG"),
            NutrientUnit::Ug => write!(f, "UG"),
            NutrientUnit::Other(unit) => write!(f, "{unit}"),
        }
    }
}

/// Convert `value` to the scale the daily value of `nutrient` is expressed in
pub fn convert(value: f64, unit: &NutrientUnit, nutrient: &str, daily: &DailyValueTable) -> f64 {
    let reference = daily.get(nutrient);

    match unit {
        NutrientUnit::G => value,
        NutrientUnit::Mg => match reference {
            Some(dv) if dv > GRAM_SCALE_THRESHOLD => value / 1_000.0,
            _ => value,
        },
        NutrientUnit::Ug => match reference {
            Some(dv) if dv > GRAM_SCALE_THRESHOLD => value / 1_000_000.0,
            Some(dv) if dv > MILLIGRAM_SCALE_THRESHOLD => value / 1_000.0,
            _ => value,
        },
        NutrientUnit::Other(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily() -> DailyValueTable {
        [
            ("Sodium, Na", 2000.0),
            ("Protein", 50.0),
            ("Vitamin A, RAE", 900.0),
            ("Selenium, Se", 55.0),
            ("Vitamin D (D2 + D3)", 20.0),
            ("Vitamin B-12", 2.4),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_grams_pass_through() {
        let daily = daily();
        assert_eq!(convert(5.0, &NutrientUnit::G, "Protein", &daily), 5.0);
        assert_eq!(convert(5.0, &NutrientUnit::G, "Unlisted", &daily), 5.0);
    }

    #[test]
    fn test_milligrams() {
        let daily = daily();
        assert_eq!(convert(500.0, &NutrientUnit::Mg, "Sodium, Na", &daily), 0.5);
        assert_eq!(convert(500.0, &NutrientUnit::Mg, "Protein", &daily), 500.0);
        assert_eq!(convert(500.0, &NutrientUnit::Mg, "Unlisted", &daily), 500.0);
    }

    #[test]
    fn test_micrograms() {
        let daily = daily();
        assert_eq!(
            convert(900_000.0, &NutrientUnit::Ug, "Vitamin A, RAE", &daily),
            0.9
        );
        assert_eq!(convert(55.0, &NutrientUnit::Ug, "Selenium, Se", &daily), 0.055);
        assert_eq!(convert(55.0, &NutrientUnit::Ug, "Vitamin D (D2 + D3)", &daily), 0.055);
        assert_eq!(convert(2.4, &NutrientUnit::Ug, "Vitamin B-12", &daily), 2.4);
        assert_eq!(convert(7.0, &NutrientUnit::Ug, "Unlisted", &daily), 7.0);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let daily: DailyValueTable = [("At100", 100.0), ("At10", 10.0)].into_iter().collect();
        assert_eq!(convert(500.0, &NutrientUnit::Mg, "At100", &daily), 500.0);
        assert_eq!(convert(500.0, &NutrientUnit::Ug, "At100", &daily), 0.5);
        assert_eq!(convert(500.0, &NutrientUnit::Ug, "At10", &daily), 500.0);
    }

    #[test]
    fn test_other_units_pass_through() {
        let daily = daily();
        let kcal = NutrientUnit::parse("KCAL");
        assert_eq!(kcal, NutrientUnit::Other("KCAL".into()));
        assert_eq!(convert(52.0, &kcal, "Sodium, Na", &daily), 52.0);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(NutrientUnit::parse("g"), NutrientUnit::G);
        assert_eq!(NutrientUnit::parse("MG"), NutrientUnit::Mg);
        assert_eq!(NutrientUnit::parse("UG"), NutrientUnit::Ug);
        assert_eq!(NutrientUnit::parse("IU").to_string(), "IU");
    }
}
