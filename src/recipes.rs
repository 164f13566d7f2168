//! # Recipe Corpus
//!
//! Reference recipes with a feature vector per recipe, column-aligned with the
//! model's feature set. The corpus is a delimited file with `title`, `rating`,
//! `url`, an optional `meal_type`, and one numeric column per feature. When the
//! plain file is absent a gzip-compressed `<path>.gz` sibling is read instead.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use flate2::read::GzDecoder;
use tracing::info;

use crate::daily_values::{column_index, delimited_reader};
use crate::feature_vector::{FeatureSet, FeatureVector};

pub const NOT_AVAILABLE: &str = "N/A";

/// One reference recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub title: String,
    pub rating: String,
    pub url: String,
    pub meal_type: Option<String>,
    pub features: FeatureVector,
}

impl Recipe {
    /// Canonical names of the ingredients this recipe uses, in feature order
    pub fn ingredient_names<'a>(&self, features: &'a FeatureSet) -> Vec<&'a str> {
        features
            .names()
            .iter()
            .zip(self.features.values())
            .filter(|(_, value)| **value > 0.0)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Positional, read-only collection of recipes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeCorpus {
    recipes: Vec<Recipe>,
    has_meal_types: bool,
}

impl RecipeCorpus {
    pub fn new(recipes: Vec<Recipe>, has_meal_types: bool) -> Self {
        Self {
            recipes,
            has_meal_types,
        }
    }

    /// Load from `path`, falling back to `<path>.gz`
    pub fn load(path: &Path, features: &FeatureSet) -> Result<Self> {
        let content = read_maybe_compressed(path)?;
        let corpus = Self::parse(&content, features)
            .with_context(|| format!("Failed to parse recipe corpus {}", path.display()))?;
        info!(path = %path.display(), recipes = corpus.len(), "Recipe corpus loaded");
        Ok(corpus)
    }

    pub fn parse(content: &str, features: &FeatureSet) -> Result<Self> {
        let mut reader = delimited_reader(content);
        let headers = reader.headers()?.clone();
        let title_col = column_index(&headers, "title");
        let rating_col = column_index(&headers, "rating");
        let url_col = column_index(&headers, "url");
        let meal_col = column_index(&headers, "meal_type");

        let feature_cols = features
            .names()
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| anyhow!("Missing feature column '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut recipes = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let values = feature_cols
                .iter()
                .map(|&col| {
                    let raw = record.get(col).unwrap_or("");
                    parse_cell(raw).ok_or_else(|| {
                        anyhow!(
                            "Line {}: invalid value '{}' in column '{}'",
                            line,
                            raw,
                            &headers[col]
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            recipes.push(Recipe {
                title: text_cell(&record, title_col),
                rating: text_cell(&record, rating_col),
                url: text_cell(&record, url_col),
                meal_type: meal_col
                    .and_then(|col| record.get(col))
                    .filter(|meal| !meal.is_empty())
                    .map(str::to_string),
                features: FeatureVector::from_values(values),
            });
        }

        Ok(Self::new(recipes, meal_col.is_some()))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Whether the source file carried a `meal_type` column
    pub fn has_meal_types(&self) -> bool {
        self.has_meal_types
    }
}

fn read_maybe_compressed(path: &Path) -> Result<String> {
    if path.exists() {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe corpus {}", path.display()));
    }

    let gz_path = gz_sibling(path);
    let file = File::open(&gz_path).with_context(|| {
        format!(
            "Recipe corpus not found at {} or {}",
            path.display(),
            gz_path.display()
        )
    })?;
    let mut content = String::new();
    GzDecoder::new(file)
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to decompress recipe corpus {}", gz_path.display()))?;
    Ok(content)
}

fn gz_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Feature cell as a finite number; blank and boolean cells are accepted
fn parse_cell(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(0.0);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(1.0),
        "false" => Some(0.0),
        other => other.parse::<f64>().ok().filter(|value| value.is_finite()),
    }
}

fn text_cell(record: &StringRecord, col: Option<usize>) -> String {
    col.and_then(|c| record.get(c))
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    const CORPUS: &str = "title,rating,url,meal_type,milk,honey,egg\n\
        \"Milk, Honey Toast\",4.375,http://x/1,breakfast,1,1,0\n\
        Omelette,3.75,http://x/2,Breakfast,0,0,1.0\n\
        ,,,,True,false,\n";

    fn features() -> FeatureSet {
        FeatureSet::new(vec!["milk".into(), "honey".into(), "egg".into()])
    }

    #[test]
    fn test_parse_corpus() {
        let corpus = RecipeCorpus::parse(CORPUS, &features()).unwrap();

        assert_eq!(corpus.len(), 3);
        assert!(corpus.has_meal_types());

        let toast = corpus.get(0).unwrap();
        assert_eq!(toast.title, "Milk, Honey Toast");
        assert_eq!(toast.rating, "4.375");
        assert_eq!(toast.features.values(), &[1.0, 1.0, 0.0]);
        assert_eq!(toast.ingredient_names(&features()), vec!["milk", "honey"]);

        let blank = corpus.get(2).unwrap();
        assert_eq!(blank.title, NOT_AVAILABLE);
        assert_eq!(blank.url, NOT_AVAILABLE);
        assert_eq!(blank.meal_type, None);
        assert_eq!(blank.features.values(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_feature_columns_follow_feature_order() {
        let content = "egg,title,milk,honey,rating,url\n1,Boiled egg,0,0,3,http://x\n";
        let corpus = RecipeCorpus::parse(content, &features()).unwrap();

        assert_eq!(corpus.get(0).unwrap().features.values(), &[0.0, 0.0, 1.0]);
        assert!(!corpus.has_meal_types());
    }

    #[test]
    fn test_missing_feature_column_is_error() {
        let content = "title,rating,url,milk,honey\nA,1,u,1,0\n";
        let err = RecipeCorpus::parse(content, &features()).unwrap_err();
        assert!(err.to_string().contains("egg"));
    }

    #[test]
    fn test_invalid_cell_is_error() {
        let content = "title,rating,url,milk,honey,egg\nA,1,u,yes,0,0\n";
        assert!(RecipeCorpus::parse(content, &features()).is_err());
    }

    #[test]
    fn test_non_finite_cell_is_error() {
        for bad in ["nan", "inf", "-Infinity"] {
            let content = format!("title,rating,url,milk,honey,egg\nBroken,1,u,{bad},0,0\n");
            let err = RecipeCorpus::parse(&content, &features()).unwrap_err();
            assert!(err.to_string().contains("'milk'"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_quoted_fields_and_crlf() {
        let content = "title,rating,url,milk,honey,egg\r\n\
            \"Say \"\"cheese\"\"\",3,http://b,0,0,1\r\n\
            \r\n\
            \"Two\nlines\",4,http://c,1,0,0\r\n";
        let corpus = RecipeCorpus::parse(content, &features()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().title, "Say \"cheese\"");
        assert_eq!(corpus.get(1).unwrap().title, "Two\nlines");
        assert_eq!(corpus.get(1).unwrap().url, "http://c");
    }

    #[test]
    fn test_short_rows_read_as_blank() {
        let content = "title,rating,url,milk,honey,egg\nShort,2,http://s,1\n";
        let recipe = RecipeCorpus::parse(content, &features()).unwrap().recipes()[0].clone();
        assert_eq!(recipe.features.values(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tab_delimited_corpus() {
        let content = "title\trating\turl\tmilk\thoney\tegg\nMilk, warm\t4\thttp://w\t1\t0\t0\n";
        let corpus = RecipeCorpus::parse(content, &features()).unwrap();
        assert_eq!(corpus.get(0).unwrap().title, "Milk, warm");
    }

    #[test]
    fn test_gzip_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.csv");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CORPUS.as_bytes()).unwrap();
        fs::write(gz_sibling(&path), encoder.finish().unwrap()).unwrap();

        let corpus = RecipeCorpus::load(&path, &features()).unwrap();
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_missing_corpus_is_error() {
        let dir = TempDir::new().unwrap();
        let err = RecipeCorpus::load(&dir.path().join("none.csv"), &features()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
