//! # Feature Vectorizer
//!
//! Converts a list of free-text ingredient names into a binary membership
//! vector aligned to the model's feature set. The same column order is used by
//! the recipe corpus, which is what makes cosine similarity meaningful.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::synonyms::SynonymTable;

/// Ordered canonical ingredient names defining vector layout
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    names: Arc<[String]>,
    positions: HashMap<String, usize>,
}

impl FeatureSet {
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names: names.into(),
            positions,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of a canonical name
    pub fn position(&self, canonical: &str) -> Option<usize> {
        self.positions.get(canonical).copied()
    }
}

/// Binary presence vector, one cell per feature
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn mark(&mut self, index: usize) {
        self.values[index] = 1.0;
    }
}

/// Outcome of vectorizing one ingredient list
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorization {
    /// `None` when no ingredient resolved
    pub vector: Option<FeatureVector>,
    /// Canonical names that were set, in input order
    pub resolved: Vec<String>,
    /// Input names that matched no feature
    pub unresolved: Vec<String>,
}

/// Builds feature vectors from ingredient names
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    features: FeatureSet,
    synonyms: SynonymTable,
}

impl FeatureVectorizer {
    pub fn new(features: FeatureSet) -> Self {
        let synonyms = SynonymTable::build(features.names());
        Self { features, synonyms }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Vectorize, returning `None` when no ingredient is recognized
    pub fn vectorize<S: AsRef<str>>(&self, ingredients: &[S]) -> Option<FeatureVector> {
        self.vectorize_detailed(ingredients).vector
    }

    /// Vectorize and report which inputs resolved.
    ///
    /// Each unresolved ingredient is logged as a warning and skipped.
    pub fn vectorize_detailed<S: AsRef<str>>(&self, ingredients: &[S]) -> Vectorization {
        let mut vector = FeatureVector::zeros(self.features.len());
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();

        for ingredient in ingredients {
            let ingredient = ingredient.as_ref();
            let column = self
                .synonyms
                .resolve(ingredient)
                .and_then(|canonical| Some((canonical, self.features.position(canonical)?)));

            match column {
                Some((canonical, index)) => {
                    debug!(ingredient, canonical, index, "Resolved ingredient");
                    vector.mark(index);
                    resolved.push(canonical.to_string());
                }
                None => {
                    warn!(ingredient, "Ingredient not in known features, ignoring");
                    unresolved.push(ingredient.to_string());
                }
            }
        }

        if resolved.is_empty() {
            warn!("None of the input ingredients were recognized");
            return Vectorization {
                vector: None,
                resolved,
                unresolved,
            };
        }

        Vectorization {
            vector: Some(vector),
            resolved,
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> FeatureVectorizer {
        FeatureVectorizer::new(FeatureSet::new(vec![
            "milk".to_string(),
            "honey".to_string(),
            "butter/margarine".to_string(),
            "egg".to_string(),
        ]))
    }

    #[test]
    fn test_vector_length_matches_feature_set() {
        let vectorizer = vectorizer();
        let vector = vectorizer.vectorize(&["milk"]).unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(vector.values(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_input_is_none() {
        let vectorizer = vectorizer();
        let empty: [&str; 0] = [];
        assert_eq!(vectorizer.vectorize(&empty), None);
    }

    #[test]
    fn test_all_unknown_is_none() {
        let vectorizer = vectorizer();
        let outcome = vectorizer.vectorize_detailed(&["jam", "caviar"]);
        assert_eq!(outcome.vector, None);
        assert_eq!(outcome.unresolved, vec!["jam", "caviar"]);
    }

    #[test]
    fn test_synonyms_mark_canonical_column() {
        let vectorizer = vectorizer();
        let vector = vectorizer.vectorize(&["Margarine", " EGG "]).unwrap();
        assert_eq!(vector.values(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_order_insensitive() {
        let vectorizer = vectorizer();
        let a = vectorizer.vectorize(&["milk", "egg", "jam", "butter"]);
        let b = vectorizer.vectorize(&["butter", "jam", "egg", "milk"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicates_stay_binary() {
        let vectorizer = vectorizer();
        let vector = vectorizer.vectorize(&["milk", "MILK", "milk"]).unwrap();
        assert_eq!(vector.values(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_partial_recognition_reports_unresolved() {
        let vectorizer = vectorizer();
        let outcome = vectorizer.vectorize_detailed(&["milk", "honey", "jam"]);

        assert_eq!(outcome.resolved, vec!["milk", "honey"]);
        assert_eq!(outcome.unresolved, vec!["jam"]);
        assert_eq!(outcome.vector.unwrap().values(), &[1.0, 1.0, 0.0, 0.0]);
    }
}
