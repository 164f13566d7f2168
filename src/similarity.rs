//! # Similarity Engine
//!
//! Ranks corpus recipes by cosine similarity to a query feature vector.

use serde::Serialize;
use tracing::debug;

use crate::feature_vector::FeatureVector;
use crate::recipes::RecipeCorpus;

/// A ranked recipe match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarRecipe {
    pub title: String,
    pub rating: String,
    pub url: String,
    pub similarity: f64,
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Similarity of the query against every recipe, in corpus order
pub fn similarities(query: &FeatureVector, corpus: &RecipeCorpus) -> Vec<f64> {
    corpus
        .recipes()
        .iter()
        .map(|recipe| cosine_similarity(query.values(), recipe.features.values()))
        .collect()
}

/// NaN ranks below every real score
fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// The `n` most similar recipes, best first.
///
/// Equal scores keep corpus order. A `None` query yields no matches. The
/// query is not deduplicated against an identical stored recipe.
pub fn top_n(query: Option<&FeatureVector>, corpus: &RecipeCorpus, n: usize) -> Vec<SimilarRecipe> {
    let Some(query) = query else {
        return Vec::new();
    };

    let scores = similarities(query, corpus);
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable, so ties stay in corpus order
    order.sort_by(|&a, &b| rank_key(scores[b]).total_cmp(&rank_key(scores[a])));

    let matches: Vec<SimilarRecipe> = order
        .into_iter()
        .take(n)
        .filter_map(|i| {
            let recipe = corpus.get(i)?;
            Some(SimilarRecipe {
                title: recipe.title.clone(),
                rating: recipe.rating.clone(),
                url: recipe.url.clone(),
                similarity: scores[i],
            })
        })
        .collect();

    debug!(requested = n, returned = matches.len(), "Similar recipes ranked");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::Recipe;

    fn recipe(title: &str, values: &[f64]) -> Recipe {
        Recipe {
            title: title.to_string(),
            rating: "4.0".to_string(),
            url: format!("http://recipes/{title}"),
            meal_type: None,
            features: FeatureVector::from_values(values.to_vec()),
        }
    }

    fn corpus() -> RecipeCorpus {
        RecipeCorpus::new(
            vec![
                recipe("eggs", &[0.0, 0.0, 1.0]),
                recipe("milk-honey", &[1.0, 1.0, 0.0]),
                recipe("milk", &[1.0, 0.0, 0.0]),
                recipe("milk-again", &[1.0, 0.0, 0.0]),
                recipe("empty", &[0.0, 0.0, 0.0]),
            ],
            false,
        )
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        let half = cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]);
        assert!((half - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_ranking_and_ties() {
        let query = FeatureVector::from_values(vec![1.0, 0.0, 0.0]);
        let matches = top_n(Some(&query), &corpus(), 3);

        let titles: Vec<_> = matches.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["milk", "milk-again", "milk-honey"]);
        assert_eq!(matches[0].similarity, 1.0);
    }

    #[test]
    fn test_nan_score_ranks_last() {
        let corpus = RecipeCorpus::new(
            vec![
                recipe("broken", &[f64::NAN, 0.0, 0.0]),
                recipe("eggs", &[0.0, 0.0, 1.0]),
                recipe("milk", &[1.0, 0.0, 0.0]),
            ],
            false,
        );
        let query = FeatureVector::from_values(vec![1.0, 0.0, 0.0]);
        let matches = top_n(Some(&query), &corpus, 3);

        let titles: Vec<_> = matches.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["milk", "eggs", "broken"]);
        assert!(matches[2].similarity.is_nan());
    }

    #[test]
    fn test_exact_match_is_not_excluded() {
        let query = FeatureVector::from_values(vec![1.0, 1.0, 0.0]);
        let matches = top_n(Some(&query), &corpus(), 1);
        assert_eq!(matches[0].title, "milk-honey");
    }

    #[test]
    fn test_fewer_recipes_than_requested() {
        let corpus = RecipeCorpus::new(vec![recipe("only", &[1.0, 0.0, 0.0])], false);
        let query = FeatureVector::from_values(vec![0.0, 1.0, 0.0]);
        assert_eq!(top_n(Some(&query), &corpus, 3).len(), 1);
    }

    #[test]
    fn test_none_query_is_empty() {
        for n in [0, 1, 3, 100] {
            assert!(top_n(None, &corpus(), n).is_empty());
        }
    }

    #[test]
    fn test_zero_n() {
        let query = FeatureVector::from_values(vec![1.0, 0.0, 0.0]);
        assert!(top_n(Some(&query), &corpus(), 0).is_empty());
    }
}
