//! # Synonym Resolver
//!
//! Maps free-text ingredient names onto the canonical feature names known to
//! the rating model. Canonical names such as `"butter/margarine"` or
//! `"cream or half-and-half"` are reachable from any of their parts.

use std::collections::HashMap;

const SLASH_SEPARATOR: char = '/';
const OR_SEPARATOR: &str = " or ";

/// Lookup table from lowercase variant to canonical feature name
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    synonyms: HashMap<String, String>,
}

impl SynonymTable {
    /// Build the table from the model's canonical feature names.
    ///
    /// Every `/`-separated and `" or "`-separated part is registered, then the
    /// full lowercased name itself. Later registrations overwrite earlier ones.
    pub fn build<S: AsRef<str>>(canonical_names: &[S]) -> Self {
        let mut synonyms = HashMap::new();

        for canonical in canonical_names {
            let canonical = canonical.as_ref();

            if canonical.contains(SLASH_SEPARATOR) {
                for part in canonical.split(SLASH_SEPARATOR) {
                    synonyms.insert(normalize(part), canonical.to_string());
                }
            }
            if canonical.contains(OR_SEPARATOR) {
                for part in canonical.split(OR_SEPARATOR) {
                    synonyms.insert(normalize(part), canonical.to_string());
                }
            }
            synonyms.insert(canonical.to_lowercase(), canonical.to_string());
        }

        Self { synonyms }
    }

    /// Resolve a free-text name to its canonical feature name
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.synonyms.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

/// Lowercase and trim an ingredient name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
