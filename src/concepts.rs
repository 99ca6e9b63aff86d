//! Concept weight table
//!
//! Side-menu clicks name a pedagogical concept. Each concept carries an integer
//! weight reflecting how advanced it is; the complexity score of a session is
//! the sum of the weights of every concept the learner opened.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Variables
pub const CONCEPT_VARIABLES: &str = "Değişkenler";
/// Data types
pub const CONCEPT_DATA_TYPES: &str = "Veri Tipleri";
/// Operators
pub const CONCEPT_OPERATORS: &str = "Operatörler";
/// Conditional and logical expressions (the double spaces are in the logged label)
pub const CONCEPT_CONDITIONALS: &str = "Koşullu ve  Mantıksal  İfadeler";
/// Loops
pub const CONCEPT_LOOPS: &str = "Döngüler";

/// Immutable label -> weight mapping
///
/// Unknown labels weigh 0. The table is shared by reference across worker
/// threads; nothing mutates it once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptWeights(BTreeMap<String, u32>);

impl Default for ConceptWeights {
    fn default() -> Self {
        Self::standard().clone()
    }
}

impl ConceptWeights {
    /// The built-in curriculum table
    pub fn standard() -> &'static ConceptWeights {
        static STANDARD: OnceLock<ConceptWeights> = OnceLock::new();
        STANDARD.get_or_init(|| {
            ConceptWeights::from_pairs([
                (CONCEPT_VARIABLES, 1),
                (CONCEPT_DATA_TYPES, 2),
                (CONCEPT_OPERATORS, 3),
                (CONCEPT_CONDITIONALS, 4),
                (CONCEPT_LOOPS, 5),
            ])
        })
    }

    /// Build a table from label/weight pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        ConceptWeights(
            pairs
                .into_iter()
                .map(|(label, weight)| (label.into(), weight))
                .collect(),
        )
    }

    /// Weight of a concept label; 0 when unknown
    pub fn weight(&self, label: &str) -> u32 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels and weights in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(label, weight)| (label.as_str(), *weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_weights() {
        let weights = ConceptWeights::standard();
        assert_eq!(weights.len(), 5);
        assert_eq!(weights.weight(CONCEPT_VARIABLES), 1);
        assert_eq!(weights.weight(CONCEPT_DATA_TYPES), 2);
        assert_eq!(weights.weight(CONCEPT_OPERATORS), 3);
        assert_eq!(weights.weight(CONCEPT_CONDITIONALS), 4);
        assert_eq!(weights.weight(CONCEPT_LOOPS), 5);
    }

    #[test]
    fn test_unknown_label_weighs_zero() {
        let weights = ConceptWeights::standard();
        assert_eq!(weights.weight("Fonksiyonlar"), 0);
        // Single-spaced variant is a different label
        assert_eq!(weights.weight("Koşullu ve Mantıksal İfadeler"), 0);
    }

    #[test]
    fn test_custom_table_deserializes_from_map() {
        let weights: ConceptWeights =
            serde_json::from_str(r#"{"Fonksiyonlar": 6, "Döngüler": 5}"#).unwrap();
        assert_eq!(weights.weight("Fonksiyonlar"), 6);
        assert_eq!(weights.weight(CONCEPT_VARIABLES), 0);
    }

    #[test]
    fn test_default_matches_standard() {
        assert_eq!(&ConceptWeights::default(), ConceptWeights::standard());
    }
}
