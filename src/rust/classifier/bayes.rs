use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use log::debug;

use super::error::ClassifierError;
use super::utils::{normalize_log_scores, tokenize};
use super::TextClassifier;

/// A multinomial naive Bayes text classifier with add-one smoothing.
///
/// All state lives in ordered maps, so both serialized forms are byte-stable
/// for a given training history.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use textcat::{BayesClassifier, TextClassifier};
///
/// let mut classifier = BayesClassifier::new();
/// classifier.train("what a great movie", "positive")?;
/// classifier.train("awful plot and terrible acting", "negative")?;
///
/// assert_eq!(classifier.classify_category("a great plot")?, "positive");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BayesClassifier {
    /// Documents seen per category
    doc_counts: BTreeMap<String, u64>,
    /// Tokens seen per category
    token_counts: BTreeMap<String, u64>,
    /// Token frequencies per category
    frequencies: BTreeMap<String, BTreeMap<String, u64>>,
    vocabulary: BTreeSet<String>,
    total_documents: u64,
}

impl BayesClassifier {
    pub const MODEL_TYPE: &'static str = "bayes";

    /// Creates an untrained classifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Unnormalized log-probability of `tokens` under each category
    fn log_scores(&self, tokens: &[String]) -> BTreeMap<String, f64> {
        let vocabulary_size = self.vocabulary.len() as f64;
        let total_documents = self.total_documents as f64;

        self.doc_counts
            .iter()
            .map(|(category, &docs)| {
                let prior = (docs as f64 / total_documents).ln();
                let token_total = self.token_counts.get(category).copied().unwrap_or(0) as f64;
                let frequencies = self.frequencies.get(category);
                let denominator = token_total + vocabulary_size;

                // Nothing tokenized during training: only the prior carries information.
                if denominator == 0.0 {
                    return (category.clone(), prior);
                }

                let likelihood: f64 = tokens
                    .iter()
                    .map(|token| {
                        let count = frequencies
                            .and_then(|f| f.get(token))
                            .copied()
                            .unwrap_or(0) as f64;
                        ((count + 1.0) / denominator).ln()
                    })
                    .sum();

                (category.clone(), prior + likelihood)
            })
            .collect()
    }
}

impl TextClassifier for BayesClassifier {
    fn train(&mut self, text: &str, category: &str) -> Result<(), ClassifierError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ClassifierError::ValidationError("Category cannot be empty".into()));
        }

        let tokens = tokenize(text);
        debug!("Training '{}' with {} tokens", category, tokens.len());

        *self.doc_counts.entry(category.to_string()).or_insert(0) += 1;
        *self.token_counts.entry(category.to_string()).or_insert(0) += tokens.len() as u64;
        let frequencies = self.frequencies.entry(category.to_string()).or_default();
        for token in tokens {
            *frequencies.entry(token.clone()).or_insert(0) += 1;
            self.vocabulary.insert(token);
        }
        self.total_documents += 1;
        Ok(())
    }

    fn classify(&self, text: &str) -> Result<BTreeMap<String, f64>, ClassifierError> {
        if self.doc_counts.is_empty() {
            return Err(ClassifierError::Untrained);
        }
        let tokens = tokenize(text);
        Ok(normalize_log_scores(&self.log_scores(&tokens)))
    }

    fn classify_category(&self, text: &str) -> Result<String, ClassifierError> {
        let scores = self.classify(text)?;

        // Strict comparison keeps the lexicographically first category on ties.
        let mut best: Option<(&String, f64)> = None;
        for (category, &score) in &scores {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((category, score)),
            }
        }

        best.map(|(category, _)| category.clone())
            .ok_or(ClassifierError::Untrained)
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn total_documents(&self) -> u64 {
        self.total_documents
    }

    fn categories(&self) -> Vec<String> {
        self.doc_counts.keys().cloned().collect()
    }

    fn model_type(&self) -> &'static str {
        Self::MODEL_TYPE
    }

    fn to_bytes(&self) -> Result<Vec<u8>, ClassifierError> {
        bincode::serialize(self).map_err(|e| ClassifierError::SerializationError(e.to_string()))
    }

    fn to_json(&self) -> Result<String, ClassifierError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError> {
        bincode::deserialize(bytes).map_err(|e| ClassifierError::DeserializationError(e.to_string()))
    }

    fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json).map_err(|e| ClassifierError::DeserializationError(e.to_string()))
    }
}
