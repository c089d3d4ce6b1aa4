use std::collections::{BTreeMap, HashMap};
use std::fmt;
use ndarray::{Array2, Axis};
use log::{info, warn};

use crate::classifier::TextClassifier;
use crate::dataset::Dataset;
use crate::error::HarnessError;

/// Actual-category by predicted-category count table.
///
/// Counts live in a dense matrix indexed through a category table built once
/// from the observed labels. Lookups for categories that never occurred
/// return zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    /// Every category seen as an actual label or a prediction
    labels: Vec<String>,
    index: HashMap<String, usize>,
    /// Categories seen as actual labels, in first-seen order
    actual: Vec<String>,
    counts: Array2<u64>,
}

impl ConfusionMatrix {
    /// Builds the matrix from `(actual, predicted)` pairs
    pub fn from_pairs<A, P>(pairs: &[(A, P)]) -> Self
    where
        A: AsRef<str>,
        P: AsRef<str>,
    {
        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut actual: Vec<String> = Vec::new();

        let mut intern = |label: &str, labels: &mut Vec<String>| -> usize {
            if let Some(&i) = index.get(label) {
                return i;
            }
            labels.push(label.to_string());
            index.insert(label.to_string(), labels.len() - 1);
            labels.len() - 1
        };

        // Actual labels first so rows come out in test-set order.
        let mut cells = Vec::with_capacity(pairs.len());
        for (a, _) in pairs {
            let before = labels.len();
            let row = intern(a.as_ref(), &mut labels);
            if row == before {
                actual.push(a.as_ref().to_string());
            }
        }
        for (a, p) in pairs {
            let row = intern(a.as_ref(), &mut labels);
            let col = intern(p.as_ref(), &mut labels);
            cells.push((row, col));
        }

        let mut counts = Array2::<u64>::zeros((labels.len(), labels.len()));
        for (row, col) in cells {
            counts[[row, col]] += 1;
        }

        Self {
            labels,
            index,
            actual,
            counts,
        }
    }

    /// Count of examples labeled `actual` that were predicted as `predicted`
    pub fn get(&self, actual: &str, predicted: &str) -> u64 {
        match (self.index.get(actual), self.index.get(predicted)) {
            (Some(&row), Some(&col)) => self.counts[[row, col]],
            _ => 0,
        }
    }

    /// Row keys: categories that occur as actual labels
    pub fn actual_categories(&self) -> &[String] {
        &self.actual
    }

    /// Every category that occurs as an actual label or a prediction
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Total number of recorded predictions
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Number of predictions that matched the actual label
    pub fn correct(&self) -> u64 {
        self.counts.diag().sum()
    }

    /// Fraction of correct predictions; an empty matrix has no accuracy
    pub fn accuracy(&self) -> Result<f64, HarnessError> {
        let total = self.total();
        if total == 0 {
            return Err(HarnessError::EmptyTestSet);
        }
        Ok(self.correct() as f64 / total as f64)
    }

    /// Precision, recall and F1 for one category
    pub fn category_metrics(&self, category: &str) -> CategoryMetrics {
        let Some(&i) = self.index.get(category) else {
            return CategoryMetrics::default();
        };

        let tp = self.counts[[i, i]];
        let fp = self.counts.index_axis(Axis(1), i).sum() - tp;
        let fn_ = self.counts.index_axis(Axis(0), i).sum() - tp;

        CategoryMetrics::from_counts(tp, fp, fn_)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|label| label.chars().count())
            .chain(std::iter::once(6))
            .max()
            .unwrap_or(6);

        write!(f, "{:width$}", "", width = width)?;
        for label in &self.labels {
            write!(f, " {:>width$}", label, width = width)?;
        }
        writeln!(f)?;

        for actual in &self.actual {
            write!(f, "{:width$}", actual, width = width)?;
            for predicted in &self.labels {
                write!(f, " {:>width$}", self.get(actual, predicted), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-category quality scores, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl CategoryMetrics {
    /// Derives the scores from true positive, false positive and false
    /// negative counts. A zero denominator yields 0.0 for that score.
    pub fn from_counts(tp: u64, fp: u64, fn_: u64) -> Self {
        let precision = ratio(tp as f64, (tp + fp) as f64);
        let recall = ratio(tp as f64, (tp + fn_) as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        Self {
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Everything the evaluator measured on the held-out partition
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matrix: ConfusionMatrix,
    pub accuracy: f64,
    /// Metrics for every category that occurs as an actual test label
    pub metrics: BTreeMap<String, CategoryMetrics>,
}

impl Evaluation {
    pub fn test_size(&self) -> u64 {
        self.matrix.total()
    }

    pub fn precision(&self) -> BTreeMap<String, f64> {
        self.project(|m| m.precision)
    }

    pub fn recall(&self) -> BTreeMap<String, f64> {
        self.project(|m| m.recall)
    }

    pub fn f1(&self) -> BTreeMap<String, f64> {
        self.project(|m| m.f1)
    }

    fn project(&self, field: impl Fn(&CategoryMetrics) -> f64) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .map(|(category, metrics)| (category.clone(), field(metrics)))
            .collect()
    }
}

/// Runs a trained classifier over the test partition and scores it
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate<C: TextClassifier>(
        classifier: &C,
        test: &Dataset,
    ) -> Result<Evaluation, HarnessError> {
        if test.is_empty() {
            return Err(HarnessError::EmptyTestSet);
        }
        info!("Evaluating on {} held-out examples...", test.len());

        let mut pairs = Vec::with_capacity(test.len());
        for example in test {
            let predicted = classifier.classify_category(&example.text)?;
            pairs.push((example.category.as_str(), predicted));
        }

        let matrix = ConfusionMatrix::from_pairs(&pairs);
        let accuracy = matrix.accuracy()?;

        let metrics: BTreeMap<String, CategoryMetrics> = matrix
            .actual_categories()
            .iter()
            .map(|category| (category.clone(), matrix.category_metrics(category)))
            .collect();

        for (category, m) in &metrics {
            if m.precision == 0.0 && m.recall == 0.0 {
                warn!("Category '{}' has no correct predictions in the test set", category);
            }
        }
        info!("Accuracy: {:.4}", accuracy);

        Ok(Evaluation {
            matrix,
            accuracy,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ConfusionMatrix {
        ConfusionMatrix::from_pairs(&[
            ("pos", "pos"),
            ("pos", "pos"),
            ("pos", "neg"),
            ("neg", "neg"),
            ("neg", "pos"),
            ("neu", "pos"),
        ])
    }

    #[test]
    fn test_counts_and_missing_cells() {
        let m = matrix();
        assert_eq!(m.get("pos", "pos"), 2);
        assert_eq!(m.get("pos", "neg"), 1);
        assert_eq!(m.get("neu", "neu"), 0);
        assert_eq!(m.get("unknown", "pos"), 0);
        assert_eq!(m.total(), 6);
        assert_eq!(m.correct(), 3);
        assert_eq!(m.actual_categories(), &["pos", "neg", "neu"]);
    }

    #[test]
    fn test_per_category_metrics() {
        let m = matrix();

        let pos = m.category_metrics("pos");
        // tp = 2, fp = 2 (neg->pos, neu->pos), fn = 1
        assert!((pos.precision - 0.5).abs() < 1e-12);
        assert!((pos.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((pos.f1 - 4.0 / 7.0).abs() < 1e-12);

        let neu = m.category_metrics("neu");
        assert_eq!(neu, CategoryMetrics { precision: 0.0, recall: 0.0, f1: 0.0 });

        assert!((m.accuracy().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_denominators_are_zero() {
        let metrics = CategoryMetrics::from_counts(0, 0, 0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
        assert!(!metrics.precision.is_nan());

        let metrics = CategoryMetrics::from_counts(0, 3, 2);
        assert_eq!(metrics, CategoryMetrics::default());
    }

    #[test]
    fn test_prediction_outside_actual_labels() {
        let m = ConfusionMatrix::from_pairs(&[("a", "zzz"), ("a", "a")]);
        assert_eq!(m.actual_categories(), &["a"]);
        assert_eq!(m.labels(), &["a", "zzz"]);
        assert_eq!(m.get("a", "zzz"), 1);
        let a = m.category_metrics("a");
        assert_eq!(a.precision, 1.0);
        assert_eq!(a.recall, 0.5);
    }

    #[test]
    fn test_empty_matrix_has_no_accuracy() {
        let pairs: [(&str, &str); 0] = [];
        let m = ConfusionMatrix::from_pairs(&pairs);
        assert_eq!(m.total(), 0);
        assert!(matches!(m.accuracy(), Err(HarnessError::EmptyTestSet)));
    }

    #[test]
    fn test_display_lists_every_row() {
        let rendered = matrix().to_string();
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.lines().nth(1).unwrap().starts_with("pos"));
    }
}
