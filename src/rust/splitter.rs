use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use log::debug;

use crate::dataset::Dataset;
use crate::error::HarnessError;

/// Training and held-out partitions of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffles a dataset and cuts it into train and test partitions.
///
/// The first `floor(train_fraction * n)` shuffled examples go to training and
/// the rest are held out. The shuffle is the only randomized step of a run, so
/// seeding it makes the whole pipeline reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter {
    train_fraction: f64,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            train_fraction: Self::DEFAULT_TRAIN_FRACTION,
        }
    }
}

impl Splitter {
    pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

    /// Creates a splitter; `train_fraction` must be a finite value in [0, 1]
    pub fn new(train_fraction: f64) -> Result<Self, HarnessError> {
        if !train_fraction.is_finite() || !(0.0..=1.0).contains(&train_fraction) {
            return Err(HarnessError::InvalidConfig(format!(
                "train fraction must be within [0, 1], got {}",
                train_fraction
            )));
        }
        Ok(Self { train_fraction })
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    /// Fraction of the dataset held out for testing
    pub fn test_fraction(&self) -> f64 {
        1.0 - self.train_fraction
    }

    /// Number of training examples for a dataset of `total` examples
    pub fn train_size(&self, total: usize) -> usize {
        ((total as f64 * self.train_fraction).floor() as usize).min(total)
    }

    /// Shuffles with the given random source, then splits
    pub fn split<R: Rng + ?Sized>(&self, dataset: Dataset, rng: &mut R) -> Split {
        let mut examples = dataset.into_examples();
        examples.shuffle(rng);

        let cut = self.train_size(examples.len());
        let test = examples.split_off(cut);

        debug!("Dataset split: {} training, {} test", examples.len(), test.len());

        Split {
            train: Dataset::new(examples),
            test: Dataset::new(test),
        }
    }

    /// Splits with a `StdRng` seeded from `seed`; equal seeds give equal splits
    pub fn split_seeded(&self, dataset: Dataset, seed: u64) -> Split {
        let mut rng = StdRng::seed_from_u64(seed);
        self.split(dataset, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LabeledExample;

    fn numbered(count: usize) -> Dataset {
        (0..count)
            .map(|i| LabeledExample::new(format!("text {}", i), format!("cat{}", i % 3)))
            .collect()
    }

    fn sorted(dataset: &Dataset) -> Vec<String> {
        let mut texts: Vec<String> = dataset.iter().map(|e| e.text.clone()).collect();
        texts.sort();
        texts
    }

    #[test]
    fn test_default_split_sizes() {
        let split = Splitter::default().split_seeded(numbered(10), 7);
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);

        let split = Splitter::default().split_seeded(numbered(7), 7);
        // floor(0.8 * 7) = 5
        assert_eq!(split.train.len(), 5);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn test_partitions_cover_dataset() {
        for total in [0, 1, 2, 5, 13, 100] {
            for fraction in [0.0, 0.25, 0.5, 0.8, 1.0] {
                let splitter = Splitter::new(fraction).unwrap();
                let split = splitter.split_seeded(numbered(total), 42);
                assert_eq!(split.train.len() + split.test.len(), total);

                let mut union: Vec<String> = split
                    .train
                    .iter()
                    .chain(split.test.iter())
                    .map(|e| e.text.clone())
                    .collect();
                union.sort();
                assert_eq!(union, sorted(&numbered(total)));
            }
        }
    }

    #[test]
    fn test_extreme_fractions() {
        let split = Splitter::new(0.0).unwrap().split_seeded(numbered(4), 1);
        assert!(split.train.is_empty());
        assert_eq!(split.test.len(), 4);

        let split = Splitter::new(1.0).unwrap().split_seeded(numbered(4), 1);
        assert_eq!(split.train.len(), 4);
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let split = Splitter::default().split_seeded(Dataset::default(), 3);
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_same_seed_same_split() {
        let splitter = Splitter::default();
        let first = splitter.split_seeded(numbered(50), 99);
        let second = splitter.split_seeded(numbered(50), 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(matches!(Splitter::new(1.5), Err(HarnessError::InvalidConfig(_))));
        assert!(matches!(Splitter::new(-0.1), Err(HarnessError::InvalidConfig(_))));
        assert!(matches!(Splitter::new(f64::NAN), Err(HarnessError::InvalidConfig(_))));
    }
}
