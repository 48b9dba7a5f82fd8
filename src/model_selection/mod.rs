//! Reproducible stratified train/test splitting.
//!
//! The train and evaluate stages each recompute the split from the dataset,
//! the test fraction and the seed, so [`StratifiedSplit::split`] must be a
//! pure function of those inputs. [`split_fingerprint`] condenses the inputs
//! and the resulting test rows into a digest that the train stage records
//! and the evaluate stage re-checks.

use crate::data::Dataset;
use crate::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Training rows
    pub train: Vec<usize>,
    /// Held-out rows
    pub test: Vec<usize>,
}

/// Stratified single train/test split.
///
/// Each class contributes to the test side in proportion to its size.
/// The test side gets `ceil(test_size * n)` rows; per-class quotas are
/// `floor(n_test * n_class / n)` with the leftover rows going to the classes
/// with the largest remainders (ties to the lower label).
///
/// # Example
///
/// ```
/// use binclf::model_selection::StratifiedSplit;
///
/// let labels: Vec<usize> = (0..20).map(|i| i % 2).collect();
/// let split = StratifiedSplit::new(0.25)
///     .with_random_state(42)
///     .split(&labels)
///     .expect("both classes have at least 2 rows");
/// assert_eq!(split.test.len(), 5);
/// assert_eq!(split.train.len(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StratifiedSplit {
    test_size: f64,
    random_state: u64,
}

impl StratifiedSplit {
    /// Creates a splitter holding out `test_size` of the rows, seed 0.
    #[must_use]
    pub fn new(test_size: f64) -> Self {
        Self {
            test_size,
            random_state: 0,
        }
    }

    /// Set random state for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Test fraction.
    #[must_use]
    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Seed.
    #[must_use]
    pub fn random_state(&self) -> u64 {
        self.random_state
    }

    /// Partitions row indices by label.
    ///
    /// Classes are visited in ascending label order; each class's indices
    /// are shuffled and the first `quota` go to the test side. Both sides are
    /// then shuffled with the same generator.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Configuration`] if `test_size` is outside (0, 1)
    /// - [`PipelineError::EmptyInput`] for no labels
    /// - [`PipelineError::InsufficientData`] if only one class is present,
    ///   a class has fewer than 2 rows, or either side would get fewer rows
    ///   than there are classes
    pub fn split(&self, labels: &[usize]) -> Result<SplitIndices> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::invalid_param(
                "test_size",
                self.test_size,
                "in (0, 1)",
            ));
        }
        let n_samples = labels.len();
        if n_samples == 0 {
            return Err(PipelineError::empty_input("labels to split"));
        }

        let mut class_indices: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &label) in labels.iter().enumerate() {
            class_indices.entry(label).or_default().push(i);
        }

        if class_indices.len() < 2 {
            return Err(PipelineError::insufficient(
                "only one class present; cannot stratify",
            ));
        }
        if let Some((label, members)) = class_indices.iter().find(|(_, m)| m.len() < 2) {
            return Err(PipelineError::insufficient(format!(
                "class {label} has {} member(s); at least 2 are needed to stratify",
                members.len()
            )));
        }

        let n_test = (self.test_size * n_samples as f64).ceil() as usize;
        let n_test = n_test.clamp(1, n_samples);
        let n_train = n_samples - n_test;
        let n_classes = class_indices.len();
        if n_train < n_classes || n_test < n_classes {
            return Err(PipelineError::insufficient(format!(
                "split of {n_samples} rows into train={n_train}, test={n_test} \
                 leaves fewer rows than the {n_classes} classes"
            )));
        }

        let counts: Vec<(usize, usize)> = class_indices
            .iter()
            .map(|(&label, members)| (label, members.len()))
            .collect();
        let quotas = allocate_quotas(n_test, n_samples, &counts);

        let mut rng = StdRng::seed_from_u64(self.random_state);
        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);
        for (mut members, quota) in class_indices.into_values().zip(quotas) {
            members.shuffle(&mut rng);
            test.extend_from_slice(&members[..quota]);
            train.extend_from_slice(&members[quota..]);
        }
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        tracing::debug!(
            n_samples,
            n_train = train.len(),
            n_test = test.len(),
            test_size = self.test_size,
            random_state = self.random_state,
            "stratified split"
        );

        Ok(SplitIndices { train, test })
    }
}

/// Per-class test quotas summing to `n_test`, in the order of `counts`.
///
/// Largest-remainder apportionment over exact integer arithmetic; ties go
/// to the class listed first.
fn allocate_quotas(n_test: usize, n_samples: usize, counts: &[(usize, usize)]) -> Vec<usize> {
    let mut quotas: Vec<usize> = counts
        .iter()
        .map(|&(_, n_c)| n_test * n_c / n_samples)
        .collect();
    let assigned: usize = quotas.iter().sum();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = n_test * counts[a].1 % n_samples;
        let rb = n_test * counts[b].1 % n_samples;
        rb.cmp(&ra).then(a.cmp(&b))
    });
    for &i in by_remainder.iter().take(n_test - assigned) {
        quotas[i] += 1;
    }
    quotas
}

/// Hex SHA-256 over the dataset content, the split parameters and the
/// resulting test rows.
///
/// Two stages that agree on this value evaluated the same held-out rows.
#[must_use]
pub fn split_fingerprint(
    dataset: &Dataset,
    splitter: &StratifiedSplit,
    split: &SplitIndices,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"binclf-split-v1");
    hasher.update((dataset.n_samples() as u64).to_le_bytes());
    hasher.update((dataset.n_features() as u64).to_le_bytes());
    for value in dataset.features().as_slice() {
        hasher.update(value.to_bits().to_le_bytes());
    }
    for &label in dataset.labels() {
        hasher.update([label as u8]);
    }
    hasher.update(splitter.test_size().to_bits().to_le_bytes());
    hasher.update(splitter.random_state().to_le_bytes());
    for &idx in &split.test {
        hasher.update((idx as u64).to_le_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
#[path = "tests_split_contract.rs"]
mod tests_split_contract;
