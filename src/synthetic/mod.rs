//! Synthetic classification data.
//!
//! [`make_classification`] places Gaussian clusters on the vertices of a
//! hypercube in the informative subspace, two (by default) per class, and
//! pads the informative block with redundant linear combinations and pure
//! noise columns. Every draw comes from a single generator seeded with
//! `random_state`, in a fixed order, so identical parameters always give a
//! bit-identical dataset.
//!
//! # Example
//!
//! ```
//! use binclf::synthetic::{make_classification, ClassificationParams};
//!
//! let params = ClassificationParams::new(100, 6)
//!     .with_n_informative(3)
//!     .with_n_redundant(1)
//!     .with_class_sep(1.5)
//!     .with_random_state(7);
//! let ds = make_classification(&params).expect("valid parameters");
//! assert_eq!(ds.shape(), (100, 6));
//! ```
//!
//! # References
//!
//! - Guyon (2003). Design of experiments for the NIPS 2003 variable
//!   selection benchmark.

use crate::data::Dataset;
use crate::error::{PipelineError, Result};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

const N_CLASSES: usize = 2;

/// Hypercube dimensions sampled without replacement in one draw.
const MAX_EXACT_DIMS: usize = 30;

/// Parameters for [`make_classification`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationParams {
    /// Number of rows
    pub n_samples: usize,
    /// Total number of feature columns
    pub n_features: usize,
    /// Columns carrying class signal
    pub n_informative: usize,
    /// Columns that are linear combinations of the informative ones
    pub n_redundant: usize,
    /// Gaussian clusters per class
    pub n_clusters_per_class: usize,
    /// Half-side of the centroid hypercube
    pub class_sep: f64,
    /// Fraction of labels replaced at random
    pub flip_y: f64,
    /// Permute rows and columns after generation
    pub shuffle: bool,
    /// Generator seed
    pub random_state: u64,
}

impl ClassificationParams {
    /// Parameters with the conventional defaults: 2 informative and 2
    /// redundant columns, 2 clusters per class, `class_sep = 1`,
    /// `flip_y = 0.01`, shuffling on, seed 0.
    #[must_use]
    pub fn new(n_samples: usize, n_features: usize) -> Self {
        Self {
            n_samples,
            n_features,
            n_informative: 2,
            n_redundant: 2,
            n_clusters_per_class: 2,
            class_sep: 1.0,
            flip_y: 0.01,
            shuffle: true,
            random_state: 0,
        }
    }

    /// Sets the informative column count.
    #[must_use]
    pub fn with_n_informative(mut self, n: usize) -> Self {
        self.n_informative = n;
        self
    }

    /// Sets the redundant column count.
    #[must_use]
    pub fn with_n_redundant(mut self, n: usize) -> Self {
        self.n_redundant = n;
        self
    }

    /// Sets the clusters per class.
    #[must_use]
    pub fn with_n_clusters_per_class(mut self, n: usize) -> Self {
        self.n_clusters_per_class = n;
        self
    }

    /// Sets the class separation.
    #[must_use]
    pub fn with_class_sep(mut self, sep: f64) -> Self {
        self.class_sep = sep;
        self
    }

    /// Sets the label-noise fraction.
    #[must_use]
    pub fn with_flip_y(mut self, flip_y: f64) -> Self {
        self.flip_y = flip_y;
        self
    }

    /// Enables or disables the final row/column permutation.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets the generator seed.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    fn n_clusters(&self) -> usize {
        N_CLASSES * self.n_clusters_per_class
    }

    fn n_useless(&self) -> usize {
        self.n_features - self.n_informative - self.n_redundant
    }

    /// Checks that the parameters describe a constructible dataset.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] naming the violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.n_informative == 0 {
            return Err(PipelineError::invalid_param("n_informative", 0, ">= 1"));
        }
        if self.n_informative + self.n_redundant > self.n_features {
            return Err(PipelineError::config(format!(
                "n_informative ({}) + n_redundant ({}) must be <= n_features ({})",
                self.n_informative, self.n_redundant, self.n_features
            )));
        }
        if self.n_clusters_per_class == 0 {
            return Err(PipelineError::invalid_param("n_clusters_per_class", 0, ">= 1"));
        }
        let vertices_available = self.n_informative >= MAX_EXACT_DIMS
            || (1usize << self.n_informative) >= self.n_clusters();
        if !vertices_available {
            return Err(PipelineError::config(format!(
                "n_classes ({N_CLASSES}) * n_clusters_per_class ({}) must be <= 2^n_informative ({})",
                self.n_clusters_per_class,
                1usize << self.n_informative
            )));
        }
        if self.n_samples < self.n_clusters() {
            return Err(PipelineError::invalid_param(
                "n_samples",
                self.n_samples,
                &format!(">= {} (one row per cluster)", self.n_clusters()),
            ));
        }
        if !(self.class_sep.is_finite() && self.class_sep > 0.0) {
            return Err(PipelineError::invalid_param("class_sep", self.class_sep, "> 0"));
        }
        if !(0.0..=1.0).contains(&self.flip_y) {
            return Err(PipelineError::invalid_param("flip_y", self.flip_y, "in [0, 1]"));
        }
        Ok(())
    }
}

/// Generates a random binary classification problem.
///
/// Column layout before shuffling is `[informative | redundant | noise]`.
/// Cluster `k` carries label `k mod 2`; `flip_y` then relabels a random
/// fraction of rows uniformly.
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] if the parameters fail
/// [`ClassificationParams::validate`].
pub fn make_classification(params: &ClassificationParams) -> Result<Dataset> {
    params.validate()?;

    let n = params.n_samples;
    let n_inf = params.n_informative;
    let n_red = params.n_redundant;
    let n_features = params.n_features;
    let n_clusters = params.n_clusters();

    tracing::debug!(
        n_samples = n,
        n_features,
        n_informative = n_inf,
        n_redundant = n_red,
        n_useless = params.n_useless(),
        class_sep = params.class_sep,
        random_state = params.random_state,
        "generating classification dataset"
    );

    let mut rng = StdRng::seed_from_u64(params.random_state);

    let cluster_sizes = cluster_sizes(n, n_clusters);

    let mut centroids = hypercube(n_clusters, n_inf, &mut rng);
    for c in centroids.iter_mut().flatten() {
        *c = *c * 2.0 * params.class_sep - params.class_sep;
    }

    // Informative block, row-major n × n_inf.
    let mut informative: Vec<f64> = (0..n * n_inf)
        .map(|_| standard_normal(&mut rng))
        .collect();
    let mut labels = vec![0usize; n];

    let mut start = 0;
    for (k, &size) in cluster_sizes.iter().enumerate() {
        let stop = start + size;
        let mixing = uniform_matrix(n_inf, n_inf, &mut rng);
        for row in start..stop {
            labels[row] = k % N_CLASSES;
            let src = informative[row * n_inf..(row + 1) * n_inf].to_vec();
            let dst = &mut informative[row * n_inf..(row + 1) * n_inf];
            for (j, out) in dst.iter_mut().enumerate() {
                let mixed: f64 = src
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| v * mixing.get(i, j))
                    .sum();
                *out = mixed + centroids[k][j];
            }
        }
        start = stop;
    }

    let informative = Matrix::from_vec(n, n_inf, informative)
        .map_err(|e| PipelineError::config(e.to_string()))?;

    let redundant = if n_red > 0 {
        let b = uniform_matrix(n_inf, n_red, &mut rng);
        Some(
            informative
                .matmul(&b)
                .map_err(|e| PipelineError::config(e.to_string()))?,
        )
    } else {
        None
    };

    let n_useless = params.n_useless();
    let noise: Vec<f64> = (0..n * n_useless)
        .map(|_| standard_normal(&mut rng))
        .collect();

    let mut data = Vec::with_capacity(n * n_features);
    for row in 0..n {
        data.extend_from_slice(informative.row_slice(row));
        if let Some(red) = &redundant {
            data.extend_from_slice(red.row_slice(row));
        }
        data.extend_from_slice(&noise[row * n_useless..(row + 1) * n_useless]);
    }
    let mut features = Matrix::from_vec(n, n_features, data)
        .map_err(|e| PipelineError::config(e.to_string()))?;

    if params.flip_y > 0.0 {
        let flip_mask: Vec<bool> = (0..n).map(|_| rng.random::<f64>() < params.flip_y).collect();
        for (label, flip) in labels.iter_mut().zip(flip_mask) {
            if flip {
                *label = rng.random_range(0..N_CLASSES);
            }
        }
    }

    if params.shuffle {
        let mut rows: Vec<usize> = (0..n).collect();
        rows.shuffle(&mut rng);
        features = features.select_rows(&rows);
        labels = rows.iter().map(|&r| labels[r]).collect();

        let mut cols: Vec<usize> = (0..n_features).collect();
        cols.shuffle(&mut rng);
        features = features.permute_columns(&cols);
    }

    Dataset::new(features, labels)
}

/// Equal cluster sizes; the remainder goes one row each to the first clusters.
fn cluster_sizes(n_samples: usize, n_clusters: usize) -> Vec<usize> {
    let base = n_samples / n_clusters;
    let remainder = n_samples % n_clusters;
    (0..n_clusters)
        .map(|k| base + usize::from(k < remainder))
        .collect()
}

/// `samples` distinct vertices of the unit hypercube in `dims` dimensions.
///
/// The first 30 coordinates come from sampling vertex ids without
/// replacement, which already makes the rows distinct; any further
/// coordinates are independent fair bits.
fn hypercube(samples: usize, dims: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let exact = dims.min(MAX_EXACT_DIMS);
    let ids = index::sample(rng, 1usize << exact, samples).into_vec();
    let mut out: Vec<Vec<f64>> = ids
        .into_iter()
        .map(|id| {
            (0..exact)
                .map(|bit| ((id >> (exact - 1 - bit)) & 1) as f64)
                .collect()
        })
        .collect();
    for vertex in &mut out {
        for _ in exact..dims {
            vertex.push(f64::from(u8::from(rng.random::<bool>())));
        }
    }
    out
}

/// Matrix with entries uniform in [-1, 1).
fn uniform_matrix(rows: usize, cols: usize, rng: &mut StdRng) -> Matrix<f64> {
    let data: Vec<f64> = (0..rows * cols)
        .map(|_| 2.0 * rng.random::<f64>() - 1.0)
        .collect();
    Matrix::from_vec(rows, cols, data).expect("rows * cols values generated")
}

/// Box-Muller transform for one N(0, 1) draw.
fn standard_normal(rng: &mut StdRng) -> f64 {
    // u1 in (0, 1] keeps ln finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

#[cfg(test)]
#[path = "tests_generator_contract.rs"]
mod tests_generator_contract;
