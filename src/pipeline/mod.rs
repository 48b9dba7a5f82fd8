//! The three pipeline stages and their composition.
//!
//! Each stage reads what it needs from an [`ArtifactStore`], works from an
//! explicit [`PipelineParams`], and writes its outputs back. The split is
//! recomputed from the seed in both `train` and `evaluate`; a fingerprint
//! recorded at training time guards against the two disagreeing.

use crate::artifacts::{ArtifactStore, DatasetMeta, TrainMeta};
use crate::classification::LogisticRegression;
use crate::config::{DataParams, PipelineParams};
use crate::data::Dataset;
use crate::error::{PipelineError, Result};
use crate::metrics::{roc_auc, Evaluation, Evaluator};
use crate::model_selection::{split_fingerprint, SplitIndices, StratifiedSplit};
use crate::synthetic::{make_classification, ClassificationParams};

/// Generates the dataset and writes it with its metadata.
///
/// # Errors
///
/// Returns a configuration error for impossible generator parameters, or an
/// artifact error if writing fails.
pub fn make_data(params: &PipelineParams, store: &ArtifactStore) -> Result<Dataset> {
    let _span = tracing::info_span!("make_data", root = %store.root().display()).entered();
    let d = &params.data;

    let dataset = make_classification(&generator_params(d))?;
    let [n_neg, n_pos] = dataset.class_counts();
    tracing::info!(
        n_samples = d.n_samples,
        n_features = d.n_features,
        n_redundant = d.n_redundant(),
        n_neg,
        n_pos,
        "generated dataset"
    );

    store.write_dataset(&dataset)?;
    store.write_dataset_meta(&DatasetMeta {
        n_samples: d.n_samples,
        n_features: d.n_features,
        n_informative: d.n_informative,
        class_sep: d.class_sep,
        random_state: d.random_state,
    })?;
    Ok(dataset)
}

/// Fits the classifier on the training split and writes the model with its
/// metadata.
///
/// `auc_sanity` is the held-out AUC measured right after fitting.
///
/// # Errors
///
/// Propagates split, fit, scoring and artifact failures.
pub fn train(params: &PipelineParams, store: &ArtifactStore) -> Result<TrainMeta> {
    let _span = tracing::info_span!("train", root = %store.root().display()).entered();
    let dataset = store.read_dataset()?;
    let splitter = splitter(&params.data);
    let split = splitter.split(dataset.labels())?;
    let fingerprint = split_fingerprint(&dataset, &splitter, &split);
    let (train_set, test_set) = partition(&dataset, &split);

    let t = &params.train;
    let mut model = LogisticRegression::new()
        .with_c(t.c)
        .with_max_iter(t.max_iter)
        .with_solver(t.solver);
    model.fit(train_set.features(), train_set.labels())?;

    let probs = model.predict_proba(test_set.features())?;
    let auc_sanity = roc_auc(probs.as_slice(), test_set.labels())?;

    let meta = TrainMeta {
        auc_sanity,
        c: t.c,
        max_iter: t.max_iter,
        solver: t.solver,
        n_iter: model.n_iter(),
        converged: model.converged(),
        split_fingerprint: fingerprint,
        n_train: split.train.len(),
        n_test: split.test.len(),
    };
    tracing::info!(
        solver = %meta.solver,
        n_iter = meta.n_iter,
        converged = meta.converged,
        auc_sanity = meta.auc_sanity,
        n_train = meta.n_train,
        n_test = meta.n_test,
        "trained model"
    );

    store.write_model(&model)?;
    store.write_train_meta(&meta)?;
    Ok(meta)
}

/// Scores the stored model on the held-out split and writes the metrics and
/// ROC table.
///
/// # Errors
///
/// - [`PipelineError::SplitMismatch`] if the recomputed split differs from
///   the one recorded at training time
/// - artifact, scoring and split failures
pub fn evaluate(params: &PipelineParams, store: &ArtifactStore) -> Result<Evaluation> {
    let _span = tracing::info_span!("evaluate", root = %store.root().display()).entered();
    let dataset = store.read_dataset()?;
    let model = store.read_model()?;
    let train_meta = store.read_train_meta()?;

    let splitter = splitter(&params.data);
    let split = splitter.split(dataset.labels())?;
    let fingerprint = split_fingerprint(&dataset, &splitter, &split);
    if fingerprint != train_meta.split_fingerprint {
        return Err(PipelineError::SplitMismatch {
            expected: train_meta.split_fingerprint,
            actual: fingerprint,
        });
    }

    let test_set = dataset.take(&split.test);
    let evaluation = Evaluator::new()
        .with_n_thresholds(params.eval.thresholds)
        .evaluate(&model, test_set.features(), test_set.labels())?;
    let report = &evaluation.report;
    tracing::info!(
        roc_auc = report.roc_auc,
        accuracy = report.accuracy,
        precision = report.precision,
        recall = report.recall,
        f1 = report.f1,
        n_test = report.n_test,
        "evaluated model"
    );
    if (report.roc_auc - train_meta.auc_sanity).abs() > 1e-12 {
        tracing::warn!(
            roc_auc = report.roc_auc,
            auc_sanity = train_meta.auc_sanity,
            "held-out AUC differs from the training-time check"
        );
    }

    store.write_metrics(report)?;
    store.write_roc(&evaluation.roc)?;
    Ok(evaluation)
}

/// Runs `make_data`, `train` and `evaluate` in order.
///
/// # Errors
///
/// Stops at the first failing stage and returns its error.
pub fn run_all(params: &PipelineParams, store: &ArtifactStore) -> Result<Evaluation> {
    make_data(params, store)?;
    train(params, store)?;
    evaluate(params, store)
}

fn generator_params(d: &DataParams) -> ClassificationParams {
    ClassificationParams::new(d.n_samples, d.n_features)
        .with_n_informative(d.n_informative)
        .with_n_redundant(d.n_redundant())
        .with_class_sep(d.class_sep)
        .with_random_state(d.random_state)
}

fn splitter(d: &DataParams) -> StratifiedSplit {
    StratifiedSplit::new(d.test_size).with_random_state(d.random_state)
}

fn partition(dataset: &Dataset, split: &SplitIndices) -> (Dataset, Dataset) {
    (dataset.take(&split.train), dataset.take(&split.test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Solver;
    use crate::config::{EvalParams, TrainParams};
    use tempfile::TempDir;

    fn params(n_samples: usize) -> PipelineParams {
        PipelineParams {
            data: DataParams {
                n_samples,
                n_features: 6,
                n_informative: 3,
                class_sep: 2.0,
                random_state: 7,
                test_size: 0.25,
            },
            train: TrainParams {
                c: 1.0,
                max_iter: 100,
                solver: Solver::Lbfgs,
            },
            eval: EvalParams { thresholds: 11 },
        }
    }

    #[test]
    fn test_make_data_writes_dataset_and_meta() {
        let dir = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let ds = make_data(&params(80), &store).expect("make_data");

        assert_eq!(ds.shape(), (80, 6));
        assert_eq!(store.read_dataset().expect("read"), ds);
        let meta = store.read_dataset_meta().expect("meta");
        assert_eq!((meta.n_samples, meta.n_features, meta.n_informative), (80, 6, 3));
        assert_eq!(meta.random_state, 7);
    }

    #[test]
    fn test_make_data_is_deterministic() {
        let (a, b) = (TempDir::new().expect("dir"), TempDir::new().expect("dir"));
        make_data(&params(60), &ArtifactStore::new(a.path())).expect("first");
        make_data(&params(60), &ArtifactStore::new(b.path())).expect("second");
        let read = |d: &TempDir| std::fs::read(d.path().join("data/dataset.csv")).expect("csv");
        assert_eq!(read(&a), read(&b));
    }

    #[test]
    fn test_train_records_split_and_fit() {
        let dir = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        make_data(&params(80), &store).expect("make_data");
        let meta = train(&params(80), &store).expect("train");

        assert_eq!((meta.n_train, meta.n_test), (60, 20));
        assert_eq!(meta.split_fingerprint.len(), 64);
        assert!((0.0..=1.0).contains(&meta.auc_sanity));
        assert_eq!(store.read_train_meta().expect("read"), meta);
        assert!(store.read_model().expect("model").is_fitted());
    }

    #[test]
    fn test_train_without_dataset_is_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let err = train(&params(80), &ArtifactStore::new(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactIo { .. }));
    }

    #[test]
    fn test_evaluate_matches_training_check() {
        let dir = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        make_data(&params(80), &store).expect("make_data");
        let meta = train(&params(80), &store).expect("train");
        let eval = evaluate(&params(80), &store).expect("evaluate");

        assert_eq!(eval.report.n_test, 20);
        assert_eq!(eval.roc.len(), 11);
        assert!((eval.report.roc_auc - meta.auc_sanity).abs() < 1e-12);
        assert_eq!(store.read_metrics().expect("metrics"), eval.report);
    }

    #[test]
    fn test_evaluate_with_different_seed_is_split_mismatch() {
        let dir = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        make_data(&params(80), &store).expect("make_data");
        train(&params(80), &store).expect("train");

        let mut other = params(80);
        other.data.random_state = 8;
        let err = evaluate(&other, &store).unwrap_err();
        assert!(matches!(err, PipelineError::SplitMismatch { .. }));
        assert!(!store.metrics_path().exists());
    }

    #[test]
    fn test_run_all_produces_every_artifact() {
        let dir = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        run_all(&params(80), &store).expect("run");
        for path in [
            store.dataset_path(),
            store.dataset_meta_path(),
            store.model_path(),
            store.train_meta_path(),
            store.metrics_path(),
            store.roc_path(),
        ] {
            assert!(path.is_file(), "missing {}", path.display());
        }
    }
}
