//! Validation pipeline
//!
//! One call loads the dataset, rebuilds a model from the flat vector,
//! evaluates it, and returns the accuracy. Nothing is cached between calls
//! and any failure aborts the whole call.

use crate::architecture::ModelArchitecture;
use crate::config::NodeConfig;
use crate::dataset::{load_dataset, DatasetOptions};
use crate::error::Result;
use crate::evaluation::{BatchEvaluator, EvaluationReport, Evaluator};
use crate::weights::rebuild;
use std::path::Path;
use tracing::info;

/// Accuracy in [0, 1].
pub type ValidationScore = f32;

/// Scores flat weight vectors against datasets for one architecture.
pub struct Validator<E = BatchEvaluator> {
    architecture: ModelArchitecture,
    options: DatasetOptions,
    evaluator: E,
}

impl Validator<BatchEvaluator> {
    /// Reference architecture, reference dataset layout, default batching.
    pub fn reference() -> Self {
        Self::new(
            ModelArchitecture::reference(),
            DatasetOptions::default(),
            BatchEvaluator::default(),
        )
    }

    /// Builds a validator from a node configuration. The dataset image
    /// side comes from the architecture unless the config pins it.
    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        let architecture = config.architecture()?;
        let options = config.dataset_options(&architecture)?;
        Ok(Self::new(
            architecture,
            options,
            BatchEvaluator::new(config.batch_size()),
        ))
    }
}

impl<E: Evaluator> Validator<E> {
    pub fn new(architecture: ModelArchitecture, options: DatasetOptions, evaluator: E) -> Self {
        Self {
            architecture,
            options,
            evaluator,
        }
    }

    pub fn architecture(&self) -> &ModelArchitecture {
        &self.architecture
    }

    /// Runs the full pipeline and returns every metric.
    pub fn evaluate(&self, flat: &[f32], dataset_path: impl AsRef<Path>) -> Result<EvaluationReport> {
        let dataset_path = dataset_path.as_ref();
        let dataset = load_dataset(dataset_path, &self.options)?;
        let model = rebuild(flat, &self.architecture)?;
        let report = self.evaluator.evaluate(&model, &dataset)?;
        info!(
            dataset = %dataset_path.display(),
            parameters = flat.len(),
            accuracy = report.accuracy,
            "validation finished"
        );
        Ok(report)
    }

    /// Accuracy of the model encoded by `flat` on the dataset at
    /// `dataset_path`.
    pub fn compute_validation_score(
        &self,
        flat: &[f32],
        dataset_path: impl AsRef<Path>,
    ) -> Result<ValidationScore> {
        Ok(self.evaluate(flat, dataset_path)?.accuracy)
    }
}

/// Scores `flat` with the reference architecture and dataset layout.
///
/// # Errors
///
/// `EmptyDataset` or `ShapeMismatch` from loading, `LengthMismatch` from
/// rebuilding; none are retried.
pub fn compute_validation_score(
    flat: &[f32],
    dataset_path: impl AsRef<Path>,
) -> Result<ValidationScore> {
    Validator::reference().compute_validation_score(flat, dataset_path)
}
