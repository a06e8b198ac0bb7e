//! Scoring a model against a labeled dataset
//!
//! The validator only depends on the `Evaluator` trait; `BatchEvaluator`
//! is the in-crate implementation. It treats the model's outputs as logits
//! and reports mean sparse categorical cross-entropy alongside accuracy.

use crate::dataset::ImageDataset;
use crate::error::{Result, ValidatorError};
use crate::model::Model;
use crate::utils::argmax;
use serde::Serialize;
use tracing::info;

/// Default number of samples per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Metrics from one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Mean cross-entropy of the softmax of the logits.
    pub loss: f32,
    /// Fraction of samples whose highest logit is the label, in [0, 1].
    pub accuracy: f32,
    pub samples: usize,
}

/// Anything that can score a model on a labeled dataset.
pub trait Evaluator {
    fn evaluate(&self, model: &Model, dataset: &ImageDataset) -> Result<EvaluationReport>;
}

/// Batched forward-pass evaluator.
#[derive(Debug, Clone, Copy)]
pub struct BatchEvaluator {
    batch_size: usize,
}

impl BatchEvaluator {
    /// A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Default for BatchEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

/// Cross-entropy of one logit row against `label`, via log-sum-exp.
fn cross_entropy_from_logits(logits: &[f32], label: usize) -> f32 {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let sum: f32 = logits.iter().map(|&z| (z - max).exp()).sum();
    max + sum.ln() - logits[label]
}

impl Evaluator for BatchEvaluator {
    fn evaluate(&self, model: &Model, dataset: &ImageDataset) -> Result<EvaluationReport> {
        let input_size = model.input_size();
        let classes = model.output_size();
        if dataset.image_size() != input_size {
            return Err(ValidatorError::shape(
                "dataset image against model input",
                input_size,
                dataset.image_size(),
            ));
        }

        for (row, &label) in dataset.labels().iter().enumerate() {
            if label as usize >= classes {
                return Err(ValidatorError::LabelOutOfRange {
                    row,
                    label,
                    classes,
                });
            }
        }

        let samples = dataset.len();
        let mut correct = 0usize;
        let mut total_loss = 0.0f64;

        for batch_start in (0..samples).step_by(self.batch_size) {
            let batch_count = (samples - batch_start).min(self.batch_size);
            let inputs = &dataset.images()
                [batch_start * input_size..(batch_start + batch_count) * input_size];
            let logits = model.forward(inputs, batch_count)?;

            let labels = &dataset.labels()[batch_start..batch_start + batch_count];
            for (row, &label) in logits.chunks_exact(classes).zip(labels.iter()) {
                let label = label as usize;
                total_loss += cross_entropy_from_logits(row, label) as f64;
                if argmax(row) == label {
                    correct += 1;
                }
            }
        }

        let report = EvaluationReport {
            loss: (total_loss / samples as f64) as f32,
            accuracy: correct as f32 / samples as f32,
            samples,
        };
        info!(
            loss = report.loss,
            accuracy = report.accuracy,
            samples,
            "evaluated model"
        );
        Ok(report)
    }
}
