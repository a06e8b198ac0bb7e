//! Flat weight vectors
//!
//! `flatten` and `rebuild` are exact inverses for any model that conforms
//! to the architecture. Both walk the same order:
//!
//! 1. layers in architecture order,
//! 2. tensors within a layer in the layer's fixed order (kernel, then bias),
//! 3. elements within a tensor in row-major order.
//!
//! Layers without tensors contribute nothing. The vector itself carries no
//! shape information; `FingerprintedWeights` pairs it with the producing
//! architecture's fingerprint when both sides want a structural check.

use crate::architecture::ModelArchitecture;
use crate::error::{Result, ValidatorError};
use crate::model::Model;
use crate::tensor::{element_count, Tensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Concatenates every tensor of `model` into one vector.
///
/// # Examples
///
/// ```
/// use fedval_node::architecture::ModelArchitecture;
/// use fedval_node::model::Model;
/// use fedval_node::weights::flatten;
///
/// let model = Model::zeroed(&ModelArchitecture::reference());
/// assert_eq!(flatten(&model).len(), 400 * 10 + 10);
/// ```
pub fn flatten(model: &Model) -> Vec<f32> {
    let mut flat = Vec::with_capacity(model.parameter_count());
    for layer in model.layers() {
        for tensor in layer.tensors() {
            flat.extend_from_slice(tensor.data());
        }
    }
    flat
}

/// Reconstructs a model of `architecture` from a flat vector.
///
/// The vector length is checked against the architecture before anything
/// is built, and the cursor is checked again once every tensor is filled,
/// so a vector is never truncated or padded.
///
/// # Errors
///
/// `LengthMismatch` when `flat.len()` differs from
/// `architecture.parameter_count()`.
pub fn rebuild(flat: &[f32], architecture: &ModelArchitecture) -> Result<Model> {
    let expected = architecture.parameter_count();
    if flat.len() != expected {
        return Err(ValidatorError::LengthMismatch {
            expected,
            actual: flat.len(),
        });
    }

    let mut model = Model::zeroed(architecture);
    let layer_shapes = architecture.layer_shapes();
    let mut cursor = 0usize;

    for (layer, shapes) in model.layers_mut().iter_mut().zip(layer_shapes) {
        if shapes.is_empty() {
            continue;
        }

        let mut tensors = Vec::with_capacity(shapes.len());
        for shape in &shapes {
            let size = element_count(shape);
            let slice = flat
                .get(cursor..cursor + size)
                .ok_or(ValidatorError::LengthMismatch {
                    expected: cursor + size,
                    actual: flat.len(),
                })?;
            tensors.push(Tensor::from_slice(shape, slice)?);
            cursor += size;
        }
        layer.set_tensors(tensors)?;
    }

    if cursor != flat.len() {
        return Err(ValidatorError::LengthMismatch {
            expected: cursor,
            actual: flat.len(),
        });
    }

    debug!(parameters = cursor, layers = model.layers().len(), "rebuilt model");
    Ok(model)
}

/// A flat vector tagged with the fingerprint of the architecture that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintedWeights {
    pub fingerprint: String,
    pub values: Vec<f32>,
}

/// Flattens `model` and tags the result with `architecture`'s fingerprint.
pub fn flatten_fingerprinted(model: &Model, architecture: &ModelArchitecture) -> FingerprintedWeights {
    FingerprintedWeights {
        fingerprint: architecture.fingerprint(),
        values: flatten(model),
    }
}

/// Rebuilds after confirming the weights were produced for `architecture`.
///
/// # Errors
///
/// `ArchitectureMismatch` when the fingerprints differ, then anything
/// `rebuild` can return.
pub fn rebuild_fingerprinted(
    weights: &FingerprintedWeights,
    architecture: &ModelArchitecture,
) -> Result<Model> {
    let expected = architecture.fingerprint();
    if weights.fingerprint != expected {
        return Err(ValidatorError::ArchitectureMismatch {
            expected,
            actual: weights.fingerprint.clone(),
        });
    }
    rebuild(&weights.values, architecture)
}
