//! Layer trait definition for inference layers
//!
//! Besides the forward pass, every layer exposes the learnable tensors it
//! owns in a fixed order. That order is what the weight flattener walks
//! and what the rebuilder fills back in, so it must never depend on
//! runtime state.

use crate::error::Result;
use crate::tensor::{element_count, LayerShape, Tensor};

/// Core trait for network layers.
///
/// Layers work on f32 data laid out as flat row-major batches.
///
/// # Example
///
/// ```ignore
/// let mut output = vec![0.0f32; batch_size * layer.output_size()];
/// layer.forward(&input, &mut output, batch_size);
///
/// for tensor in layer.tensors() {
///     println!("{:?}", tensor.shape());
/// }
/// ```
pub trait Layer {
    /// Short lowercase name of the layer kind ("dense", "flatten", ...).
    fn kind(&self) -> &'static str;

    /// Forward propagation through the layer.
    ///
    /// # Arguments
    ///
    /// * `input` - Input data flattened as a 1D array (batch_size × input_size)
    /// * `output` - Output buffer to store results (batch_size × output_size)
    /// * `batch_size` - Number of samples in the batch
    ///
    /// # Panics
    ///
    /// Implementations may panic if input/output buffers are shorter than
    /// the batch requires. `Model::forward` sizes them before calling.
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize);

    /// Number of input features per sample.
    fn input_size(&self) -> usize;

    /// Number of output features per sample.
    fn output_size(&self) -> usize;

    /// Shapes of the owned tensors, in flattening order.
    fn tensor_shapes(&self) -> LayerShape;

    /// Owned tensors, in the same order as `tensor_shapes`.
    fn tensors(&self) -> Vec<&Tensor>;

    /// Replaces every owned tensor.
    ///
    /// `tensors` must match `tensor_shapes` in count and in shape;
    /// otherwise the layer is left untouched and `ShapeMismatch` is returned.
    fn set_tensors(&mut self, tensors: Vec<Tensor>) -> Result<()>;

    /// Total number of learnable scalars.
    fn parameter_count(&self) -> usize {
        self.tensor_shapes()
            .iter()
            .map(|shape| element_count(shape))
            .sum()
    }
}
