//! Flatten layer
//!
//! Collapses a multi-dimensional input (e.g. a 20×20 image) into a single
//! feature row. Data is already stored row-major, so the forward pass is a
//! copy. The layer owns no tensors and contributes nothing to a flat weight
//! vector.

use crate::error::{Result, ValidatorError};
use crate::layers::Layer;
use crate::tensor::{element_count, LayerShape, Tensor, TensorShape};

#[derive(Debug, Clone)]
pub struct FlattenLayer {
    input_shape: TensorShape,
}

impl FlattenLayer {
    pub fn new(input_shape: &[usize]) -> Self {
        Self {
            input_shape: input_shape.to_vec(),
        }
    }

    /// Per-sample shape the layer expects.
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }
}

impl Layer for FlattenLayer {
    fn kind(&self) -> &'static str {
        "flatten"
    }

    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        let len = batch_size * self.output_size();
        output[..len].copy_from_slice(&input[..len]);
    }

    fn input_size(&self) -> usize {
        element_count(&self.input_shape)
    }

    fn output_size(&self) -> usize {
        element_count(&self.input_shape)
    }

    fn tensor_shapes(&self) -> LayerShape {
        Vec::new()
    }

    fn tensors(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn set_tensors(&mut self, tensors: Vec<Tensor>) -> Result<()> {
        if !tensors.is_empty() {
            return Err(ValidatorError::shape("flatten tensor count", 0, tensors.len()));
        }
        Ok(())
    }
}
