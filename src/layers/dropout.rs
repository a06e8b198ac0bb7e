//! Dropout layer, inference mode only
//!
//! Models evaluated by the validation node never train, so dropout passes
//! its input through unchanged. The layer still takes part in the
//! architecture so that definitions containing dropout keep the same layer
//! sequence on both ends of the weight round trip. It owns no tensors.

use crate::error::{Result, ValidatorError};
use crate::layers::Layer;
use crate::tensor::{LayerShape, Tensor};

/// Pass-through dropout layer.
///
/// # Fields
///
/// * `size` - Number of input/output features (dropout doesn't change dimensions)
/// * `drop_rate` - Rate used when the model was trained; recorded, not applied
#[derive(Debug, Clone)]
pub struct DropoutLayer {
    size: usize,
    drop_rate: f32,
}

impl DropoutLayer {
    pub fn new(size: usize, drop_rate: f32) -> Self {
        Self { size, drop_rate }
    }

    pub fn drop_rate(&self) -> f32 {
        self.drop_rate
    }
}

impl Layer for DropoutLayer {
    fn kind(&self) -> &'static str {
        "dropout"
    }

    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        let len = batch_size * self.size;
        output[..len].copy_from_slice(&input[..len]);
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn output_size(&self) -> usize {
        self.size
    }

    fn tensor_shapes(&self) -> LayerShape {
        Vec::new()
    }

    fn tensors(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn set_tensors(&mut self, tensors: Vec<Tensor>) -> Result<()> {
        if !tensors.is_empty() {
            return Err(ValidatorError::shape("dropout tensor count", 0, tensors.len()));
        }
        Ok(())
    }
}
