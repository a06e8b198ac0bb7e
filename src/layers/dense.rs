//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer that performs the transformation:
//! output = activation(input × kernel + bias)

use crate::error::{Result, ValidatorError};
use crate::layers::Layer;
use crate::tensor::{LayerShape, Tensor};
use crate::utils::{relu_inplace, SimpleRng};

/// Activation applied to a dense layer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Identity; the layer emits raw logits.
    #[default]
    Linear,
    Relu,
}

impl Activation {
    /// Parses the lowercase name used in architecture files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "linear" | "none" => Some(Activation::Linear),
            "relu" => Some(Activation::Relu),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
        }
    }
}

/// Dense layer with a kernel and a bias.
///
/// Owns two tensors, always in this order:
///
/// * `kernel` - shape `[input_size, output_size]`, row-major
/// * `bias` - shape `[output_size]`
///
/// # Example
///
/// ```
/// use fedval_node::layers::{Activation, DenseLayer, Layer};
///
/// let layer = DenseLayer::zeroed(400, 10, Activation::Linear);
/// assert_eq!(layer.parameter_count(), 400 * 10 + 10);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    activation: Activation,
    kernel: Tensor,
    bias: Tensor,
}

impl DenseLayer {
    /// Creates a layer with every parameter set to zero.
    pub fn zeroed(input_size: usize, output_size: usize, activation: Activation) -> Self {
        Self {
            input_size,
            output_size,
            activation,
            kernel: Tensor::zeros(&[input_size, output_size]),
            bias: Tensor::zeros(&[output_size]),
        }
    }

    /// Creates a layer with Xavier-initialized kernel and zero bias.
    ///
    /// Kernel values are sampled uniformly from [-limit, limit] where
    /// limit = sqrt(6 / (input_size + output_size)).
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut SimpleRng,
    ) -> Self {
        let limit = (6.0f32 / (input_size + output_size) as f32).sqrt();

        Self {
            input_size,
            output_size,
            activation,
            kernel: Tensor::from_fn(&[input_size, output_size], || {
                rng.gen_range_f32(-limit, limit)
            }),
            bias: Tensor::zeros(&[output_size]),
        }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    fn check_shape(name: &str, tensor: &Tensor, expected: &[usize]) -> Result<()> {
        if tensor.shape() != expected {
            return Err(ValidatorError::shape(
                format!(
                    "dense {}: expected shape {:?}, got {:?}",
                    name,
                    expected,
                    tensor.shape()
                ),
                expected.iter().product(),
                tensor.len(),
            ));
        }
        Ok(())
    }
}

impl Layer for DenseLayer {
    fn kind(&self) -> &'static str {
        "dense"
    }

    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        let kernel = self.kernel.data();
        let bias = self.bias.data();

        for b in 0..batch_size {
            let x = &input[b * self.input_size..(b + 1) * self.input_size];
            let y = &mut output[b * self.output_size..(b + 1) * self.output_size];
            y.copy_from_slice(bias);

            for (i, &xi) in x.iter().enumerate() {
                let row = &kernel[i * self.output_size..(i + 1) * self.output_size];
                for (yj, &w) in y.iter_mut().zip(row.iter()) {
                    *yj += xi * w;
                }
            }
        }

        if self.activation == Activation::Relu {
            relu_inplace(&mut output[..batch_size * self.output_size]);
        }
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn output_size(&self) -> usize {
        self.output_size
    }

    fn tensor_shapes(&self) -> LayerShape {
        vec![
            vec![self.input_size, self.output_size],
            vec![self.output_size],
        ]
    }

    fn tensors(&self) -> Vec<&Tensor> {
        vec![&self.kernel, &self.bias]
    }

    fn set_tensors(&mut self, tensors: Vec<Tensor>) -> Result<()> {
        let [kernel, bias]: [Tensor; 2] = tensors
            .try_into()
            .map_err(|rest: Vec<Tensor>| ValidatorError::shape("dense tensor count", 2, rest.len()))?;

        Self::check_shape("kernel", &kernel, &[self.input_size, self.output_size])?;
        Self::check_shape("bias", &bias, &[self.output_size])?;

        self.kernel = kernel;
        self.bias = bias;
        Ok(())
    }
}
