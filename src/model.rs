//! Models built from an architecture
//!
//! A `Model` is the ordered list of layers an architecture describes. It is
//! created fresh for every validation call, either zeroed (the rebuilder's
//! starting point) or randomly initialized (for producing conforming test
//! models), and dropped once a score exists.

use crate::architecture::{LayerSpec, ModelArchitecture};
use crate::error::{Result, ValidatorError};
use crate::layers::{DenseLayer, DropoutLayer, FlattenLayer, Layer};
use crate::tensor::{LayerShape, Tensor};
use crate::utils::SimpleRng;

/// Ordered sequence of layers.
pub struct Model {
    layers: Vec<Box<dyn Layer>>,
}

impl Model {
    /// Builds a model whose every parameter is zero.
    pub fn zeroed(architecture: &ModelArchitecture) -> Self {
        let layers = architecture
            .layers()
            .iter()
            .map(|spec| -> Box<dyn Layer> {
                match spec {
                    LayerSpec::Flatten { input_shape } => Box::new(FlattenLayer::new(input_shape)),
                    LayerSpec::Dense {
                        input_size,
                        output_size,
                        activation,
                    } => Box::new(DenseLayer::zeroed(*input_size, *output_size, *activation)),
                    LayerSpec::Dropout { size, drop_rate } => {
                        Box::new(DropoutLayer::new(*size, *drop_rate))
                    }
                }
            })
            .collect();
        Self { layers }
    }

    /// Builds a model with Xavier-initialized dense kernels.
    ///
    /// # Examples
    ///
    /// ```
    /// use fedval_node::architecture::ModelArchitecture;
    /// use fedval_node::model::Model;
    /// use fedval_node::utils::SimpleRng;
    ///
    /// let arch = ModelArchitecture::reference();
    /// let mut rng = SimpleRng::new(42);
    /// let model = Model::initialized(&arch, &mut rng);
    /// assert_eq!(model.parameter_count(), 4010);
    /// ```
    pub fn initialized(architecture: &ModelArchitecture, rng: &mut SimpleRng) -> Self {
        let layers = architecture
            .layers()
            .iter()
            .map(|spec| -> Box<dyn Layer> {
                match spec {
                    LayerSpec::Dense {
                        input_size,
                        output_size,
                        activation,
                    } => Box::new(DenseLayer::new(*input_size, *output_size, *activation, rng)),
                    LayerSpec::Flatten { input_shape } => Box::new(FlattenLayer::new(input_shape)),
                    LayerSpec::Dropout { size, drop_rate } => {
                        Box::new(DropoutLayer::new(*size, *drop_rate))
                    }
                }
            })
            .collect();
        Self { layers }
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Box<dyn Layer>] {
        &mut self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.parameter_count()).sum()
    }

    /// Tensor shapes of every layer, in layer order.
    pub fn layer_shapes(&self) -> Vec<LayerShape> {
        self.layers.iter().map(|layer| layer.tensor_shapes()).collect()
    }

    /// Every owned tensor, grouped by layer.
    pub fn tensors(&self) -> Vec<Vec<&Tensor>> {
        self.layers.iter().map(|layer| layer.tensors()).collect()
    }

    /// Runs a batch through every layer and returns the final outputs
    /// (`batch_size × output_size`, row-major).
    pub fn forward(&self, input: &[f32], batch_size: usize) -> Result<Vec<f32>> {
        let expected = batch_size * self.input_size();
        if input.len() != expected {
            return Err(ValidatorError::shape("model input batch", expected, input.len()));
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            let mut next = vec![0.0f32; batch_size * layer.output_size()];
            layer.forward(&current, &mut next, batch_size);
            current = next;
        }
        Ok(current)
    }
}
