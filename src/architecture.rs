//! Model architecture definition
//!
//! The architecture is the only thing the flattening side and the
//! rebuilding side share. It fixes the layer sequence and, through it, the
//! shape and order of every tensor in a flat weight vector. A flat vector
//! carries no metadata of its own, so both ends must hold an identical
//! `ModelArchitecture`; `fingerprint` gives a cheap way to compare them.
//!
//! Architectures can be written as JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "layers": [
//!     { "layer_type": "flatten", "input_shape": [20, 20] },
//!     { "layer_type": "dense", "input_size": 400, "output_size": 10 }
//!   ]
//! }
//! ```

use crate::error::{Result, ValidatorError};
use crate::layers::Activation;
use crate::tensor::{element_count, LayerShape};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Side length of the square images the reference model reads.
pub const REFERENCE_IMAGE_SIDE: usize = 20;

/// Number of classes the reference model scores.
pub const REFERENCE_CLASSES: usize = 10;

/// Configuration for a single layer, as written in an architecture file.
///
/// Different layer types require different fields:
///
/// - **Flatten**: Requires `input_shape`
/// - **Dense**: Requires `input_size` and `output_size`, optional `activation`
///   ("linear" by default, or "relu")
/// - **Dropout**: Requires `size` and `drop_rate` in [0.0, 1.0)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Type of layer: "flatten", "dense", or "dropout"
    pub layer_type: String,

    /// Per-sample input shape for Flatten layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<usize>>,

    /// Input size for Dense layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_size: Option<usize>,
    /// Output size for Dense layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_size: Option<usize>,
    /// Activation for Dense layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,

    /// Number of features for Dropout layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Drop rate for Dropout layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_rate: Option<f32>,
}

/// Serialized form of a whole architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    /// Bumped whenever the layer sequence changes incompatibly
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sequence of layer configurations defining the network structure
    pub layers: Vec<LayerConfig>,
}

fn default_version() -> u32 {
    1
}

/// One validated layer of an architecture.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Flatten {
        input_shape: Vec<usize>,
    },
    Dense {
        input_size: usize,
        output_size: usize,
        activation: Activation,
    },
    Dropout {
        size: usize,
        drop_rate: f32,
    },
}

impl LayerSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::Flatten { .. } => "flatten",
            LayerSpec::Dense { .. } => "dense",
            LayerSpec::Dropout { .. } => "dropout",
        }
    }

    pub fn input_size(&self) -> usize {
        match self {
            LayerSpec::Flatten { input_shape } => element_count(input_shape),
            LayerSpec::Dense { input_size, .. } => *input_size,
            LayerSpec::Dropout { size, .. } => *size,
        }
    }

    pub fn output_size(&self) -> usize {
        match self {
            LayerSpec::Flatten { input_shape } => element_count(input_shape),
            LayerSpec::Dense { output_size, .. } => *output_size,
            LayerSpec::Dropout { size, .. } => *size,
        }
    }

    /// Tensor shapes the layer owns, in flattening order.
    ///
    /// Dense layers own a `[input_size, output_size]` kernel followed by an
    /// `[output_size]` bias. Flatten and dropout own nothing.
    pub fn tensor_shapes(&self) -> LayerShape {
        match self {
            LayerSpec::Dense {
                input_size,
                output_size,
                ..
            } => vec![vec![*input_size, *output_size], vec![*output_size]],
            LayerSpec::Flatten { .. } | LayerSpec::Dropout { .. } => Vec::new(),
        }
    }

    /// Checks sizes and rates that no layer may violate.
    fn check(&self) -> std::result::Result<(), String> {
        match self {
            LayerSpec::Flatten { input_shape } => {
                if input_shape.is_empty() || input_shape.contains(&0) {
                    return Err(format!(
                        "input_shape {:?} must have positive dimensions",
                        input_shape
                    ));
                }
            }
            LayerSpec::Dense {
                input_size,
                output_size,
                ..
            } => {
                if *input_size == 0 {
                    return Err("input_size must be greater than 0".into());
                }
                if *output_size == 0 {
                    return Err("output_size must be greater than 0".into());
                }
            }
            LayerSpec::Dropout { size, drop_rate } => {
                if *size == 0 {
                    return Err("size must be greater than 0".into());
                }
                if !(0.0..1.0).contains(drop_rate) {
                    return Err("drop_rate must be in range [0.0, 1.0)".into());
                }
            }
        }
        Ok(())
    }

    /// Parses one layer entry. Size and rate checks happen in
    /// `ModelArchitecture::new`.
    fn from_config(layer: &LayerConfig, index: usize) -> Result<Self> {
        let invalid = |message: String| {
            ValidatorError::InvalidArchitecture(format!("Layer {}: {}", index, message))
        };

        match layer.layer_type.to_lowercase().as_str() {
            "flatten" => {
                let input_shape = layer
                    .input_shape
                    .clone()
                    .ok_or_else(|| invalid("Flatten layer requires 'input_shape'".into()))?;
                Ok(LayerSpec::Flatten { input_shape })
            }
            "dense" => {
                let input_size = layer
                    .input_size
                    .ok_or_else(|| invalid("Dense layer requires 'input_size'".into()))?;
                let output_size = layer
                    .output_size
                    .ok_or_else(|| invalid("Dense layer requires 'output_size'".into()))?;
                let activation = match layer.activation.as_deref() {
                    None => Activation::Linear,
                    Some(name) => Activation::from_name(name).ok_or_else(|| {
                        invalid(format!(
                            "Invalid activation '{}'. Must be one of: linear, relu",
                            name
                        ))
                    })?,
                };
                Ok(LayerSpec::Dense {
                    input_size,
                    output_size,
                    activation,
                })
            }
            "dropout" => {
                let size = layer
                    .size
                    .ok_or_else(|| invalid("Dropout layer requires 'size'".into()))?;
                let drop_rate = layer
                    .drop_rate
                    .ok_or_else(|| invalid("Dropout layer requires 'drop_rate'".into()))?;
                Ok(LayerSpec::Dropout { size, drop_rate })
            }
            _ => Err(invalid(format!(
                "Invalid layer type '{}'. Must be one of: flatten, dense, dropout",
                layer.layer_type
            ))),
        }
    }

    fn to_config(&self) -> LayerConfig {
        match self {
            LayerSpec::Flatten { input_shape } => LayerConfig {
                layer_type: "flatten".into(),
                input_shape: Some(input_shape.clone()),
                ..LayerConfig::default()
            },
            LayerSpec::Dense {
                input_size,
                output_size,
                activation,
            } => LayerConfig {
                layer_type: "dense".into(),
                input_size: Some(*input_size),
                output_size: Some(*output_size),
                activation: Some(activation.name().into()),
                ..LayerConfig::default()
            },
            LayerSpec::Dropout { size, drop_rate } => LayerConfig {
                layer_type: "dropout".into(),
                size: Some(*size),
                drop_rate: Some(*drop_rate),
                ..LayerConfig::default()
            },
        }
    }
}

/// Immutable, validated layer sequence shared by flattener and rebuilder.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArchitecture {
    version: u32,
    layers: Vec<LayerSpec>,
}

impl ModelArchitecture {
    /// Validates and wraps a layer sequence.
    ///
    /// Checks that:
    /// - Architecture has at least one layer
    /// - Every size is positive, flatten shapes are non-empty and dropout
    ///   rates lie in [0.0, 1.0)
    /// - Layer connections are valid (output size of layer i matches input
    ///   size of layer i+1)
    pub fn new(version: u32, layers: Vec<LayerSpec>) -> Result<Self> {
        if layers.is_empty() {
            return Err(ValidatorError::InvalidArchitecture(
                "Architecture must have at least one layer".into(),
            ));
        }

        for (i, layer) in layers.iter().enumerate() {
            layer.check().map_err(|message| {
                ValidatorError::InvalidArchitecture(format!("Layer {}: {}", i, message))
            })?;
        }

        for (i, pair) in layers.windows(2).enumerate() {
            let current_output = pair[0].output_size();
            let next_input = pair[1].input_size();
            if current_output != next_input {
                return Err(ValidatorError::InvalidArchitecture(format!(
                    "Layer connection mismatch: Layer {} output size ({}) does not match Layer {} input size ({})",
                    i,
                    current_output,
                    i + 1,
                    next_input
                )));
            }
        }

        Ok(Self { version, layers })
    }

    /// Flatten `[20, 20]` into a linear dense layer with 10 units.
    pub fn reference() -> Self {
        Self {
            version: 1,
            layers: vec![
                LayerSpec::Flatten {
                    input_shape: vec![REFERENCE_IMAGE_SIDE, REFERENCE_IMAGE_SIDE],
                },
                LayerSpec::Dense {
                    input_size: REFERENCE_IMAGE_SIDE * REFERENCE_IMAGE_SIDE,
                    output_size: REFERENCE_CLASSES,
                    activation: Activation::Linear,
                },
            ],
        }
    }

    pub fn from_config(config: &ArchitectureConfig) -> Result<Self> {
        let layers = config
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerSpec::from_config(layer, i))
            .collect::<Result<Vec<_>>>()?;
        Self::new(config.version, layers)
    }

    pub fn to_config(&self) -> ArchitectureConfig {
        ArchitectureConfig {
            version: self.version,
            layers: self.layers.iter().map(LayerSpec::to_config).collect(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Per-layer tensor shapes in architecture order.
    pub fn layer_shapes(&self) -> Vec<LayerShape> {
        self.layers.iter().map(LayerSpec::tensor_shapes).collect()
    }

    /// Length of a flat weight vector for this architecture.
    pub fn parameter_count(&self) -> usize {
        self.layer_shapes()
            .iter()
            .flatten()
            .map(|shape| element_count(shape))
            .sum()
    }

    /// Side length of the square images this architecture reads.
    ///
    /// Taken from a leading `[s, s]` flatten layer. Without one, the input
    /// width must be a perfect square. `None` for non-square inputs.
    pub fn image_side(&self) -> Option<usize> {
        if let Some(LayerSpec::Flatten { input_shape }) = self.layers.first() {
            return match input_shape.as_slice() {
                [rows, cols] if rows == cols => Some(*rows),
                _ => None,
            };
        }
        let input_size = self.input_size();
        let side = (input_size as f64).sqrt().round() as usize;
        (side > 0 && side * side == input_size).then_some(side)
    }

    /// Features per input sample.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, LayerSpec::input_size)
    }

    /// Outputs per sample (number of classes).
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, LayerSpec::output_size)
    }

    /// Hex SHA-256 over the version and the structure of every layer.
    ///
    /// Equal fingerprints mean equal flat layouts. Dropout rates are not
    /// part of the digest because they have no effect at inference time.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("v{};", self.version).as_bytes());
        for layer in &self.layers {
            let activation = match layer {
                LayerSpec::Dense { activation, .. } => activation.name(),
                _ => "-",
            };
            hasher.update(
                format!(
                    "{}:{}>{}:{}:{:?};",
                    layer.kind(),
                    layer.input_size(),
                    layer.output_size(),
                    activation,
                    layer.tensor_shapes()
                )
                .as_bytes(),
            );
        }
        format!("{:x}", hasher.finalize())
    }
}

impl Default for ModelArchitecture {
    fn default() -> Self {
        Self::reference()
    }
}

/// Loads and validates an architecture from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use fedval_node::architecture::load_architecture;
///
/// let arch = load_architecture("config/architectures/reference.json").unwrap();
/// assert_eq!(arch.parameter_count(), 4010);
/// ```
pub fn load_architecture(path: impl AsRef<Path>) -> Result<ModelArchitecture> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    let architecture = ModelArchitecture::from_config(&config)?;
    debug!(
        path = %path.display(),
        layers = architecture.layers().len(),
        parameters = architecture.parameter_count(),
        "loaded architecture"
    );
    Ok(architecture)
}
