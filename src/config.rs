//! Node configuration
//!
//! A validation node runs with the reference architecture and dataset
//! layout unless a JSON config overrides them. A relative
//! `architecture_path` is resolved against the directory of the config
//! file. The image side follows the architecture unless `image_side` is
//! given, in which case the two must agree.
//!
//! # Example
//!
//! ```json
//! {
//!   "architecture_path": "architectures/reference.json",
//!   "batch_size": 32,
//!   "has_headers": true,
//!   "delimiter": ",",
//!   "image_side": 20
//! }
//! ```

use crate::architecture::{load_architecture, ModelArchitecture};
use crate::dataset::DatasetOptions;
use crate::error::{Result, ValidatorError};
use crate::evaluation::DEFAULT_BATCH_SIZE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Optional overrides for a validation node. Every field defaults to the
/// reference behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    /// JSON architecture file; the reference architecture when absent
    pub architecture_path: Option<PathBuf>,

    /// Samples per forward pass during evaluation
    pub batch_size: Option<usize>,

    /// Whether dataset files start with a header row (default true)
    pub has_headers: Option<bool>,

    /// Single-character dataset delimiter (default ",")
    pub delimiter: Option<String>,

    /// Side length of the square dataset images (default: from the
    /// architecture)
    pub image_side: Option<usize>,
}

impl NodeConfig {
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Dataset reading options for `architecture`, with defaults filled in.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `image_side` is unset and the architecture
    /// input is not a square image, or when `image_side` does not match
    /// the architecture input width.
    pub fn dataset_options(&self, architecture: &ModelArchitecture) -> Result<DatasetOptions> {
        let defaults = DatasetOptions::default();
        let input_size = architecture.input_size();

        let side = match self.image_side {
            Some(side) if side.checked_mul(side) != Some(input_size) => {
                return Err(ValidatorError::InvalidConfig(format!(
                    "image_side {} does not match the architecture input of {} values",
                    side, input_size
                )));
            }
            Some(side) => side,
            None => architecture.image_side().ok_or_else(|| {
                ValidatorError::InvalidConfig(format!(
                    "architecture input of {} values is not a square image; set image_side",
                    input_size
                ))
            })?,
        };

        Ok(DatasetOptions {
            side,
            has_headers: self.has_headers.unwrap_or(defaults.has_headers),
            delimiter: self
                .delimiter
                .as_deref()
                .and_then(|d| d.bytes().next())
                .unwrap_or(defaults.delimiter),
        })
    }

    /// Loads the configured architecture, or the reference one.
    pub fn architecture(&self) -> Result<ModelArchitecture> {
        match &self.architecture_path {
            Some(path) => load_architecture(path),
            None => Ok(ModelArchitecture::reference()),
        }
    }
}

/// Loads a node configuration from a JSON file.
///
/// The configured architecture is loaded once here so that a bad path or an
/// `image_side` that disagrees with it fails at load time.
///
/// # Examples
///
/// ```no_run
/// use fedval_node::config::load_config;
///
/// let cfg = load_config("config/node.json").unwrap();
/// assert_eq!(cfg.batch_size(), 32);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NodeConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut config: NodeConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;

    if let Some(architecture_path) = config.architecture_path.take() {
        let resolved = match path.parent() {
            Some(dir) if architecture_path.is_relative() => dir.join(architecture_path),
            _ => architecture_path,
        };
        debug!(architecture = %resolved.display(), "resolved architecture path");
        config.architecture_path = Some(resolved);
    }

    config.dataset_options(&config.architecture()?)?;
    Ok(config)
}

fn validate_config(config: &NodeConfig) -> Result<()> {
    if config.batch_size == Some(0) {
        return Err(ValidatorError::InvalidConfig(
            "batch_size must be greater than 0".into(),
        ));
    }

    if config.image_side == Some(0) {
        return Err(ValidatorError::InvalidConfig(
            "image_side must be greater than 0".into(),
        ));
    }

    if let Some(ref delimiter) = config.delimiter {
        if delimiter.len() != 1 || !delimiter.is_ascii() {
            return Err(ValidatorError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                delimiter
            )));
        }
    }

    Ok(())
}
