//! Federated validation node
//!
//! Rebuilds a model from a flat weight vector produced elsewhere, scores it
//! on a held-out labeled image dataset, and reports results to a parent
//! process.
//!
//! # Modules
//!
//! - `architecture`: Shared, versioned layer sequence and its fingerprint
//! - `weights`: Flattening models into vectors and rebuilding them
//! - `dataset`: Loading labeled image tables
//! - `evaluation`: Evaluator trait and batched accuracy/loss scoring
//! - `validator`: The end-to-end validation call
//! - `wire`: `VECTOR[...]ENDVECTOR` output protocol
//! - `layers`, `model`, `tensor`: Inference building blocks
//! - `config`, `logging`, `error`: Node configuration, tracing, errors

pub mod architecture;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod layers;
pub mod logging;
pub mod model;
pub mod tensor;
pub mod utils;
pub mod validator;
pub mod weights;
pub mod wire;

pub use error::{Result, ValidatorError};
pub use validator::{compute_validation_score, ValidationScore, Validator};
