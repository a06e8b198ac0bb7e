//! Shared helpers: deterministic RNG and inference activations.

pub mod activations;
pub mod rng;

pub use activations::{argmax, relu_inplace};
pub use rng::SimpleRng;
