//! Layer abstractions for inference
//!
//! This module provides the Layer trait and the layer kinds an architecture
//! can be built from.

mod r#trait;
pub mod dense;
pub mod dropout;
pub mod flatten;

// Re-export the Layer trait for convenience
pub use dense::{Activation, DenseLayer};
pub use dropout::DropoutLayer;
pub use flatten::FlattenLayer;
pub use r#trait::Layer;
