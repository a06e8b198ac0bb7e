//! Shape-typed weight tensors
//!
//! A `Tensor` is a flat `f32` buffer plus the shape it is read with. All
//! element traversal is row-major: the last dimension varies fastest, which
//! is the order both the flattener and the rebuilder rely on.

use crate::error::{Result, ValidatorError};

/// Ordered list of dimensions for one tensor.
pub type TensorShape = Vec<usize>;

/// Shapes of every learnable tensor a layer owns, in the layer's fixed
/// tensor order. Empty for layers without parameters.
pub type LayerShape = Vec<TensorShape>;

/// Number of scalars a tensor of `shape` holds.
///
/// The empty shape is a scalar and holds one element.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Dense row-major tensor of `f32` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: TensorShape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a zero-filled tensor of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![0.0f32; element_count(shape)],
        }
    }

    /// Creates a tensor whose elements are produced by `fill`, in row-major
    /// order.
    pub fn from_fn(shape: &[usize], mut fill: impl FnMut() -> f32) -> Self {
        Self {
            shape: shape.to_vec(),
            data: (0..element_count(shape)).map(|_| fill()).collect(),
        }
    }

    /// Wraps `data` as a tensor of `shape`.
    ///
    /// Fails with `ShapeMismatch` when the buffer does not hold exactly
    /// `product(shape)` values; nothing is padded or truncated.
    pub fn from_vec(shape: &[usize], data: Vec<f32>) -> Result<Self> {
        let expected = element_count(shape);
        if data.len() != expected {
            return Err(ValidatorError::shape(
                format!("tensor of shape {:?}", shape),
                expected,
                data.len(),
            ));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Copies a slice into a tensor of `shape`.
    pub fn from_slice(shape: &[usize], data: &[f32]) -> Result<Self> {
        Self::from_vec(shape, data.to_vec())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Values in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major offset of a multi-dimensional index, or `None` when the
    /// index has the wrong rank or is out of bounds.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&i, &dim) in index.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    /// Element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.offset(index).map(|offset| self.data[offset])
    }
}
