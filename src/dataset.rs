//! Labeled image dataset loading
//!
//! The held-out set is a delimited table: the first column is an integer
//! class label, the remaining `side × side` columns are raw pixel
//! intensities (0-255) of a square image in row-major order. Pixels are
//! normalized to [0, 1] on load.

use crate::architecture::REFERENCE_IMAGE_SIDE;
use crate::error::{Result, ValidatorError};
use std::path::Path;
use tracing::{debug, info};

/// How to read a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Side length of each square image.
    pub side: usize,
    /// Whether the first line is a header row to skip.
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            side: REFERENCE_IMAGE_SIDE,
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// Non-empty set of equally sized square images with one label each.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataset {
    side: usize,
    images: Vec<f32>,
    labels: Vec<u32>,
}

impl ImageDataset {
    /// Builds a dataset from normalized images stored back to back.
    ///
    /// `images` must hold exactly `labels.len() × side × side` values.
    pub fn new(side: usize, images: Vec<f32>, labels: Vec<u32>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ValidatorError::EmptyDataset {
                path: "<memory>".into(),
            });
        }
        let expected = labels.len() * side * side;
        if images.len() != expected {
            return Err(ValidatorError::shape("dataset images", expected, images.len()));
        }
        Ok(Self {
            side,
            images,
            labels,
        })
    }

    /// Loads a dataset with the reference options (header row, comma
    /// delimiter, 20×20 images).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_dataset(path, &DatasetOptions::default())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed dataset; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Pixels per image.
    pub fn image_size(&self) -> usize {
        self.side * self.side
    }

    /// All images, row-major, back to back.
    pub fn images(&self) -> &[f32] {
        &self.images
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn image(&self, index: usize) -> Option<&[f32]> {
        let size = self.image_size();
        self.images.get(index * size..(index + 1) * size)
    }

    pub fn pixel(&self, index: usize, row: usize, col: usize) -> Option<f32> {
        if row >= self.side || col >= self.side {
            return None;
        }
        self.image(index).map(|image| image[row * self.side + col])
    }
}

fn parse_label(field: &str, row: usize) -> Result<u32> {
    let field = field.trim();
    if let Ok(label) = field.parse::<u32>() {
        return Ok(label);
    }
    // Tools that round-trip through floats write labels as "3.0".
    match field.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 => {
            Ok(value as u32)
        }
        _ => Err(ValidatorError::Parse {
            row,
            column: 0,
            value: field.to_string(),
        }),
    }
}

/// Reads and normalizes a labeled image table.
///
/// # Errors
///
/// * `EmptyDataset` - the file has no data rows
/// * `ShapeMismatch` - a row does not have `side × side` pixel columns
/// * `Parse` - a label or pixel is not numeric
/// * `Io` / `Csv` - the file cannot be read
pub fn load_dataset(path: impl AsRef<Path>, options: &DatasetOptions) -> Result<ImageDataset> {
    let path = path.as_ref();
    let image_size = options.side * options.side;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_path(path)?;

    let mut images = Vec::new();
    let mut labels = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut fields = record.iter();

        let label = match fields.next() {
            Some(field) => parse_label(field, row)?,
            None => continue,
        };

        let pixel_count = record.len() - 1;
        if pixel_count != image_size {
            return Err(ValidatorError::shape(
                format!("dataset row {} pixels", row),
                image_size,
                pixel_count,
            ));
        }

        for (column, field) in fields.enumerate() {
            let value: f32 = field.trim().parse().map_err(|_| ValidatorError::Parse {
                row,
                column: column + 1,
                value: field.to_string(),
            })?;
            images.push(value / 255.0);
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(ValidatorError::EmptyDataset {
            path: path.display().to_string(),
        });
    }

    debug!(side = options.side, "parsed dataset rows");
    info!(path = %path.display(), rows = labels.len(), "loaded dataset");

    Ok(ImageDataset {
        side: options.side,
        images,
        labels,
    })
}
