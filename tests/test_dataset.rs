//! Tests for loading labeled image tables
//!
//! This file covers:
//! - Label/pixel separation and normalization
//! - Empty datasets
//! - Malformed column counts and non-numeric fields
//! - Header and delimiter options

use approx::assert_relative_eq;
use fedval_node::dataset::{load_dataset, DatasetOptions, ImageDataset};
use fedval_node::ValidatorError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp csv");
    file
}

fn header(pixels: usize) -> String {
    let mut line = String::from("label");
    for i in 0..pixels {
        line.push_str(&format!(",pixel{}", i));
    }
    line.push('\n');
    line
}

fn row(label: u32, pixels: &[u32]) -> String {
    let mut line = label.to_string();
    for p in pixels {
        line.push_str(&format!(",{}", p));
    }
    line.push('\n');
    line
}

// ============================================================================
// Valid Dataset Tests
// ============================================================================

mod valid_dataset_tests {
    use super::*;

    #[test]
    fn test_load_reference_layout() {
        let mut contents = header(400);
        for label in 0..10u32 {
            let pixels: Vec<u32> = (0..400).map(|i| (i as u32 + label) % 256).collect();
            contents.push_str(&row(label, &pixels));
        }
        let file = write_temp_csv(&contents);

        let dataset = ImageDataset::load(file.path()).unwrap();

        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.side(), 20);
        assert_eq!(dataset.image_size(), 400);
        assert_eq!(dataset.labels(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(dataset.images().len(), 4000);
    }

    #[test]
    fn test_pixels_normalized_and_row_major() {
        let contents = header(4) + &row(3, &[0, 51, 255, 102]);
        let file = write_temp_csv(&contents);
        let options = DatasetOptions {
            side: 2,
            ..DatasetOptions::default()
        };

        let dataset = load_dataset(file.path(), &options).unwrap();

        assert_eq!(dataset.labels(), &[3]);
        assert_relative_eq!(dataset.pixel(0, 0, 0).unwrap(), 0.0);
        assert_relative_eq!(dataset.pixel(0, 0, 1).unwrap(), 0.2);
        assert_relative_eq!(dataset.pixel(0, 1, 0).unwrap(), 1.0);
        assert_relative_eq!(dataset.pixel(0, 1, 1).unwrap(), 0.4);
    }

    #[test]
    fn test_all_values_in_unit_interval() {
        let mut contents = header(4);
        contents.push_str(&row(0, &[0, 128, 200, 255]));
        contents.push_str(&row(1, &[255, 255, 1, 0]));
        let file = write_temp_csv(&contents);
        let options = DatasetOptions {
            side: 2,
            ..DatasetOptions::default()
        };

        let dataset = load_dataset(file.path(), &options).unwrap();
        assert!(dataset.images().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_no_header_and_tab_delimiter() {
        let file = write_temp_csv("7\t255\t0\t0\t255\n2\t0\t0\t0\t0\n");
        let options = DatasetOptions {
            side: 2,
            has_headers: false,
            delimiter: b'\t',
        };

        let dataset = load_dataset(file.path(), &options).unwrap();
        assert_eq!(dataset.labels(), &[7, 2]);
        assert_relative_eq!(dataset.pixel(0, 1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_float_pixels_and_labels() {
        let contents = header(4) + "1.0,127.5,0.0,0,255\n";
        let file = write_temp_csv(&contents);
        let options = DatasetOptions {
            side: 2,
            ..DatasetOptions::default()
        };

        let dataset = load_dataset(file.path(), &options).unwrap();
        assert_eq!(dataset.labels(), &[1]);
        assert_relative_eq!(dataset.pixel(0, 0, 0).unwrap(), 0.5);
    }
}

// ============================================================================
// Invalid Dataset Tests
// ============================================================================

mod invalid_dataset_tests {
    use super::*;

    #[test]
    fn test_header_only_is_empty() {
        let file = write_temp_csv(&header(400));
        let result = ImageDataset::load(file.path());
        assert!(matches!(result, Err(ValidatorError::EmptyDataset { .. })));
    }

    #[test]
    fn test_zero_byte_file_is_empty() {
        let file = write_temp_csv("");
        let result = ImageDataset::load(file.path());
        assert!(matches!(result, Err(ValidatorError::EmptyDataset { .. })));
    }

    #[test]
    fn test_short_row_is_shape_mismatch() {
        let pixels = vec![0u32; 399];
        let contents = header(400) + &row(1, &pixels);
        let file = write_temp_csv(&contents);

        let result = ImageDataset::load(file.path());
        assert!(matches!(
            result,
            Err(ValidatorError::ShapeMismatch {
                expected: 400,
                actual: 399,
                ..
            })
        ));
    }

    #[test]
    fn test_long_row_is_shape_mismatch() {
        let contents = header(4) + &row(1, &[0, 0, 0, 0, 0]);
        let file = write_temp_csv(&contents);
        let options = DatasetOptions {
            side: 2,
            ..DatasetOptions::default()
        };

        let result = load_dataset(file.path(), &options);
        assert!(matches!(
            result,
            Err(ValidatorError::ShapeMismatch {
                expected: 4,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_pixel() {
        let contents = header(4) + "1,0,abc,0,0\n";
        let file = write_temp_csv(&contents);
        let options = DatasetOptions {
            side: 2,
            ..DatasetOptions::default()
        };

        let result = load_dataset(file.path(), &options);
        match result {
            Err(ValidatorError::Parse { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("non-numeric pixel accepted"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = ImageDataset::load("does/not/exist.csv");
        assert!(result.is_err());
    }
}
