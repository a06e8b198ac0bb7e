//! Tests for node configuration files
//!
//! This file covers:
//! - The shipped node config
//! - Partial configs falling back to defaults
//! - Architecture paths relative to the config file
//! - Image side derived from, or checked against, the architecture
//! - Invalid values and malformed JSON

use fedval_node::architecture::ModelArchitecture;
use fedval_node::config::{load_config, NodeConfig};
use fedval_node::dataset::DatasetOptions;
use fedval_node::ValidatorError;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const HIDDEN_DROPOUT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/config/architectures/hidden_dropout.json"
);

const SQUARE_28: &str = r#"{
  "layers": [
    { "layer_type": "flatten", "input_shape": [28, 28] },
    { "layer_type": "dense", "input_size": 784, "output_size": 10 }
  ]
}"#;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

// ============================================================================
// Loading Tests
// ============================================================================

mod loading_tests {
    use super::*;

    #[test]
    fn test_shipped_node_config() {
        let config = load_config("config/node.json").unwrap();

        assert_eq!(config.batch_size(), 32);
        let arch = config.architecture().unwrap();
        assert_eq!(arch, ModelArchitecture::reference());
        assert_eq!(config.dataset_options(&arch).unwrap(), DatasetOptions::default());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_temp_config("{}");
        let config = load_config(file.path()).unwrap();

        assert!(config.architecture_path.is_none());
        assert_eq!(config.batch_size(), NodeConfig::default().batch_size());
        assert_eq!(
            config.dataset_options(&ModelArchitecture::reference()).unwrap(),
            DatasetOptions::default()
        );
    }

    #[test]
    fn test_partial_dataset_overrides() {
        let file = write_temp_config(r#"{ "has_headers": false, "delimiter": ";" }"#);
        let config = load_config(file.path()).unwrap();
        let options = config
            .dataset_options(&config.architecture().unwrap())
            .unwrap();

        assert_eq!(
            options,
            DatasetOptions {
                side: 20,
                has_headers: false,
                delimiter: b';',
            }
        );
    }

    #[test]
    fn test_architecture_path_is_followed() {
        let file = write_temp_config(&format!(
            r#"{{ "architecture_path": {:?} }}"#,
            HIDDEN_DROPOUT
        ));
        let arch = load_config(file.path()).unwrap().architecture().unwrap();
        assert_eq!(arch.version(), 2);
        assert_eq!(arch.parameter_count(), 4120);
    }

    #[test]
    fn test_relative_architecture_path_uses_config_dir() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join("architectures")).unwrap();
        fs::write(dir.path().join("architectures/square28.json"), SQUARE_28).unwrap();
        let config_path = dir.path().join("node.json");
        fs::write(
            &config_path,
            r#"{ "architecture_path": "architectures/square28.json" }"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(
            config.architecture_path.as_deref(),
            Some(dir.path().join("architectures/square28.json").as_path())
        );
        assert_eq!(config.architecture().unwrap().input_size(), 784);
    }

    #[test]
    fn test_shipped_config_from_another_directory() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/node.json");
        let config = load_config(path).unwrap();
        assert!(config.architecture_path.as_ref().unwrap().is_absolute());
        assert_eq!(config.architecture().unwrap(), ModelArchitecture::reference());
    }

    #[test]
    fn test_image_side_follows_architecture() {
        let arch_file = write_temp_config(SQUARE_28);
        let file = write_temp_config(&format!(
            r#"{{ "architecture_path": {:?} }}"#,
            arch_file.path()
        ));

        let config = load_config(file.path()).unwrap();
        let options = config
            .dataset_options(&config.architecture().unwrap())
            .unwrap();
        assert_eq!(options.side, 28);
    }
}

// ============================================================================
// Invalid Config Tests
// ============================================================================

mod invalid_tests {
    use super::*;

    #[test]
    fn test_zero_batch_size() {
        let file = write_temp_config(r#"{ "batch_size": 0 }"#);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ValidatorError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_image_side() {
        let file = write_temp_config(r#"{ "image_side": 0 }"#);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ValidatorError::InvalidConfig(_))));
    }

    #[test]
    fn test_multi_character_delimiter() {
        let file = write_temp_config(r#"{ "delimiter": "||" }"#);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ValidatorError::InvalidConfig(_))));
    }

    #[test]
    fn test_wrong_field_type() {
        let file = write_temp_config(r#"{ "batch_size": "large" }"#);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ValidatorError::Json(_))));
    }

    #[test]
    fn test_missing_architecture_file() {
        let file = write_temp_config(r#"{ "architecture_path": "nowhere/arch.json" }"#);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ValidatorError::Io(_))));
    }

    #[test]
    fn test_image_side_disagreeing_with_architecture() {
        let file = write_temp_config(r#"{ "image_side": 28 }"#);
        match load_config(file.path()) {
            Err(ValidatorError::InvalidConfig(message)) => {
                assert!(message.contains("image_side 28"));
                assert!(message.contains("400"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("mismatched image_side accepted"),
        }
    }
}
