//! Tests for training configuration parsing
//!
//! This file tests the config module including:
//! - Loading the shipped JSON config files
//! - Parsing both optimizer types and their defaults
//! - Handling invalid JSON and missing files
//! - Rejecting out-of-range values

use sequential_nn::config::{load_fit_config, parse_fit_config, OptimizerConfig};
use sequential_nn::NetworkError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

// ============================================================================
// Valid Config Loading Tests
// ============================================================================

mod valid_config_tests {
    use super::*;

    #[test]
    fn test_load_digits_config() {
        let config =
            load_fit_config("config/fit_digits.json").expect("Failed to load digits config");

        assert_eq!(config.batch_size, 256);
        assert_eq!(config.epochs, 30);
        assert_eq!(config.learning_rate, 0.0001);
        assert_eq!(config.seed, None);
        assert_eq!(
            config.optimizer,
            Some(OptimizerConfig::Adam {
                beta1: 0.9,
                beta2: 0.99,
                epsilon: 1e-7
            })
        );
    }

    #[test]
    fn test_load_sgd_config() {
        let config = load_fit_config("config/fit_sgd.json").expect("Failed to load sgd config");

        assert_eq!(config.batch_size, 32);
        assert_eq!(config.epochs, 10);
        assert_eq!(config.learning_rate, 0.05);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.optimizer, Some(OptimizerConfig::Sgd));
    }

    #[test]
    fn test_load_from_temp_file() {
        let temp_file = write_temp_config(
            r#"{
  "batch_size": 4,
  "epochs": 2,
  "learning_rate": 0.5,
  "optimizer": { "type": "adam", "epsilon": 1e-8 }
}"#,
        );
        let config = load_fit_config(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.batch_size, 4);
        assert_eq!(
            config.optimizer,
            Some(OptimizerConfig::Adam {
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 1e-8
            })
        );
        assert_eq!(config.optimizer.unwrap().build().unwrap().name(), "adam");
    }

    #[test]
    fn test_optimizer_is_optional() {
        let config =
            parse_fit_config(r#"{"batch_size": 1, "epochs": 1, "learning_rate": 1.0}"#).unwrap();
        assert!(config.optimizer.is_none());
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_handling_tests {
    use super::*;

    #[test]
    fn test_invalid_json() {
        let temp_file = write_temp_config(r#"{"batch_size": 4, "epochs": 2,}"#);
        let result = load_fit_config(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_fit_config("nonexistent_file.json");
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_missing_required_field() {
        let result = parse_fit_config(r#"{"batch_size": 4, "learning_rate": 0.1}"#);
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_unknown_optimizer_type() {
        let result = parse_fit_config(
            r#"{"batch_size": 4, "epochs": 2, "learning_rate": 0.1, "optimizer": {"type": "rmsprop"}}"#,
        );
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_zero_batch_size() {
        let result = parse_fit_config(r#"{"batch_size": 0, "epochs": 2, "learning_rate": 0.1}"#);
        assert!(matches!(result, Err(NetworkError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_epochs() {
        let result = parse_fit_config(r#"{"batch_size": 4, "epochs": 0, "learning_rate": 0.1}"#);
        assert!(matches!(result, Err(NetworkError::InvalidArgument(_))));
    }

    #[test]
    fn test_non_positive_learning_rate() {
        for lr in ["0.0", "-0.01"] {
            let json = format!(
                r#"{{"batch_size": 4, "epochs": 2, "learning_rate": {}}}"#,
                lr
            );
            let result = parse_fit_config(&json);
            assert!(matches!(result, Err(NetworkError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_invalid_adam_beta() {
        let result = parse_fit_config(
            r#"{"batch_size": 4, "epochs": 2, "learning_rate": 0.1,
                "optimizer": {"type": "adam", "beta1": 1.0}}"#,
        );
        assert!(matches!(result, Err(NetworkError::InvalidArgument(_))));
    }
}
