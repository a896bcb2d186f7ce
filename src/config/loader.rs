//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProvisionerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration file was not accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but carries semantically invalid values. Every
    /// offending field is listed, not just the first.
    #[error("invalid configuration: {}", join_field_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_field_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read, parse, and validate a TOML configuration file.
pub fn load_config(path: &Path) -> Result<ProvisionerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProvisionerConfig = toml::from_str(&content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/provisioner.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = std::env::temp_dir().join("provisioner-invalid-jitter.toml");
        fs::write(&path, "[polling]\njitter = 3.0\n").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_validation_errors_render_as_one_message() {
        let errors = vec![
            ValidationError {
                field: "polling.jitter".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            },
            ValidationError {
                field: "backend.base_url".to_string(),
                message: "'x' is not a valid URL".to_string(),
            },
        ];

        let rendered = ConfigError::Validation(errors).to_string();
        assert!(rendered.contains("polling.jitter"));
        assert!(rendered.contains("backend.base_url"));
        assert!(rendered.contains("; "));
    }
}
