// src/error.rs
//! Crate-level error type
//!
//! The tick path, lifecycle hooks and classifier are total and never fail;
//! errors only arise while building a monitor from external configuration.

use crate::config::ConfigError;
use thiserror::Error;

/// Unified error type for touch-core
#[derive(Debug, Error)]
pub enum TouchError {
    /// Loading or validating configuration failed
    #[error("[CONFIG] {0}")]
    Config(#[from] ConfigError),

    /// A configuration value was rejected when constructing a monitor
    #[error("[CONFIG] invalid monitor configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

/// Result type alias for touch-core operations
pub type TouchResult<T> = Result<T, TouchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = TouchError::InvalidConfig(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "[CONFIG] invalid monitor configuration: a; b");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TouchError = ConfigError::FileNotFound("touch.toml".to_string()).into();
        assert!(matches!(err, TouchError::Config(ConfigError::FileNotFound(_))));
        assert!(err.to_string().contains("touch.toml"));
    }
}
