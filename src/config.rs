//! Runtime configuration for the transform subsystem.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

/// Largest accepted `move_queue_capacity`
pub const MAX_MOVE_QUEUE_CAPACITY: usize = 1 << 20;

/// Transform subsystem settings. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Tile edge length for grids added without explicit grid info
    pub default_tile_size: u16,

    /// Initial capacity of each move queue
    pub move_queue_capacity: usize,

    /// Drop queued moves whose new coordinates are non-finite or reference a deleted frame
    pub reject_invalid_moves: bool,
}

impl TransformConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TransformConfig = serde_json::from_str(json)
            .map_err(|e| TransformError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TransformError::SerializationError(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_tile_size == 0 {
            return Err(TransformError::ConfigError(
                "default_tile_size must be at least 1".to_string(),
            ));
        }
        if self.move_queue_capacity > MAX_MOVE_QUEUE_CAPACITY {
            return Err(TransformError::ConfigError(format!(
                "move_queue_capacity must be at most {MAX_MOVE_QUEUE_CAPACITY}"
            )));
        }
        Ok(())
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_tile_size: 1,
            move_queue_capacity: 256,
            reject_invalid_moves: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TransformConfig::from_json_str(r#"{ "default_tile_size": 2 }"#).unwrap();
        assert_eq!(config.default_tile_size, 2);
        assert_eq!(config.move_queue_capacity, 256);
        assert!(config.reject_invalid_moves);
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let err = TransformConfig::from_json_str(r#"{ "default_tile_size": 0 }"#).unwrap_err();
        assert!(matches!(err, TransformError::ConfigError(_)));
    }

    #[test]
    fn test_oversized_queue_capacity_rejected() {
        let err = TransformConfig::from_json_str(r#"{ "move_queue_capacity": 18446744073709551615 }"#)
            .unwrap_err();
        assert!(matches!(err, TransformError::ConfigError(_)));

        let limit = format!(r#"{{ "move_queue_capacity": {MAX_MOVE_QUEUE_CAPACITY} }}"#);
        assert!(TransformConfig::from_json_str(&limit).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = TransformConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TransformError::DeserializationError(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TransformConfig {
            reject_invalid_moves: false,
            ..Default::default()
        };
        let json = config.to_json_pretty().unwrap();
        assert_eq!(TransformConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = TransformConfig::from_file("/nonexistent/xform.json").unwrap_err();
        assert!(matches!(err, TransformError::IoError(_)));
    }
}
