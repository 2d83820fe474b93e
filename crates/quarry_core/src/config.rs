//! # Pool Configuration
//!
//! The single tunable of a pool, loadable from a TOML file at startup.
//!
//! ```toml
//! # 0 selects the 64 KiB default.
//! block_size = 262144
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Configuration for a [`Pool`](crate::Pool).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Default block capacity in bytes. 0 selects the built-in default.
    pub block_size: usize,
}

impl PoolConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the text is not a valid
    /// configuration.
    pub fn from_toml_str(text: &str) -> PoolResult<Self> {
        toml::from_str(text).map_err(|e| PoolError::InvalidConfig(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> PoolResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PoolError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_size() {
        let config = PoolConfig::from_toml_str("block_size = 4096").unwrap();
        assert_eq!(config.block_size, 4096);
    }

    #[test]
    fn test_empty_config_uses_default() {
        let config = PoolConfig::from_toml_str("").unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = PoolConfig::from_toml_str("blocksize = 1").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PoolConfig::from_file("/nonexistent/quarry.toml").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(msg) if msg.contains("failed to read")));
    }

    #[test]
    fn test_round_trip_through_file() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("quarry_config_{id}.toml"));

        let config = PoolConfig { block_size: 1 << 20 };
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        assert_eq!(PoolConfig::from_file(&path).unwrap(), config);
        std::fs::remove_file(&path).ok();
    }
}
