//! Core configuration, loaded from TOML.

use crate::error::{CoreError, CoreResult};
use lattice_types::Curve;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the codec, signer and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Chain the transactions are signed for
    pub chain_id: u64,
    /// Curve family of the chain's accounts
    pub curve: Curve,
    /// Resource budget used when a transaction does not set one
    pub default_joule: u64,
    /// `EnvFilter` directive, e.g. `info` or `lattice_core=debug`
    pub log_level: String,
    /// Emit JSON log lines instead of pretty output
    pub json_logs: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            curve: Curve::Sm2p256v1,
            default_joule: 0,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl CoreConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        toml::from_str(contents).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Save configuration, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Config(e.to_string()))?;
        }
        std::fs::write(path, self.to_toml_string()?)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.curve, Curve::Sm2p256v1);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config = CoreConfig::from_toml_str(
            r#"
            chain_id = 42
            curve = "secp256k1"
            "#,
        )
        .unwrap();
        assert_eq!(config.chain_id, 42);
        assert_eq!(config.curve, Curve::Secp256k1);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_invalid_curve() {
        assert!(matches!(
            CoreConfig::from_toml_str(r#"curve = "ed25519""#),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lattice.toml");
        let config = CoreConfig {
            chain_id: 7,
            curve: Curve::Secp256k1,
            default_joule: 21_000,
            log_level: "debug".to_string(),
            json_logs: true,
        };
        config.save(&path).unwrap();
        assert_eq!(CoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CoreConfig::load(dir.path().join("absent.toml")),
            Err(CoreError::Config(_))
        ));
    }
}
