//! Configuration for the intake service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main intake service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload directory and database locations
    #[serde(default)]
    pub storage: StorageConfig,
    /// Rendered page settings
    #[serde(default)]
    pub ui: UiConfig,
}

impl IntakeConfig {
    /// Load configuration from a TOML file, then apply `INTAKE_*` overrides.
    ///
    /// With no path, defaults are used as the base.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Override fields from environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("INTAKE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("INTAKE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid INTAKE_PORT '{}': {}", port, e)))?;
        }
        if let Some(size) = lookup("INTAKE_MAX_UPLOAD_SIZE") {
            self.server.max_upload_size = size.parse().map_err(|e| {
                Error::Config(format!("Invalid INTAKE_MAX_UPLOAD_SIZE '{}': {}", size, e))
            })?;
        }
        if let Some(dir) = lookup("INTAKE_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Some(db) = lookup("INTAKE_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(db);
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum intake body size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Shared directory holding every uploaded file
    pub upload_dir: PathBuf,
    /// SQLite database file
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public").join("uploads"),
            database_path: PathBuf::from("form-submissions.db"),
        }
    }
}

/// Rendered page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long status banners stay visible, in milliseconds
    pub banner_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            banner_timeout_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = IntakeConfig::from_toml(
            r#"
            [server]
            port = 9000

            [storage]
            upload_dir = "/srv/uploads"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.storage.database_path, PathBuf::from("form-submissions.db"));
        assert_eq!(config.ui.banner_timeout_ms, 3000);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INTAKE_PORT", "3001"),
            ("INTAKE_DATABASE_PATH", "/tmp/intake.db"),
        ]
        .into_iter()
        .collect();

        let mut config = IntakeConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/intake.db"));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut config = IntakeConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "INTAKE_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
