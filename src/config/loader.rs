//! Configuration Loader
//!
//! Layers the built-in defaults, an optional TOML file and `GEPX_*`
//! environment variables, then validates the result.

use super::ClientConfig;
use crate::error::{GepxError, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "gepx.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "GEPX_CONFIG";

pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: "GEPX".to_string(),
        }
    }

    /// Use an explicit file. A missing explicit file is an error.
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Override the environment prefix (tests use a unique one per case)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> Result<ClientConfig> {
        let defaults = Config::try_from(&ClientConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        match self.resolve_file() {
            Some((path, required)) => {
                debug!(path = %path.display(), required, "Loading client configuration file");
                builder = builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(required),
                );
            }
            None => debug!("No configuration file found, using defaults"),
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ClientConfig = settings
            .try_deserialize()
            .map_err(|e| GepxError::Configuration(format!("Invalid configuration: {e}")))?;
        config.validate()?;

        debug!(
            channel = %config.channel,
            contract = %config.contract,
            record_kind = %config.record_kind,
            organizations = ?config.organization_names(),
            "Client configuration loaded"
        );
        Ok(config)
    }

    /// Explicit file first, then `GEPX_CONFIG`, then `./gepx.toml` if present
    fn resolve_file(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.file {
            return Some((path.clone(), true));
        }
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            return Some((PathBuf::from(path), true));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        fallback
            .is_file()
            .then(|| (fallback.to_path_buf(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordKind;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
channel = "tradechannel"
record_kind = "transaction"

[gateway]
request_timeout_ms = 5000
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_env_prefix("GEPX_LOADER_TEST_FILE")
            .with_file(Some(file.path().to_path_buf()))
            .load()
            .unwrap();

        assert_eq!(config.channel, "tradechannel");
        assert_eq!(config.contract, "gepx");
        assert_eq!(config.record_kind, RecordKind::Transaction);
        assert_eq!(config.gateway.request_timeout_ms, 5000);
        assert_eq!(config.organizations.len(), 2);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = ConfigLoader::new()
            .with_env_prefix("GEPX_LOADER_TEST_MISSING")
            .with_file(Some(PathBuf::from("/nonexistent/gepx.toml")))
            .load();
        assert!(matches!(result, Err(GepxError::Configuration(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        std::env::set_var("GEPX_LOADER_TEST_ENV_CONTRACT", "gepx-v2");
        let config = ConfigLoader::new()
            .with_env_prefix("GEPX_LOADER_TEST_ENV")
            .load()
            .unwrap();
        std::env::remove_var("GEPX_LOADER_TEST_ENV_CONTRACT");

        assert_eq!(config.contract, "gepx-v2");
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "channel = \"\"").unwrap();

        let result = ConfigLoader::new()
            .with_env_prefix("GEPX_LOADER_TEST_INVALID")
            .with_file(Some(file.path().to_path_buf()))
            .load();
        assert!(result.is_err());
    }
}
