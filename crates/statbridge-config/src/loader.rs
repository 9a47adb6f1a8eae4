// Copyright (C) 2026  statbridge contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader that skips validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a TOML file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).await?;
        let config = self.load_from_str(&content)?;

        info!("Loaded configuration file: {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(&self, content: &str) -> ConfigResult<Config> {
        let config: Config = toml::from_str(content)?;

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from a file with `STATBRIDGE_*` environment
    /// variable overrides applied afterwards.
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let mut config = self.load_file(path).await?;
        self.apply_env_overrides(&mut config)?;

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply environment overrides to an existing configuration.
    ///
    /// Recognized variables: `STATBRIDGE_ES_URL`, `STATBRIDGE_BIND_ADDRESS`,
    /// `STATBRIDGE_PORT`, `STATBRIDGE_LOG_LEVEL`, `STATBRIDGE_LOG_FORMAT`.
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        if let Ok(url) = std::env::var("STATBRIDGE_ES_URL") {
            debug!("Overriding elasticsearch.url from environment");
            config.elasticsearch.url = url;
        }

        if let Ok(addr) = std::env::var("STATBRIDGE_BIND_ADDRESS") {
            config.server.bind_address = addr;
        }

        if let Ok(port) = std::env::var("STATBRIDGE_PORT") {
            config.server.port = port.parse().map_err(|_| {
                ConfigError::env_var_parsing_error(
                    "STATBRIDGE_PORT",
                    port.clone(),
                    "expected a port number",
                )
            })?;
        }

        if let Ok(level) = std::env::var("STATBRIDGE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = std::env::var("STATBRIDGE_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = ConfigLoader::new();
        let result = loader.load_file("/no/such/statbridge.toml").await;
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
            [elasticsearch]
            url = "http://es.test:9200"

            [server]
            port = 9999
            "#
        )
        .expect("write");

        let loader = ConfigLoader::new();
        let config = loader.load_file(file.path()).await.expect("load");
        assert_eq!(config.elasticsearch.url, "http://es.test:9200");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let loader = ConfigLoader::new();
        assert!(matches!(
            loader.load_from_str("this is { not toml"),
            Err(ConfigError::TomlParseError(_))
        ));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let loader = ConfigLoader::new();
        let result = loader.load_from_str(
            r#"
            [elasticsearch]
            url = "not-a-url"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_without_validation_accepts_bad_values() {
        let loader = ConfigLoader::without_validation();
        let config = loader
            .load_from_str(
                r#"
                [elasticsearch]
                url = "not-a-url"
                "#,
            )
            .expect("load without validation");
        assert_eq!(config.elasticsearch.url, "not-a-url");
    }

    #[test]
    fn test_env_override_port_parse_error() {
        let loader = ConfigLoader::new();
        let mut config = Config::default();

        std::env::set_var("STATBRIDGE_PORT", "not-a-port");
        let result = loader.apply_env_overrides(&mut config);
        std::env::remove_var("STATBRIDGE_PORT");

        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParsingError { .. })
        ));
    }
}
