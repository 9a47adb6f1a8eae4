use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Upstream Elasticsearch endpoint
    pub elasticsearch: ElasticsearchConfig,

    /// Metrics HTTP server
    pub server: ServerConfig,

    /// Cluster-info discovery
    pub clusterinfo: ClusterInfoConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate the configuration, returning the first violation found.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.elasticsearch.url;
        if url.is_empty() {
            return Err(ConfigError::invalid_value(
                "elasticsearch.url",
                "must not be empty",
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::invalid_value(
                "elasticsearch.url",
                format!("'{}' is not an http(s) URL", url),
            ));
        }

        if self.server.bind_address.is_empty() {
            return Err(ConfigError::invalid_value(
                "server.bind_address",
                "must not be empty",
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid_value("server.port", "must be non-zero"));
        }

        if self.clusterinfo.poll_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "clusterinfo.poll_interval_secs",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Upstream cluster endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster (e.g. "http://localhost:9200")
    pub url: String,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
        }
    }
}

/// Metrics HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the metrics endpoint to
    pub bind_address: String,

    /// Port for the metrics endpoint
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 9108,
        }
    }
}

impl ServerConfig {
    /// Bind address with port
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Cluster-info discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterInfoConfig {
    /// Seconds between polls of the cluster root endpoint
    pub poll_interval_secs: u64,
}

impl Default for ClusterInfoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter (e.g. "info", "debug")
    pub level: String,

    /// Output format: pretty, compact, or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}
