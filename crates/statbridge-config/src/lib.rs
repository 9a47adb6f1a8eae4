//! statbridge configuration module
//!
//! Typed configuration for the exporter: the upstream Elasticsearch
//! endpoint, the metrics listen address, cluster-info polling, and
//! logging. Loaded from a TOML file with `STATBRIDGE_*` environment
//! overrides applied on top.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{ClusterInfoConfig, Config, ElasticsearchConfig, LoggingConfig, ServerConfig};
