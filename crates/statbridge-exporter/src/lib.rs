//! statbridge exporter module
//!
//! Scrapes per-index statistics from an Elasticsearch cluster and
//! republishes them as Prometheus series.
//!
//! One collection cycle is: fetch `/_all/_stats` → decode the per-index
//! document → evaluate the metric catalogue for every index → emit the
//! samples, labelled with the index name and the last-known cluster name,
//! followed by the collector's own health series (`up`, `total_scrapes`,
//! `json_parse_failures`). Cycle failures degrade to health-only output;
//! they never escape the collector.
//!
//! # Example
//!
//! ```ignore
//! use prometheus::Registry;
//! use statbridge_clusterinfo::IdentityCache;
//! use statbridge_exporter::{IndicesCollector, MetricsServer};
//!
//! let registry = Registry::new();
//! let identity = IdentityCache::new();
//! let collector = IndicesCollector::new(
//!     reqwest::blocking::Client::new(),
//!     "http://localhost:9200".parse()?,
//!     identity.clone(),
//! )?;
//! registry.register(Box::new(collector))?;
//!
//! let server = MetricsServer::new(registry, "0.0.0.0:9108");
//! // tokio::spawn(server.serve());
//! ```

pub mod catalogue;
pub mod collector;
pub mod error;
pub mod fetcher;
pub mod server;
pub mod types;

pub use collector::IndicesCollector;
pub use error::{CollectError, CollectResult};
pub use fetcher::StatsClient;
pub use server::MetricsServer;
pub use types::{IndexStats, IndexStatsResponse};

// Re-export prometheus types for convenience
pub use prometheus::{Encoder, Registry, TextEncoder};
