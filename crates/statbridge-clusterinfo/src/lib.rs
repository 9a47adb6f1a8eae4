//! statbridge cluster-info module
//!
//! Discovers and caches the identity of the monitored cluster. The cached
//! record is read synchronously by the collector on every scrape and
//! replaced asynchronously by a background receive loop, so per-index
//! series can carry the cluster name as a label without blocking the
//! scrape path.

pub mod cache;
pub mod retriever;

pub use cache::{ClusterIdentity, IdentityCache, IdentitySender};
pub use retriever::Retriever;
