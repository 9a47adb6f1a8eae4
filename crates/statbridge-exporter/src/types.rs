//! Decoded shape of the index statistics document.
//!
//! Every numeric field carries `#[serde(default)]` so fields absent from
//! a response decode to zero instead of failing the whole document. The
//! document is rebuilt from scratch on every successful cycle and
//! discarded afterwards.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level `/_all/_stats` response, keyed by index name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatsResponse {
    #[serde(default)]
    pub indices: HashMap<String, IndexStats>,
}

/// Statistics for a single index
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexStats {
    /// Roll-up over primary shards only
    pub primaries: ShardRollup,

    /// Roll-up over all shards (primaries + replicas)
    pub total: ShardRollup,

    /// Per-shard breakdown, present with `level=shards`
    pub shards: HashMap<String, Vec<ShardStats>>,
}

/// Aggregated statistics over a set of shards
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShardRollup {
    pub docs: DocsStats,
    pub store: StoreStats,
    pub indexing: IndexingStats,
    pub search: SearchStats,
    pub segments: SegmentsStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocsStats {
    pub count: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreStats {
    pub size_in_bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexingStats {
    pub index_total: u64,
    pub index_time_in_millis: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchStats {
    pub query_total: u64,
    pub query_time_in_millis: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SegmentsStats {
    pub count: u64,
    pub memory_in_bytes: u64,
}

/// Statistics for one shard copy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShardStats {
    pub routing: ShardRouting,
    pub docs: DocsStats,
    pub store: StoreStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShardRouting {
    pub state: String,
    pub primary: bool,
    pub node: String,
}
