//! Last-known cluster identity, shared between the receive loop and the
//! scrape path.

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

/// Name used as the cluster label before any identity update has arrived.
pub const UNKNOWN_CLUSTER: &str = "unknown_cluster";

/// Sender half of the identity update channel. `None` means "no update"
/// and is ignored by the receive loop.
pub type IdentitySender = mpsc::Sender<Option<ClusterIdentity>>;

/// Identity of the monitored cluster, used purely as a label value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    /// Human-readable cluster name
    pub cluster_name: String,
}

impl ClusterIdentity {
    /// Create an identity with the given cluster name
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
        }
    }
}

impl Default for ClusterIdentity {
    fn default() -> Self {
        Self {
            cluster_name: UNKNOWN_CLUSTER.to_string(),
        }
    }
}

/// Thread-safe cache of the most recently observed cluster identity.
///
/// Single writer (the receive loop), any number of readers. Updates
/// replace the whole record; readers always get a complete value-copy,
/// never a partially written one. Cloning the cache clones the handle,
/// not the record.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    inner: Arc<RwLock<ClusterIdentity>>,
}

impl IdentityCache {
    /// Create a cache holding the sentinel default identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Value-copy of the last-known identity
    pub fn current(&self) -> ClusterIdentity {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the cached identity, last-writer-wins
    pub fn store(&self, identity: ClusterIdentity) {
        *self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = identity;
    }

    /// Spawn the background receive loop and return the write-side handle.
    ///
    /// The loop drains the channel until every sender is dropped, storing
    /// each non-empty update. `None` pushes and pushes with an empty
    /// cluster name are no-ops. After the loop exits, reads keep
    /// returning the last cached value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_receiver(&self) -> IdentitySender {
        let (tx, mut rx) = mpsc::channel::<Option<ClusterIdentity>>(1);
        let cache = self.clone();

        tokio::spawn(async move {
            debug!("starting cluster info receive loop");
            while let Some(update) = rx.recv().await {
                match update {
                    Some(identity) if !identity.cluster_name.is_empty() => {
                        debug!(cluster = %identity.cluster_name, "received cluster info update");
                        cache.store(identity);
                    }
                    _ => debug!("ignoring empty cluster info update"),
                }
            }
            debug!("exiting cluster info receive loop");
        });

        tx
    }
}
