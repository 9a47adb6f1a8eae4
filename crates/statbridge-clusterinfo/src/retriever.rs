//! Periodic cluster identity discovery.
//!
//! Polls the cluster root endpoint and pushes the decoded cluster name
//! into the identity channel. Failures skip the push; the next tick is
//! the retry.

use crate::cache::{ClusterIdentity, IdentitySender};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by a single identity fetch
#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("failed to get {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
}

/// Subset of the cluster root endpoint response
#[derive(Debug, Deserialize)]
struct RootResponse {
    #[serde(default)]
    cluster_name: String,
}

/// Polls `GET <base>/` on an interval and feeds the identity channel.
pub struct Retriever {
    client: reqwest::Client,
    base_url: Url,
    interval: Duration,
}

impl Retriever {
    /// Create a retriever polling the given base URL
    pub fn new(client: reqwest::Client, base_url: Url, interval: Duration) -> Self {
        Self {
            client,
            base_url,
            interval,
        }
    }

    /// Run the poll loop until the receive side of the channel is closed.
    ///
    /// The first poll happens immediately so the collector sees a real
    /// cluster name as early as possible.
    pub async fn run(self, tx: IdentitySender) {
        let mut ticker = tokio::time::interval(self.interval);
        debug!(url = %self.base_url, "starting cluster info retriever");

        loop {
            ticker.tick().await;

            match self.fetch_identity().await {
                Ok(identity) => {
                    if tx.send(Some(identity)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to retrieve cluster info");
                }
            }
        }

        debug!("exiting cluster info retriever");
    }

    /// One identity fetch: `GET <base>/`, decode the cluster name.
    pub async fn fetch_identity(&self) -> Result<ClusterIdentity, RetrieveError> {
        let url = self.base_url.clone();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| RetrieveError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrieveError::Status {
                url: url.to_string(),
                status,
            });
        }

        let root: RootResponse =
            response
                .json()
                .await
                .map_err(|source| RetrieveError::Http {
                    url: url.to_string(),
                    source,
                })?;

        Ok(ClusterIdentity::new(root.cluster_name))
    }
}
