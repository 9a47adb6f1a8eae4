//! Collection-cycle error types.
//!
//! The collector does not distinguish failure sub-kinds beyond logging:
//! any variant fails the current cycle, sets `up` to 0, and is absorbed
//! at the collector boundary.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for collection operations
pub type CollectResult<T> = Result<T, CollectError>;

/// Errors that can fail a collection cycle
#[derive(Error, Debug)]
pub enum CollectError {
    /// Transport-level failure reaching the stats endpoint
    #[error("failed to get {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The stats endpoint answered with a non-success status
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    /// The response body was not a valid statistics document
    #[error("failed to decode index stats: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let err = serde_json::from_str::<crate::types::IndexStatsResponse>("{broken")
            .expect_err("must fail");
        let err = CollectError::from(err);
        assert!(err.to_string().starts_with("failed to decode index stats"));
    }

    #[test]
    fn test_status_error_carries_context() {
        let err = CollectError::Status {
            url: "http://es.test:9200/_all/_stats".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        let msg = err.to_string();
        assert!(msg.contains("es.test:9200"));
        assert!(msg.contains("503"));
    }
}
