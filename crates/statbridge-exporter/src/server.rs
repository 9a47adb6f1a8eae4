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
//! HTTP server for the Prometheus metrics endpoint.
//!
//! Exposes `/metrics` in text exposition format and a `/health` probe.
//! Gathering runs on the blocking pool: registered collectors perform
//! network I/O inside `collect()`, which must not run on a runtime
//! worker thread.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::{Encoder, Registry, TextEncoder};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// HTTP server serving a Prometheus registry.
#[derive(Clone)]
pub struct MetricsServer {
    registry: Registry,
    addr: String,
}

impl MetricsServer {
    /// Create a server for the given registry and bind address
    pub fn new(registry: Registry, addr: impl Into<String>) -> Self {
        Self {
            registry,
            addr: addr.into(),
        }
    }

    /// The configured bind address
    pub fn bind_address(&self) -> &str {
        &self.addr
    }

    /// Run the server indefinitely. Typically spawned as a task or used
    /// as the main future of the process.
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(self.registry.clone());

        let listener = TcpListener::bind(&self.addr).await?;
        info!("metrics server listening on http://{}/metrics", self.addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("metrics server error: {}", e))
    }
}

/// Handler for `/metrics`: gather every registered collector and encode.
async fn metrics_handler(State(registry): State<Registry>) -> Response {
    let gathered = tokio::task::spawn_blocking(move || {
        let families = registry.gather();
        debug!(families = families.len(), "gathered metric families");

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map(|_| (buffer, encoder.format_type().to_string()))
    })
    .await;

    match gathered {
        Ok(Ok((buffer, content_type))) => {
            (StatusCode::OK, [("content-type", content_type)], buffer).into_response()
        }
        Ok(Err(e)) => {
            error!("failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode metrics: {}", e),
            )
                .into_response()
        }
        Err(e) => {
            error!("metrics gathering task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "metrics gathering task failed".to_string(),
            )
                .into_response()
        }
    }
}

/// Handler for `/health`
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{IntCounter, Opts};
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_server_creation() {
        let server = MetricsServer::new(Registry::new(), "127.0.0.1:19108");
        assert_eq!(server.bind_address(), "127.0.0.1:19108");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_registry() {
        let registry = Registry::new();
        let counter = IntCounter::with_opts(Opts::new(
            "statbridge_test_counter",
            "Counter used by the server test",
        ))
        .expect("counter");
        registry.register(Box::new(counter.clone())).expect("register");
        counter.inc();

        let server = MetricsServer::new(registry, "127.0.0.1:0");

        // Bind explicitly so the test knows the ephemeral port
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(server.registry.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        sleep(Duration::from_millis(50)).await;

        let client = reqwest::Client::new();
        let body = client
            .get(format!("http://{}/metrics", addr))
            .send()
            .await
            .expect("request")
            .text()
            .await
            .expect("body");

        assert!(body.contains("statbridge_test_counter 1"));

        let health = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .expect("request");
        assert_eq!(health.status(), StatusCode::OK);
    }
}
