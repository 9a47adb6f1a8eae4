//! One-shot fetch of the index statistics document.

use crate::error::{CollectError, CollectResult};
use reqwest::blocking::Client;
use reqwest::Url;

const STATS_PATH: &str = "_all/_stats";
const STATS_QUERY: &str = "ignore_unavailable=true&level=shards";

/// Blocking client for the cluster stats endpoint.
///
/// The collector runs inside a synchronous `collect()` call, so the
/// request blocks; any deadline enforcement belongs to the scraping side.
pub struct StatsClient {
    client: Client,
    stats_url: Url,
}

impl StatsClient {
    /// Create a client scraping `<base>/_all/_stats`.
    ///
    /// A path on the base URL (e.g. behind a reverse proxy) is preserved.
    pub fn new(client: Client, base_url: Url) -> Self {
        let mut stats_url = base_url;
        let path = format!(
            "{}/{}",
            stats_url.path().trim_end_matches('/'),
            STATS_PATH
        );
        stats_url.set_path(&path);
        stats_url.set_query(Some(STATS_QUERY));

        Self { client, stats_url }
    }

    /// The exact URL queried each cycle
    pub fn stats_url(&self) -> &Url {
        &self.stats_url
    }

    /// Perform one GET and return the raw body.
    ///
    /// Transport failures and non-success statuses both surface as a
    /// single fetch error carrying the target URL. The response is
    /// consumed or dropped on every path, releasing the connection.
    pub fn fetch_index_stats(&self) -> CollectResult<Vec<u8>> {
        let url = self.stats_url.clone();

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| CollectError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().map_err(|source| CollectError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_stats_url_shape() {
        let client = StatsClient::new(
            Client::new(),
            Url::parse("http://localhost:9200").expect("url"),
        );
        assert_eq!(
            client.stats_url().as_str(),
            "http://localhost:9200/_all/_stats?ignore_unavailable=true&level=shards"
        );
    }

    #[test]
    fn test_stats_url_preserves_base_path() {
        let client = StatsClient::new(
            Client::new(),
            Url::parse("http://proxy.local/es/").expect("url"),
        );
        assert_eq!(
            client.stats_url().as_str(),
            "http://proxy.local/es/_all/_stats?ignore_unavailable=true&level=shards"
        );
    }

    #[test]
    fn test_fetch_returns_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"indices":{}}"#);
        let client = StatsClient::new(Client::new(), Url::parse(&base).expect("url"));

        let body = client.fetch_index_stats().expect("fetch");
        assert_eq!(body, br#"{"indices":{}}"#);
    }

    #[test]
    fn test_fetch_non_success_status() {
        let base = serve_once("HTTP/1.1 503 Service Unavailable", "");
        let client = StatsClient::new(Client::new(), Url::parse(&base).expect("url"));

        let result = client.fetch_index_stats();
        assert!(matches!(result, Err(CollectError::Status { .. })));
    }

    #[test]
    fn test_fetch_connection_error() {
        let client = StatsClient::new(
            Client::new(),
            Url::parse("http://127.0.0.1:1").expect("url"),
        );

        let result = client.fetch_index_stats();
        match result {
            Err(CollectError::Http { url, .. }) => {
                assert!(url.contains("/_all/_stats"));
            }
            other => panic!("expected Http error, got {:?}", other.map(|_| ())),
        }
    }
}
