//! Shared client for the single upstream service.
//!
//! [`UpstreamClient`] wraps the pooled hyper client built by
//! [`server::build_http_client`](crate::server::build_http_client) and the
//! upstream base URL. Every call takes its own time budget, so the search
//! path and the health probe can share one connection pool while using
//! different timeouts. Cloning is cheap and clones share the pool.

use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, StatusCode};
use url::Url;

use crate::server::HttpClient;

/// A fully-read upstream response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub latency: Duration,
}

/// Why an upstream call produced no response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection to upstream could not be established: {0}")]
    Connect(String),

    #[error("no response within {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: HttpClient,
    base: Url,
}

impl UpstreamClient {
    /// Parses `base_url` once; a trailing slash is tolerated.
    pub fn new(http: HttpClient, base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Build `{base}/{path}` with `params` percent-encoded as the query string.
    ///
    /// Any path already on the base URL is kept as a prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Send one request with an empty body and read the whole response,
    /// all within `budget`.
    ///
    /// The request future is awaited inline: dropping the returned future
    /// abandons the upstream call and releases its connection.
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        budget: Duration,
        correlation_id: &str,
    ) -> Result<RawResponse, TransportError> {
        let start = Instant::now();

        let request = hyper::Request::builder()
            .method(method)
            .uri(url.as_str())
            .header("x-correlation-id", correlation_id)
            .body(Full::new(Bytes::new()))
            .map_err(|e| TransportError::Other(format!("invalid upstream request: {e}")))?;

        let exchange = async {
            let response = self.http.request(request).await.map_err(|e| {
                if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TransportError::Other(format!("body read error: {e}")))?
                .to_bytes();
            Ok::<_, TransportError>((status, body))
        };

        let (status, body) = tokio::time::timeout(budget, exchange)
            .await
            .map_err(|_| TransportError::Timeout(budget))??;

        Ok(RawResponse {
            status,
            body,
            latency: start.elapsed(),
        })
    }
}
