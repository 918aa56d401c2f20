//! The forwarder: one search request in, one upstream call out.
//!
//! [`Forwarder::forward`] issues a single `POST {base}/search` with the
//! query encoded as parameters, under the search time budget, and maps
//! the outcome. There are no retries. A 2xx body is returned verbatim;
//! the proxy never reshapes or validates the upstream's payload.

use std::time::Duration;

use hyper::{Method, StatusCode};
use serde_json::Value;

use super::failure::{ProxyFailure, UpstreamBody};
use super::query::{SearchQuery, FIELD_PARAM, VALUE_PARAM};
use crate::upstream::UpstreamClient;

/// What the upstream said, once it said something.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    Success(Value),
    UpstreamError {
        status: StatusCode,
        body: UpstreamBody,
    },
}

impl UpstreamResult {
    /// Interpret a complete upstream response.
    ///
    /// Fails only when a 2xx body is not valid JSON. An empty 2xx body
    /// is treated as `null`.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Result<Self, ProxyFailure> {
        if !status.is_success() {
            return Ok(Self::UpstreamError {
                status,
                body: UpstreamBody::from_bytes(body),
            });
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Success(Value::Null));
        }
        serde_json::from_slice(body)
            .map(Self::Success)
            .map_err(|e| ProxyFailure::Internal(format!("upstream returned malformed JSON: {e}")))
    }

    /// Collapse into the caller-facing outcome.
    pub fn into_outcome(self) -> Result<Value, ProxyFailure> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::UpstreamError { status, body } => {
                Err(ProxyFailure::UpstreamReported { status, body })
            }
        }
    }
}

#[derive(Clone)]
pub struct Forwarder {
    client: UpstreamClient,
    budget: Duration,
}

impl Forwarder {
    #[must_use]
    pub const fn new(client: UpstreamClient, budget: Duration) -> Self {
        Self { client, budget }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub async fn forward(
        &self,
        query: &SearchQuery,
        correlation_id: &str,
    ) -> Result<Value, ProxyFailure> {
        let url = self.client.endpoint(
            "search",
            &[(FIELD_PARAM, query.field()), (VALUE_PARAM, query.value())],
        );

        let raw = match self
            .client
            .send(Method::POST, &url, self.budget, correlation_id)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                let failure = ProxyFailure::from_transport(e, self.client.base_url());
                tracing::warn!(
                    correlation_id = %correlation_id,
                    field = %query.field(),
                    kind = failure.kind(),
                    error = %failure,
                    "search forward failed"
                );
                return Err(failure);
            }
        };

        let outcome = UpstreamResult::from_response(raw.status, &raw.body)
            .and_then(UpstreamResult::into_outcome);

        match &outcome {
            Ok(_) => tracing::info!(
                correlation_id = %correlation_id,
                field = %query.field(),
                status = raw.status.as_u16(),
                latency_ms = raw.latency.as_millis() as u64,
                "search forwarded"
            ),
            Err(failure) => tracing::warn!(
                correlation_id = %correlation_id,
                field = %query.field(),
                status = raw.status.as_u16(),
                kind = failure.kind(),
                latency_ms = raw.latency.as_millis() as u64,
                "upstream search did not succeed"
            ),
        }

        outcome
    }
}
