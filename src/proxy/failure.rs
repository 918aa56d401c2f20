//! Normalized failure vocabulary for the search path.
//!
//! Every way a forward can go wrong ends up as one [`ProxyFailure`].
//! Upstream-reported statuses are passed through verbatim; failures the
//! proxy observes itself use 503 (unreachable), 504 (timeout) and 500
//! (anything else). The response body is always `{"detail": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::upstream::TransportError;

pub const GENERIC_UPSTREAM_ERROR: &str = "Error from upstream server";

/// Body of a non-2xx upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Text(String),
}

impl UpstreamBody {
    /// Parsed JSON when possible, raw text otherwise, a generic message
    /// when the body is empty.
    #[must_use]
    pub fn from_bytes(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::Text(GENERIC_UPSTREAM_ERROR.to_string());
        }
        serde_json::from_slice(body).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(body).into_owned()),
            Self::Json,
        )
    }

    fn into_value(self) -> Value {
        match self {
            Self::Json(v) => v,
            Self::Text(s) => Value::String(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProxyFailure {
    #[error("cannot connect to upstream at {upstream}")]
    ConnectionUnreachable { upstream: String },

    #[error("upstream timed out")]
    TimedOut,

    #[error("upstream reported {status}")]
    UpstreamReported {
        status: StatusCode,
        body: UpstreamBody,
    },

    #[error("{0}")]
    Internal(String),
}

impl ProxyFailure {
    /// Classify a transport-level error from a call to `upstream`.
    #[must_use]
    pub fn from_transport(err: TransportError, upstream: &str) -> Self {
        match err {
            TransportError::Connect(_) => Self::ConnectionUnreachable {
                upstream: upstream.to_string(),
            },
            TransportError::Timeout(_) => Self::TimedOut,
            TransportError::Other(message) => Self::Internal(message),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ConnectionUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::TimedOut => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamReported { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionUnreachable { .. } => "unreachable",
            Self::TimedOut => "timeout",
            Self::UpstreamReported { .. } => "upstream_error",
            Self::Internal(_) => "internal",
        }
    }

    /// The `detail` value returned to the caller.
    #[must_use]
    pub fn detail(self) -> Value {
        match self {
            Self::ConnectionUnreachable { upstream } => Value::String(format!(
                "Cannot connect to upstream server at {upstream}. Make sure it's running."
            )),
            Self::TimedOut => Value::String("Upstream server timeout".into()),
            Self::UpstreamReported { body, .. } => body.into_value(),
            Self::Internal(message) => Value::String(format!("Proxy error: {message}")),
        }
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(serde_json::json!({ "detail": self.detail() }))).into_response()
    }
}
