//! `GET /health` endpoint and the upstream health aggregator.
//!
//! [`HealthAggregator::check_health`] probes the upstream's own
//! `/health` under a short budget and folds the result into a
//! [`HealthReport`]. The proxy always reports itself as `"OK"`: an
//! unreachable upstream is data in the report, never a failure of the
//! endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::{Extension, Json};
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::model::ServiceInfo;
use crate::middleware::CorrelationId;
use crate::server::AppState;
use crate::upstream::UpstreamClient;

pub const SELF_STATUS: &str = "OK";

/// Reachability of the upstream as seen by the last probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Connected,
    Error,
    Disconnected,
    #[default]
    Unknown,
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Disconnected => "disconnected",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamHealth {
    pub url: String,
    pub status: Connectivity,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(rename = "nodejs_server", alias = "upstream", default)]
    pub upstream: UpstreamHealth,
}

#[derive(Clone)]
pub struct HealthAggregator {
    client: UpstreamClient,
    budget: Duration,
    service: ServiceInfo,
}

impl HealthAggregator {
    #[must_use]
    pub const fn new(client: UpstreamClient, budget: Duration, service: ServiceInfo) -> Self {
        Self {
            client,
            budget,
            service,
        }
    }

    /// Build a fresh report. Never fails and never caches.
    ///
    /// Connect failures, timeouts and a 200 whose body is not JSON all
    /// come out as `disconnected`.
    pub async fn check_health(&self, correlation_id: &str) -> HealthReport {
        let url = self.client.endpoint("health", &[]);
        let (connectivity, data) = match self
            .client
            .send(Method::GET, &url, self.budget, correlation_id)
            .await
        {
            Ok(raw) if raw.status == StatusCode::OK => {
                match serde_json::from_slice::<Value>(&raw.body) {
                    Ok(data) => (Connectivity::Connected, Some(data)),
                    Err(e) => {
                        tracing::warn!(
                            correlation_id = %correlation_id,
                            error = %e,
                            "upstream health body is not JSON"
                        );
                        (Connectivity::Disconnected, None)
                    }
                }
            }
            Ok(raw) => {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    status = raw.status.as_u16(),
                    "upstream health probe returned an error status"
                );
                (Connectivity::Error, None)
            }
            Err(e) => {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %e,
                    "upstream health probe failed"
                );
                (Connectivity::Disconnected, None)
            }
        };

        HealthReport {
            status: SELF_STATUS.to_string(),
            service: self.service.name.clone(),
            version: self.service.version.clone(),
            upstream: UpstreamHealth {
                url: self.client.base_url().to_string(),
                status: connectivity,
                data,
            },
        }
    }
}

pub async fn health_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation_id): Extension<CorrelationId>,
) -> Json<HealthReport> {
    Json(state.health.check_health(correlation_id.as_str()).await)
}
