//! Inbound handlers for the proxied surface.
//!
//! [`root_handler`] serves the static `GET /` descriptor and
//! [`search_handler`] serves `POST /search`. Submodules hold the
//! validated query type ([`query`]), the failure taxonomy ([`failure`])
//! and the forwarding logic ([`forward`]).

pub mod failure;
pub mod forward;
pub mod query;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

pub use failure::{ProxyFailure, UpstreamBody};
pub use forward::{Forwarder, UpstreamResult};
pub use query::{QueryError, SearchParams, SearchQuery};

use crate::middleware::CorrelationId;
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RootDescriptor {
    pub message: String,
    pub status: String,
    pub proxy_target: String,
}

pub async fn root_handler(State(state): State<Arc<AppState>>) -> Json<RootDescriptor> {
    Json(RootDescriptor {
        message: state.config.service.name.clone(),
        status: "running".to_string(),
        proxy_target: state.config.upstream.base_url().to_string(),
    })
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation_id): Extension<CorrelationId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let query = match params
        .map_err(|e| QueryError::Malformed(e.body_text()))
        .and_then(|Query(params)| SearchQuery::try_from(params))
    {
        Ok(query) => query,
        Err(e) => {
            tracing::info!(
                correlation_id = %correlation_id.as_str(),
                error = %e,
                "rejected search request"
            );
            return e.into_response();
        }
    };

    match state.forwarder.forward(&query, correlation_id.as_str()).await {
        Ok(payload) => Json(payload).into_response(),
        Err(failure) => failure.into_response(),
    }
}
