//! Inbound search parameters.
//!
//! [`SearchParams`] is what axum deserializes from the query string;
//! [`SearchQuery`] is the validated value the forwarder accepts. The
//! conversion is the only place emptiness is checked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

pub const FIELD_PARAM: &str = "search_term";
pub const VALUE_PARAM: &str = "value";

/// Raw `?search_term=..&value=..` parameters, both optional at this layer.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search_term: Option<String>,
    pub value: Option<String>,
}

/// A search request: which attribute to match and what to match it against.
///
/// Both parts are non-empty. The field name is not checked against any
/// schema; the upstream decides what fields it understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    field: String,
    value: String,
}

impl SearchQuery {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Result<Self, QueryError> {
        let field = field.into();
        let value = value.into();
        if field.is_empty() {
            return Err(QueryError::Empty(FIELD_PARAM));
        }
        if value.is_empty() {
            return Err(QueryError::Empty(VALUE_PARAM));
        }
        Ok(Self { field, value })
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl TryFrom<SearchParams> for SearchQuery {
    type Error = QueryError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let field = params.search_term.ok_or(QueryError::Missing(FIELD_PARAM))?;
        let value = params.value.ok_or(QueryError::Missing(VALUE_PARAM))?;
        Self::new(field, value)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("missing required query parameter '{0}'")]
    Missing(&'static str),

    #[error("query parameter '{0}' must not be empty")]
    Empty(&'static str),

    #[error("malformed query string: {0}")]
    Malformed(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}
