//! A reverse-proxy facade in front of a single upstream search service.
//!
//! Inbound `POST /search` requests are forwarded to the upstream with
//! their `search_term` and `value` parameters re-encoded, under a bounded
//! time budget. Upstream failures are translated into a small, fixed
//! vocabulary ([`proxy::ProxyFailure`]). `GET /health` folds the
//! upstream's reachability into the proxy's own, always-200 report.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration model, file loading, overrides and validation.
//! - [`error`] -- Process-level error types using `thiserror`.
//! - [`health`] -- Upstream health aggregation and the `GET /health` handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Correlation ID tagging.
//! - [`proxy`] -- Search query validation, forwarding, and failure mapping.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//! - [`upstream`] -- Pooled upstream client with per-call time budgets.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `sentry-integration` | Sentry error tracking |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate - public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod upstream;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
