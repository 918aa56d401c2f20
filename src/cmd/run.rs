//! `search-proxy run` - start the proxy server.
//!
//! Resolves the configuration (file or defaults, then CLI/env
//! overrides), builds the shared upstream client, and serves the Axum
//! router until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config;
use crate::error::ProxyError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let resolved = config::resolve(args.config.as_deref()).await?;
    let config = args.overrides().apply(resolved.config)?;

    let upstream_url = config.upstream.base_url().to_string();
    let search_timeout = config.upstream.search_timeout;
    let health_timeout = config.upstream.health_timeout;

    let state = Arc::new(AppState::new(config, server::build_http_client())?);
    let router = server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %upstream_url,
        search_timeout_ms = search_timeout,
        health_timeout_ms = health_timeout,
        config_source = %resolved.source_name,
        "search-proxy started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("search-proxy stopped");
    Ok(())
}
