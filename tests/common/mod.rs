//! Shared helpers: a fake upstream and a proxy wired to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use search_proxy::config::model::{Config, Upstream};
use search_proxy::server::{self, AppState};

pub type Shutdown = tokio::sync::oneshot::Sender<()>;

/// Serve `router` on an ephemeral local port until the sender fires or drops.
pub async fn serve(router: Router) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// An address nothing is listening on.
pub fn dead_upstream() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn proxy_config(upstream_url: &str, search_timeout: u64, health_timeout: u64) -> Config {
    Config {
        upstream: Upstream {
            url: upstream_url.into(),
            search_timeout,
            health_timeout,
        },
        ..Config::default()
    }
}

pub async fn start_proxy_with(config: Config) -> (SocketAddr, Shutdown) {
    let state = Arc::new(AppState::new(config, server::build_http_client()).unwrap());
    serve(server::build_router(state)).await
}

pub async fn start_proxy(upstream_url: &str) -> (SocketAddr, Shutdown) {
    start_proxy_with(proxy_config(upstream_url, 30_000, 5_000)).await
}
