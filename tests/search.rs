//! Integration tests for `POST /search` forwarding and failure mapping.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use common::{dead_upstream, proxy_config, serve, start_proxy, start_proxy_with};

async fn wine_search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match (params.get("search_term"), params.get("value")) {
        (Some(field), Some(value)) if field == "name" && value == "Merlot" => (
            StatusCode::OK,
            Json(json!({"results":[{"name":"Merlot Reserve"}]})),
        ),
        (Some(field), Some(value)) => (
            StatusCode::OK,
            Json(json!({"echo": {"search_term": field, "value": value}})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing required query parameters: 'search_term' and 'value'"})),
        ),
    }
}

fn search_url(proxy: std::net::SocketAddr, field: &str, value: &str) -> String {
    let mut url = reqwest::Url::parse(&format!("http://{proxy}/search")).unwrap();
    url.query_pairs_mut()
        .append_pair("search_term", field)
        .append_pair("value", value);
    url.to_string()
}

#[tokio::test]
async fn success_body_passes_through_unchanged() {
    let (upstream, stop_upstream) = serve(Router::new().route("/search", post(wine_search))).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"results":[{"name":"Merlot Reserve"}]}));

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn parameters_reach_upstream_intact() {
    let (upstream, stop_upstream) = serve(Router::new().route("/search", post(wine_search))).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let value = "Côtes du Rhône & Syrah";
    let body: Value = reqwest::Client::new()
        .post(search_url(proxy, "origin", value))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["echo"]["search_term"], "origin");
    assert_eq!(body["echo"]["value"], value);

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn upstream_client_error_keeps_status_and_body() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid search key"})),
            )
        }),
    );
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "colour", "red"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"detail": {"error": "Invalid search key"}}));

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn upstream_server_error_with_text_body() {
    let router = Router::new().route(
        "/search",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "data not loaded") }),
    );
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "data not loaded");

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn upstream_error_without_body_gets_generic_detail() {
    let router = Router::new().route("/search", post(|| async { StatusCode::NOT_FOUND }));
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Error from upstream server");

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn unreachable_upstream_returns_503() {
    let upstream = dead_upstream();
    let (proxy, stop_proxy) = start_proxy(&upstream).await;

    for (field, value) in [("name", "Merlot"), ("brand", "Penfolds")] {
        let resp = reqwest::Client::new()
            .post(search_url(proxy, field, value))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 503);
        let body: Value = resp.json().await.unwrap();
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Cannot connect to upstream server"), "{detail}");
        assert!(detail.contains(&upstream));
    }

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn slow_upstream_returns_504() {
    let router = Router::new().route(
        "/search",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"results": []}))
        }),
    );
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) =
        start_proxy_with(proxy_config(&format!("http://{upstream}"), 200, 100)).await;

    let started = std::time::Instant::now();
    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);
    assert!(started.elapsed() < Duration::from_secs(3));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Upstream server timeout");

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn malformed_success_body_returns_500() {
    let router = Router::new().route("/search", post(|| async { "<html>not json</html>" }));
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("Proxy error: "));

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn missing_or_empty_params_rejected_before_forwarding() {
    // A dead upstream would answer 503 if anything were forwarded.
    let (proxy, stop_proxy) = start_proxy(&dead_upstream()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{proxy}/search?search_term=name"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("'value'"));

    let resp = client
        .post(format!("http://{proxy}/search?search_term=&value=Merlot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn correlation_id_is_forwarded_and_echoed() {
    let router = Router::new().route(
        "/search",
        post(|headers: HeaderMap| async move {
            let id = headers
                .get("x-correlation-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "seen": id }))
        }),
    );
    let (upstream, stop_upstream) = serve(router).await;
    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let resp = reqwest::Client::new()
        .post(search_url(proxy, "name", "Shiraz"))
        .header("x-correlation-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-correlation-id"], "req-42");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["seen"], "req-42");

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn search_requires_post() {
    let (proxy, stop_proxy) = start_proxy(&dead_upstream()).await;

    let resp = reqwest::get(format!("http://{proxy}/search?search_term=name&value=Merlot"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn dropped_caller_cancels_upstream_call() {
    use std::io::Read;
    use std::time::Instant;

    // An upstream that never answers and reports when the proxy hangs up.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let upstream = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = std::sync::mpsc::channel::<Instant>();
    std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        while matches!(conn.read(&mut buf), Ok(n) if n > 0) {}
        let _ = closed_tx.send(Instant::now());
    });

    let (proxy, stop_proxy) = start_proxy(&format!("http://{upstream}")).await;

    let started = Instant::now();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let result = client.post(search_url(proxy, "name", "Merlot")).send().await;
    assert!(result.unwrap_err().is_timeout());

    let closed_at = tokio::task::spawn_blocking(move || closed_rx.recv_timeout(Duration::from_secs(10)))
        .await
        .unwrap()
        .expect("upstream connection was never closed");
    assert!(closed_at.duration_since(started) < Duration::from_secs(5));

    let _ = stop_proxy.send(());
}
