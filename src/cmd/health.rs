//! `search-proxy health` - check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the proxy's own status and the upstream connectivity it reports,
//! as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::ProxyError;
use crate::health::{Connectivity, HealthReport};

pub async fn execute(args: HealthArgs) -> Result<(), ProxyError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| ProxyError::UriParse {
                source: Box::new(e),
            })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| ProxyError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(ProxyError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthReport>(&body) {
        Ok(report) => print!("{}", render_report(&args.url, &report)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn render_report(url: &str, report: &HealthReport) -> String {
    let mark = match report.upstream.status {
        Connectivity::Connected => '\u{2713}',
        _ => '!',
    };
    format!(
        "\u{2713} {} is {} ({url})\n  version:  {}\n  {mark} upstream: {} ({})\n",
        report.service, report.status, report.version, report.upstream.url, report.upstream.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::UpstreamHealth;

    #[test]
    fn render_flags_unhealthy_upstream() {
        let report = HealthReport {
            status: "OK".into(),
            service: "Wine Search Proxy API".into(),
            version: "1.0.0".into(),
            upstream: UpstreamHealth {
                url: "http://localhost:3000".into(),
                status: Connectivity::Disconnected,
                data: None,
            },
        };
        let text = render_report("http://localhost:8000", &report);
        assert!(text.starts_with("\u{2713} Wine Search Proxy API is OK"));
        assert!(text.contains("! upstream: http://localhost:3000 (disconnected)"));
    }
}
