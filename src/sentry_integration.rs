//! Optional Sentry error tracking.
//!
//! The returned guard must outlive the server so pending events are
//! flushed on shutdown. An unparseable DSN disables reporting instead of
//! aborting startup.

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    let dsn = dsn
        .parse()
        .map_err(|e| tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled"))
        .ok();

    sentry::init(sentry::ClientOptions {
        dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: Some(concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")).into()),
        ..Default::default()
    })
}
