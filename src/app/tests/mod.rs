//! Test helpers and utilities for AppRouter tests
//!
//! These are **unit tests**: requests go through the registered router with
//! `oneshot()`, in-process and without network I/O. Tests that need a real
//! listener live under `tests/`.
//!
//! ## Available Helpers
//!
//! - Configuration: `create_base_config()`
//! - Routers: `quiet_router()`, `recording_router()`
//! - Requests: `get_request()`, `request()`
//! - Responses: `get_body_string()`

use crate::{AppRouter, Config, RouteInfo};
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};
use std::sync::{Arc, Mutex};

#[cfg(test)]
pub(crate) mod registration;

// ============================================================================
// Configuration Helpers
// ============================================================================

const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
shutdown_timeout = "1s"

[routing]
log_routes = false

[logging]
format = "compact"
"#;

/// Creates a base test configuration by parsing TOML.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

// ============================================================================
// Router Helpers
// ============================================================================

/// A router with diagnostics turned off.
pub(crate) fn quiet_router() -> AppRouter {
    AppRouter::new(create_base_config()).expect("base config is valid")
}

/// Diagnostics captured by `recording_router()`.
pub(crate) type Recorded = Arc<Mutex<Vec<RouteInfo>>>;

/// A router whose diagnostic sink records every route it reports.
pub(crate) fn recording_router() -> (AppRouter, Recorded) {
    let recorded = Recorded::default();
    let sink = recorded.clone();
    let router = quiet_router().with_diagnostic_sink(move |info: &RouteInfo| {
        sink.lock().unwrap().push(info.clone());
    });
    (router, recorded)
}

// ============================================================================
// Request / Response Helpers
// ============================================================================

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    request(Method::GET, uri)
}

pub(crate) fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) async fn get_body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
