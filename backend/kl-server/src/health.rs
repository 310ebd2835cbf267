use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde_json::json;

/// Name reported by the root endpoint.
pub const SERVER_NAME: &str = "kolibri";

/// GET / - Server identity, the target of the status probe
pub async fn identity() -> Response {
    let identity = json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, Json(identity)).into_response()
}

/// GET /health - Health check with process details
pub async fn health() -> Response {
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "pid": std::process::id(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe (ready to accept traffic?)
pub async fn readiness() -> Response {
    // Routes are only served once the listener is bound.
    (StatusCode::OK, "Ready").into_response()
}
