//! HTTP endpoints.
//!
//! - `/`        : greeting
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use hellometrics_core::metrics::EXPOSITION_CONTENT_TYPE;

use crate::app_state::AppState;

pub async fn root() -> &'static str {
    "Hello World!"
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.registry().render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.client_code().as_str()).into_response()
        }
    }
}
