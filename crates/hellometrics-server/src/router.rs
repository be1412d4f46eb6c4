//! Axum router wiring.
//!
//! Layer order, outermost first: request tracing, panic-to-500, request
//! timing. The timing layer therefore observes panics before they are
//! turned into responses, and also sees axum's own 404/405 responses.

use axum::{middleware, routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(ops::root))
        .route("/metrics", get(ops::metrics));
    instrument(routes, state)
}

/// Wrap `routes` in the instrumentation stack and attach state.
pub fn instrument(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
