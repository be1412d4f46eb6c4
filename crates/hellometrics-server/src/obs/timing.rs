use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;
use hellometrics_core::metrics::LabelKey;

use crate::app_state::AppState;

/// Time the inner stage and record it under (method, path).
///
/// Recording happens after the inner stage finishes, whether it produced a
/// response or panicked. A panic is resumed unchanged once recorded, so the
/// outer panic layer still sees it. The response itself is never touched.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let key = LabelKey::new(request.method().as_str(), request.uri().path());

    let outcome = AssertUnwindSafe(next.run(request)).catch_unwind().await;

    record(&state, &key, start.elapsed());

    match outcome {
        Ok(response) => response,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Recording faults are logged and dropped; they never reach the client.
fn record(state: &AppState, key: &LabelKey, elapsed: Duration) {
    let registry = state.registry();
    let names = state.names();

    let recorded = panic::catch_unwind(AssertUnwindSafe(|| {
        let latency = registry.observe_histogram(&names.request_latency, key, elapsed);
        let count = registry.inc_counter(&names.request_count, key);
        latency.and(count)
    }));

    match recorded {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(method = key.method(), path = key.path(), error = %e, "metrics recording failed");
        }
        Err(_) => {
            tracing::error!(method = key.method(), path = key.path(), "metrics recording panicked");
        }
    }
}
