//! hellometrics server library entry.
//!
//! Wires config, application state, the request-timing middleware and the
//! two HTTP endpoints into an axum router. Consumed by the binary
//! (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
