//! hellometrics core: error types and the in-process metrics registry.
//!
//! This crate carries no HTTP or runtime dependencies. The server crate feeds
//! it label keys and durations; everything here is plain data and atomics.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Fallible paths surface as `HelloMetricsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{HelloMetricsError, Result};
