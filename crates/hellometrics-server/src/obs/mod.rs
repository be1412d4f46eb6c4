//! Request instrumentation.
//!
//! Every request passes through [`track_requests`], which times the inner
//! stage and records a latency observation and a count keyed by the raw
//! method and path. Raw paths mean one series per distinct path ever seen;
//! there is no templating and no eviction.

pub mod timing;

pub use timing::track_requests;
