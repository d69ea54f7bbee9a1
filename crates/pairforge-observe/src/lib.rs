//! Observability plumbing for Pairforge.
//!
//! Structured tracing initialization with an optional OpenTelemetry span
//! bridge. Kept in its own crate so the binary owns the subscriber
//! lifecycle and the library crates only emit `tracing` events.

pub mod tracing_setup;
