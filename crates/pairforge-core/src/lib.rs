//! Business logic and storage traits for Pairforge.
//!
//! This crate owns the completeness validator, the draft promotion pipeline,
//! and the commit orchestrator, together with the storage and gateway traits
//! they run against. Implementations of those traits live in pairforge-infra;
//! this crate never depends on infrastructure.

pub mod gateway;
pub mod service;
pub mod store;
pub mod token;
pub mod validator;
