//! Shared domain types for Pairforge.
//!
//! This crate contains the core domain types used across the Pairforge
//! pipeline: Draft, FileVersion, CommitRecord, the completeness validation
//! types, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod commit;
pub mod config;
pub mod conversation;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod validation;
pub mod version;
