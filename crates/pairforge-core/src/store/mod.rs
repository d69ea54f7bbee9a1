//! Storage trait definitions (ports).
//!
//! These traits define the persistence interface that the infrastructure
//! layer (pairforge-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod commit;
pub mod draft;
pub mod ledger;
