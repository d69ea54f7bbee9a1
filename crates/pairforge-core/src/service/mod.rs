//! Business logic services (use cases).
//!
//! Services orchestrate store calls, validation, and promotion rules. They
//! depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod hash;
pub mod ledger;
pub mod orchestrator;
pub mod pipeline;
