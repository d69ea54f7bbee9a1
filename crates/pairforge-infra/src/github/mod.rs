//! GitHub commit gateway implementation.
//!
//! This module provides the [`GitHubGateway`] which implements the
//! [`RepositoryGateway`](pairforge_core::gateway::RepositoryGateway) trait
//! against the GitHub REST API, using the Git Data endpoints to build one
//! atomic multi-file commit.

pub mod client;
pub mod types;

pub use client::GitHubGateway;
