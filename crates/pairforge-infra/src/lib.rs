//! Infrastructure layer for Pairforge.
//!
//! Contains implementations of the storage and gateway traits defined in
//! `pairforge-core`: SQLite persistence, the GitHub commit gateway, access
//! token providers, and SHA-256 content hashing.

pub mod config;
pub mod crypto;
pub mod github;
pub mod sqlite;
pub mod token;
