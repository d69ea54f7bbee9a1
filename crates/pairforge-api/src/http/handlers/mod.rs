//! HTTP request handlers for the REST API.

pub mod commit;
pub mod draft;
pub mod version;
