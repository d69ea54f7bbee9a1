//! SQLite storage layer.
//!
//! Store implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod commit;
pub mod draft;
pub mod ledger;
pub mod pool;
