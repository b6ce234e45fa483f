//! # Data Transfer Objects
//!
//! Serializable records for wallet sessions. The wallet-web front-end writes
//! a [`wallet::StoredSession`] snapshot to browser storage on every identity
//! change and reads it back on startup, so these types are the persistence
//! contract: renaming a field invalidates previously stored sessions.

pub mod wallet;

pub use wallet::*;
