//! # Shared Types Library
//!
//! Types and helpers shared by every crate that touches wallet sessions.
//!
//! - **[`dto`]**: serializable session records
//!   - **[`dto::wallet`]**: connected-wallet info, transaction results, and
//!     the persisted session snapshot
//! - **[`utils`]**: display helpers
//!   - **[`utils::format_address`]**: format wallet addresses for display
//!   - **[`utils::truncate_address`]**: truncate addresses with ellipsis
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON with default `serde` behavior: snake_case
//! field names, `Option` fields omitted when `None`, and both `Serialize`
//! and `Deserialize` derived so a snapshot written to browser storage can be
//! read back unchanged.

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
