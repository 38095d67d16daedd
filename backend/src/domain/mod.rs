//! # Domain Module
//!
//! Business logic for the ledger, independent of storage backend and of any
//! presentation surface.
//!
//! The heart of it is [`balance`]: the pure functions that derive a member's
//! balance and the dashboard view from a transaction history. Balances are
//! views, never stored, so they cannot go stale.
//!
//! The services around it wrap the storage traits:
//!
//! - **auth_service**: signup and login, yielding stable user IDs
//! - **member_service**: creating and listing a user's members
//! - **transaction_service**: append-only transaction recording with
//!   validation, plus the member detail view
//! - **dashboard_service**: snapshot reads feeding the pure aggregator

pub mod auth_service;
pub mod balance;
pub mod dashboard_service;
pub mod member_service;
pub mod transaction_service;

pub use auth_service::*;
pub use balance::*;
pub use dashboard_service::*;
pub use member_service::*;
pub use transaction_service::*;
