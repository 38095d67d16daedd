//! # Storage Module
//!
//! Data persistence for the ledger. The domain layer talks to the traits in
//! [`traits`]; the shipping implementation is the CSV/YAML filesystem
//! backend in [`csv`].

pub mod csv;
pub mod traits;

pub use csv::{CsvConnection, MemberRepository, TransactionRepository, UserRepository};
pub use traits::{Connection, MemberStorage, TransactionStorage, UserStorage};
