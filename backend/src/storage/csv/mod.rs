//! CSV/YAML filesystem storage backend.
//!
//! Layout: one directory per user under the base data directory, named from
//! a filesystem-safe slug of the user's email. Each directory holds
//! `user.yaml`, `members.csv` and `transactions.csv`. All writes go through
//! a temp file and rename, so a crash never leaves a half-written file.

pub mod connection;
pub mod member_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use connection::CsvConnection;
pub use member_repository::MemberRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
