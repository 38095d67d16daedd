//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different backends without modification. The ledger ships with a
//! CSV/YAML filesystem backend; anything that can list and append the
//! three entity types can stand in for it.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Member, Transaction, User};

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user
    async fn store_user(&self, user: &User) -> Result<()>;

    /// Retrieve a specific user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Find a user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List all users ordered by name
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Trait defining the interface for member storage operations
///
/// Members are append-only: there are no update or delete operations.
/// Every operation is scoped to the owning user; a member belonging to
/// another user is invisible.
#[async_trait]
pub trait MemberStorage: Send + Sync {
    /// Store a new member for a user
    async fn store_member(&self, member: &Member) -> Result<()>;

    /// Retrieve a specific member owned by the given user
    async fn get_member(&self, user_id: &str, member_id: &str) -> Result<Option<Member>>;

    /// List all of a user's members ordered by name
    async fn list_members(&self, user_id: &str) -> Result<Vec<Member>>;
}

/// Trait defining the interface for transaction storage operations
///
/// Transactions are append-only and immutable once stored.
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Store a new transaction
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Retrieve a specific transaction owned by the given user
    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>>;

    /// List all of a user's transactions ordered by date descending
    /// (most recent first, same-day entries by creation time descending)
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;

    /// List a user's transactions for one member, same ordering as
    /// `list_transactions`
    async fn list_transactions_for_member(
        &self,
        user_id: &str,
        member_id: &str,
    ) -> Result<Vec<Transaction>>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts the connection type and provides factory methods for creating
/// repositories, so services can be built over any backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of UserStorage this connection creates
    type UserRepository: UserStorage + Clone;

    /// The type of MemberStorage this connection creates
    type MemberRepository: MemberStorage + Clone;

    /// The type of TransactionStorage this connection creates
    type TransactionRepository: TransactionStorage + Clone;

    /// Create a new user repository for this connection
    fn create_user_repository(&self) -> Self::UserRepository;

    /// Create a new member repository for this connection
    fn create_member_repository(&self) -> Self::MemberRepository;

    /// Create a new transaction repository for this connection
    fn create_transaction_repository(&self) -> Self::TransactionRepository;
}
