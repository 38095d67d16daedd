use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// A registered user of the ledger. Each user owns their own set of members
/// and transactions; nothing is shared between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// ID in format: "user::<epoch_millis>"
    pub id: String,
    pub name: String,
    /// Unique across users, compared case-insensitively
    pub email: String,
    /// Stored as-is; credential hardening is explicitly out of scope
    pub password: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// A contact against whom money is tracked. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// ID in format: "member::<epoch_millis>"
    pub id: String,
    /// ID of the user who owns this member
    pub user_id: String,
    /// Display name (non-empty, max 100 characters)
    pub name: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Direction of a cash movement relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Money the user lent/paid out to the member
    Given,
    /// Money the user collected back from the member
    Received,
}

impl TransactionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionDirection::Given => "given",
            TransactionDirection::Received => "received",
        }
    }
}

/// A single directed money movement tied to one member. Append-only; never
/// edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// ID in format: "transaction::<given|received>::<epoch_millis>"
    pub id: String,
    /// ID of the member this transaction belongs to
    pub member_id: String,
    /// ID of the user who owns this transaction
    pub user_id: String,
    pub direction: TransactionDirection,
    /// Positive amount in a single currency-agnostic unit
    pub amount: f64,
    /// Optional free-text note (max 256 characters)
    pub note: Option<String>,
    /// User-supplied calendar date (YYYY-MM-DD), not necessarily the
    /// creation time
    pub date: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Settlement status of a member, derived from the sign of their balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// Member owes the user (balance > 0)
    Due,
    /// User owes the member (balance < 0)
    Credit,
    /// Balance is exactly zero
    Settled,
}

impl BalanceStatus {
    /// Dashboard ordering rank: due members first, settled last.
    pub fn sort_priority(&self) -> u8 {
        match self {
            BalanceStatus::Due => 0,
            BalanceStatus::Credit => 1,
            BalanceStatus::Settled => 2,
        }
    }
}

/// A member enriched with their derived balance. Never persisted;
/// recomputed from the transaction history on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: Member,
    /// Sum of amounts of `given` transactions
    pub total_given: f64,
    /// Sum of amounts of `received` transactions
    pub total_received: f64,
    /// total_given - total_received
    pub balance: f64,
    pub status: BalanceStatus,
    /// Date (YYYY-MM-DD) of the member's most recent transaction, if any
    pub last_transaction_date: Option<String>,
}

/// The aggregated dashboard view: filtered and sorted members plus the
/// due/credit totals over that list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub members: Vec<MemberBalance>,
    /// Sum of |balance| over members with status `due`
    pub total_due: f64,
    /// Sum of |balance| over members with status `credit`
    pub total_credit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response after a successful signup or login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMemberRequest {
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberResponse {
    pub member: Member,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberListResponse {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTransactionRequest {
    pub member_id: String,
    pub direction: TransactionDirection,
    /// Positive amount (max two decimal places)
    pub amount: f64,
    /// Optional note (max 256 characters)
    pub note: Option<String>,
    /// Optional date override (YYYY-MM-DD) - uses today if not provided
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    pub transaction: Transaction,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

/// A member's full detail view: derived balance plus transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberDetailResponse {
    pub member_balance: MemberBalance,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

impl User {
    /// Generate a user ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("user::{}", epoch_millis)
    }

    /// Parse a user ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, EntityIdError> {
        parse_simple_id(id, "user")
    }
}

impl Member {
    /// Generate a member ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("member::{}", epoch_millis)
    }

    /// Parse a member ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, EntityIdError> {
        parse_simple_id(id, "member")
    }

    /// Extract timestamp from member ID
    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        Self::parse_id(&self.id)
    }
}

impl Transaction {
    /// Generate transaction ID from direction and timestamp
    pub fn generate_id(direction: TransactionDirection, epoch_millis: u64) -> String {
        format!("transaction::{}::{}", direction.as_str(), epoch_millis)
    }

    /// Parse transaction ID to extract direction and timestamp
    pub fn parse_id(id: &str) -> Result<(TransactionDirection, u64), EntityIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "transaction" {
            return Err(EntityIdError::InvalidFormat);
        }

        let direction = match parts[1] {
            "given" => TransactionDirection::Given,
            "received" => TransactionDirection::Received,
            _ => return Err(EntityIdError::InvalidDirection),
        };

        let epoch_millis = parts[2]
            .parse::<u64>()
            .map_err(|_| EntityIdError::InvalidTimestamp)?;

        Ok((direction, epoch_millis))
    }

    /// Extract epoch timestamp from transaction ID for sorting
    pub fn extract_timestamp(&self) -> Result<u64, EntityIdError> {
        Self::parse_id(&self.id).map(|(_, timestamp)| timestamp)
    }
}

/// Millisecond source for ID generation. Returns a value that is at least
/// `now_millis` and strictly greater than anything previously returned by
/// this process, so entities created within the same millisecond still get
/// distinct IDs.
pub fn unique_epoch_millis(now_millis: u64) -> u64 {
    static LAST: AtomicU64 = AtomicU64::new(0);

    let mut last = LAST.load(Ordering::Relaxed);
    loop {
        let candidate = now_millis.max(last + 1);
        match LAST.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

fn parse_simple_id(id: &str, prefix: &str) -> Result<u64, EntityIdError> {
    let parts: Vec<&str> = id.split("::").collect();
    if parts.len() != 2 || parts[0] != prefix {
        return Err(EntityIdError::InvalidFormat);
    }

    parts[1]
        .parse::<u64>()
        .map_err(|_| EntityIdError::InvalidTimestamp)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityIdError {
    #[error("Invalid ID format")]
    InvalidFormat,
    #[error("Invalid direction in transaction ID")]
    InvalidDirection,
    #[error("Invalid timestamp in ID")]
    InvalidTimestamp,
}

/// First letters of up to the first two words of a name, uppercased.
/// Used for member avatars.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Format an amount for display with two decimal places.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
