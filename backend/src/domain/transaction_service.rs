//! Transaction service domain logic for the ledger.
//!
//! Transactions are append-only: once recorded they are never edited or
//! deleted, so a member's history is always a faithful record and the
//! derived balance can be recomputed from it at any time.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::domain::balance::compute_balance;
use crate::storage::{Connection, MemberStorage, TransactionStorage};
use shared::{
    unique_epoch_millis, CreateTransactionRequest, MemberDetailResponse, Transaction,
    TransactionListResponse, TransactionResponse,
};

/// Smallest amount a transaction can carry
pub const MIN_AMOUNT: f64 = 0.01;
/// Largest amount a transaction can carry
pub const MAX_AMOUNT: f64 = 1_000_000.0;
/// Maximum note length in characters
pub const MAX_NOTE_LENGTH: usize = 256;

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    member_repository: C::MemberRepository,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let transaction_repository = connection.create_transaction_repository();
        let member_repository = connection.create_member_repository();
        Self {
            transaction_repository,
            member_repository,
        }
    }

    /// Record a new transaction against one of the user's members
    pub async fn create_transaction(
        &self,
        user_id: &str,
        request: CreateTransactionRequest,
    ) -> Result<TransactionResponse> {
        info!(
            "Creating {} transaction for user {}: member={}, amount={}",
            request.direction.as_str(),
            user_id,
            request.member_id,
            request.amount
        );

        // The member must exist and belong to this user
        let member = self
            .member_repository
            .get_member(user_id, &request.member_id)
            .await?
            .ok_or_else(|| anyhow!("Member not found: {}", request.member_id))?;

        self.validate_amount(request.amount)?;

        let note = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string());
        if let Some(ref note) = note {
            if note.chars().count() > MAX_NOTE_LENGTH {
                return Err(anyhow!(
                    "Note cannot exceed {} characters",
                    MAX_NOTE_LENGTH
                ));
            }
        }

        let date = match request.date {
            Some(date) => {
                self.validate_date(&date)?;
                date
            }
            None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
        };

        let now = Utc::now();
        let transaction = Transaction {
            id: Transaction::generate_id(
                request.direction,
                unique_epoch_millis(now.timestamp_millis() as u64),
            ),
            member_id: member.id,
            user_id: user_id.to_string(),
            direction: request.direction,
            amount: request.amount,
            note,
            date,
            created_at: now.to_rfc3339(),
        };

        self.transaction_repository
            .store_transaction(&transaction)
            .await?;

        info!("Created transaction: {}", transaction.id);

        Ok(TransactionResponse {
            transaction,
            success_message: "Transaction recorded successfully".to_string(),
        })
    }

    /// List the user's transactions, optionally restricted to one member,
    /// most recent first
    pub async fn list_transactions(
        &self,
        user_id: &str,
        member_id: Option<&str>,
    ) -> Result<TransactionListResponse> {
        let transactions = match member_id {
            Some(member_id) => {
                self.transaction_repository
                    .list_transactions_for_member(user_id, member_id)
                    .await?
            }
            None => self.transaction_repository.list_transactions(user_id).await?,
        };

        info!(
            "Found {} transactions for user {}",
            transactions.len(),
            user_id
        );

        Ok(TransactionListResponse { transactions })
    }

    /// A member's detail view: derived balance plus full history,
    /// most recent first
    pub async fn member_detail(
        &self,
        user_id: &str,
        member_id: &str,
    ) -> Result<MemberDetailResponse> {
        let member = self
            .member_repository
            .get_member(user_id, member_id)
            .await?
            .ok_or_else(|| anyhow!("Member not found: {}", member_id))?;

        // The calculator filters to this member itself; passing the full
        // set keeps it the single place that scoping happens
        let all_transactions = self.transaction_repository.list_transactions(user_id).await?;

        let member_balance = compute_balance(&member, &all_transactions);

        let transactions: Vec<Transaction> = all_transactions
            .into_iter()
            .filter(|t| t.member_id == member_id)
            .collect();

        Ok(MemberDetailResponse {
            member_balance,
            transactions,
        })
    }

    /// Validate a transaction amount
    fn validate_amount(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(anyhow!("Amount must be a positive number"));
        }

        if amount < MIN_AMOUNT {
            return Err(anyhow!("Amount must be at least {:.2}", MIN_AMOUNT));
        }

        if amount > MAX_AMOUNT {
            return Err(anyhow!("Amount cannot exceed {:.0}", MAX_AMOUNT));
        }

        if self.has_too_many_decimal_places(amount) {
            return Err(anyhow!("Amount can have at most 2 decimal places"));
        }

        Ok(())
    }

    /// Check if amount has more than two decimal places. The amount must be
    /// a whole number of hundredths; the tolerance only absorbs float
    /// representation error, which stays far below it for amounts in bounds.
    fn has_too_many_decimal_places(&self, amount: f64) -> bool {
        let cents = amount * 100.0;
        (cents - cents.round()).abs() > 1e-6
    }

    /// Validate a YYYY-MM-DD calendar date
    fn validate_date(&self, date: &str) -> Result<()> {
        // Length check first: chrono accepts unpadded months/days
        if date.len() != 10 {
            return Err(anyhow!("Date must be in YYYY-MM-DD format"));
        }

        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| anyhow!("Date must be a valid YYYY-MM-DD calendar date"))?;

        Ok(())
    }
}
