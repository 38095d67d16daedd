use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use tracing::info;

use super::connection::CsvConnection;
use super::user_repository::UserRepository;
use crate::storage::traits::TransactionStorage;
use shared::{Transaction, TransactionDirection};

/// CSV-based transaction repository. Each user's transactions live in a
/// single append-only `transactions.csv` inside their data directory,
/// kept in chronological order on disk.
#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
    user_repository: UserRepository,
}

impl TransactionRepository {
    /// Create a new CSV transaction repository
    pub fn new(connection: CsvConnection) -> Self {
        let user_repository = UserRepository::new(connection.clone());
        Self {
            connection,
            user_repository,
        }
    }

    /// Resolve the data directory for a user ID
    fn user_directory_name(&self, user_id: &str) -> Result<String> {
        self.user_repository
            .find_directory_by_user_id(user_id)?
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", user_id))
    }

    /// Read all transactions from a user's CSV file
    fn read_transactions(&self, directory_name: &str) -> Result<Vec<Transaction>> {
        let file_path = self.connection.transactions_file_path(directory_name);

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let mut csv_reader = Reader::from_path(&file_path)?;
        let mut transactions = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let direction = match record.get(3).unwrap_or("") {
                "received" => TransactionDirection::Received,
                _ => TransactionDirection::Given,
            };
            let note = record.get(5).unwrap_or("");

            let transaction = Transaction {
                id: record.get(0).unwrap_or("").to_string(),
                member_id: record.get(1).unwrap_or("").to_string(),
                user_id: record.get(2).unwrap_or("").to_string(),
                direction,
                amount: record.get(4).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                note: if note.is_empty() {
                    None
                } else {
                    Some(note.to_string())
                },
                date: record.get(6).unwrap_or("").to_string(),
                created_at: record.get(7).unwrap_or("").to_string(),
            };

            transactions.push(transaction);
        }

        Ok(transactions)
    }

    /// Write all transactions to a user's CSV file atomically
    fn write_transactions(&self, directory_name: &str, transactions: &[Transaction]) -> Result<()> {
        let file_path = self.connection.transactions_file_path(directory_name);
        let temp_path = file_path.with_extension("tmp");

        {
            let mut csv_writer = Writer::from_path(&temp_path)?;

            csv_writer.write_record([
                "id",
                "member_id",
                "user_id",
                "direction",
                "amount",
                "note",
                "date",
                "created_at",
            ])?;

            for transaction in transactions {
                csv_writer.write_record([
                    &transaction.id,
                    &transaction.member_id,
                    &transaction.user_id,
                    transaction.direction.as_str(),
                    &transaction.amount.to_string(),
                    transaction.note.as_deref().unwrap_or(""),
                    &transaction.date,
                    &transaction.created_at,
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

#[async_trait]
impl TransactionStorage for TransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        info!("Storing transaction in CSV: {}", transaction.id);

        let dir_name = self.user_directory_name(&transaction.user_id)?;
        let mut transactions = self.read_transactions(&dir_name)?;

        transactions.push(transaction.clone());

        // Chronological on disk; both columns sort correctly as strings
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));

        self.write_transactions(&dir_name, &transactions)?;

        info!("Successfully stored transaction: {}", transaction.id);
        Ok(())
    }

    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let dir_name = match self.user_repository.find_directory_by_user_id(user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };

        let transactions = self.read_transactions(&dir_name)?;
        Ok(transactions.into_iter().find(|t| t.id == transaction_id))
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let dir_name = match self.user_repository.find_directory_by_user_id(user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };

        let mut transactions = self.read_transactions(&dir_name)?;

        // Most recent first
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));

        Ok(transactions)
    }

    async fn list_transactions_for_member(
        &self,
        user_id: &str,
        member_id: &str,
    ) -> Result<Vec<Transaction>> {
        let mut transactions = self.list_transactions(user_id).await?;
        transactions.retain(|t| t.member_id == member_id);
        Ok(transactions)
    }
}
