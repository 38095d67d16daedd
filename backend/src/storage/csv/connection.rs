use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::csv::{MemberRepository, TransactionRepository, UserRepository};
use crate::storage::traits::Connection;

/// CsvConnection manages the data directory layout: one subdirectory per
/// user holding `user.yaml`, `members.csv` and `transactions.csv`.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory.
    /// `KHATA_DATA_DIR` overrides; otherwise ~/Documents/Khata Ledger.
    pub fn new_default() -> Result<Self> {
        if let Ok(dir) = std::env::var("KHATA_DATA_DIR") {
            return Self::new(dir);
        }

        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir)
            .join("Documents")
            .join("Khata Ledger");

        Self::new(data_dir)
    }

    /// Get the base data directory
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the directory path for a user's data
    pub fn user_directory(&self, directory_name: &str) -> PathBuf {
        self.base_directory.join(directory_name)
    }

    /// Get the path to a user's YAML configuration file
    pub fn user_yaml_path(&self, directory_name: &str) -> PathBuf {
        self.user_directory(directory_name).join("user.yaml")
    }

    /// Get the path to a user's members CSV file
    pub fn members_file_path(&self, directory_name: &str) -> PathBuf {
        self.user_directory(directory_name).join("members.csv")
    }

    /// Get the path to a user's transactions CSV file
    pub fn transactions_file_path(&self, directory_name: &str) -> PathBuf {
        self.user_directory(directory_name).join("transactions.csv")
    }

    /// Generate a safe filesystem identifier from a user's email.
    /// Converts "Ravi.K@example.com" -> "ravi_k_example_com".
    pub fn generate_safe_directory_name(email: &str) -> String {
        email
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect::<String>()
            .trim_matches('_')
            .to_string()
    }
}

impl Connection for CsvConnection {
    type UserRepository = UserRepository;
    type MemberRepository = MemberRepository;
    type TransactionRepository = TransactionRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_member_repository(&self) -> Self::MemberRepository {
        MemberRepository::new(self.clone())
    }

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        TransactionRepository::new(self.clone())
    }
}

/// Write a file atomically via a temp file in the same directory.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
