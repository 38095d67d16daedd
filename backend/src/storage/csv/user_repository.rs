use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info, warn};

use super::connection::{atomic_write, CsvConnection};
use crate::storage::traits::UserStorage;
use shared::User;

/// YAML-backed user repository using filesystem discovery: every
/// subdirectory of the data directory that contains a `user.yaml` is a user.
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Discover all users by scanning directories
    async fn discover_users(&self) -> Result<Vec<User>> {
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            debug!("Base directory doesn't exist, returning empty user list");
            return Ok(Vec::new());
        }

        let mut users = Vec::new();

        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping directory with invalid name: {:?}", path);
                    continue;
                }
            };

            match self.load_user_from_directory(dir_name) {
                Ok(Some(user)) => {
                    debug!("Discovered user {} in directory {}", user.id, dir_name);
                    users.push(user);
                }
                Ok(None) => {
                    debug!("Directory {} doesn't contain a user", dir_name);
                }
                Err(e) => {
                    warn!("Error loading user from directory {}: {}", dir_name, e);
                }
            }
        }

        users.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(users)
    }

    /// Load a user from a specific directory
    fn load_user_from_directory(&self, directory_name: &str) -> Result<Option<User>> {
        let yaml_path = self.connection.user_yaml_path(directory_name);

        if !yaml_path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let user: User = serde_yaml::from_str(&yaml_content)?;

        Ok(Some(user))
    }

    /// Pick a directory name for a user. Distinct emails can slug to the
    /// same name ("ravi.k@" and "ravi_k@"); when the candidate directory is
    /// already claimed by a different user, step to a numbered variant
    /// instead of overwriting their data.
    fn resolve_directory_name(&self, user: &User) -> Result<String> {
        let base = CsvConnection::generate_safe_directory_name(&user.email);
        let mut candidate = base.clone();
        let mut suffix = 2;

        loop {
            match self.load_user_from_directory(&candidate)? {
                Some(existing) if existing.id != user.id => {
                    candidate = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                _ => return Ok(candidate),
            }
        }
    }

    /// Find the directory name that holds a given user ID
    pub fn find_directory_by_user_id(&self, user_id: &str) -> Result<Option<String>> {
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            return Ok(None);
        }

        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            if let Ok(Some(user)) = self.load_user_from_directory(&dir_name) {
                if user.id == user_id {
                    return Ok(Some(dir_name));
                }
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        let dir_name = self.resolve_directory_name(user)?;
        let user_dir = self.connection.user_directory(&dir_name);

        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
            info!("Created user directory: {:?}", user_dir);
        }

        let yaml_content = serde_yaml::to_string(user)?;
        atomic_write(&self.connection.user_yaml_path(&dir_name), yaml_content.as_bytes())?;

        info!("Saved user {} to directory: {}", user.id, dir_name);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let users = self.discover_users().await?;
        Ok(users.into_iter().find(|u| u.id == user_id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email_lower = email.to_lowercase();
        let users = self.discover_users().await?;
        Ok(users
            .into_iter()
            .find(|u| u.email.to_lowercase() == email_lower))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.discover_users().await
    }
}
