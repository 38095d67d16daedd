use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use tracing::info;

use super::connection::CsvConnection;
use super::user_repository::UserRepository;
use crate::storage::traits::MemberStorage;
use shared::Member;

/// CSV-based member repository. Each user's members live in a single
/// `members.csv` inside their data directory.
#[derive(Clone)]
pub struct MemberRepository {
    connection: CsvConnection,
    user_repository: UserRepository,
}

impl MemberRepository {
    /// Create a new CSV member repository
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

    /// Read all members from a user's CSV file
    fn read_members(&self, directory_name: &str) -> Result<Vec<Member>> {
        let file_path = self.connection.members_file_path(directory_name);

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let mut csv_reader = Reader::from_path(&file_path)?;
        let mut members = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let phone = record.get(3).unwrap_or("");
            let member = Member {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: record.get(1).unwrap_or("").to_string(),
                name: record.get(2).unwrap_or("").to_string(),
                phone: if phone.is_empty() {
                    None
                } else {
                    Some(phone.to_string())
                },
                created_at: record.get(4).unwrap_or("").to_string(),
            };

            members.push(member);
        }

        Ok(members)
    }

    /// Write all members to a user's CSV file atomically
    fn write_members(&self, directory_name: &str, members: &[Member]) -> Result<()> {
        let file_path = self.connection.members_file_path(directory_name);
        let temp_path = file_path.with_extension("tmp");

        {
            let mut csv_writer = Writer::from_path(&temp_path)?;

            csv_writer.write_record(["id", "user_id", "name", "phone", "created_at"])?;

            for member in members {
                csv_writer.write_record([
                    &member.id,
                    &member.user_id,
                    &member.name,
                    member.phone.as_deref().unwrap_or(""),
                    &member.created_at,
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

#[async_trait]
impl MemberStorage for MemberRepository {
    async fn store_member(&self, member: &Member) -> Result<()> {
        info!("Storing member in CSV: {}", member.id);

        let dir_name = self.user_directory_name(&member.user_id)?;
        let mut members = self.read_members(&dir_name)?;

        members.push(member.clone());
        members.sort_by(|a, b| a.name.cmp(&b.name));

        self.write_members(&dir_name, &members)?;

        info!("Successfully stored member: {}", member.id);
        Ok(())
    }

    async fn get_member(&self, user_id: &str, member_id: &str) -> Result<Option<Member>> {
        let dir_name = match self.user_repository.find_directory_by_user_id(user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };

        let members = self.read_members(&dir_name)?;
        Ok(members.into_iter().find(|m| m.id == member_id))
    }

    async fn list_members(&self, user_id: &str) -> Result<Vec<Member>> {
        let dir_name = match self.user_repository.find_directory_by_user_id(user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };

        let mut members = self.read_members(&dir_name)?;
        members.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::UserStorage;
    use shared::User;
    use tempfile::TempDir;

    async fn setup_test_repo() -> (MemberRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        // Repositories resolve directories through the owning user
        let user_repo = UserRepository::new(connection.clone());
        user_repo
            .store_user(&User {
                id: "user::1".to_string(),
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                password: "secret123".to_string(),
                created_at: "2025-01-01T10:00:00+00:00".to_string(),
            })
            .await
            .unwrap();

        let repo = MemberRepository::new(connection);
        (repo, temp_dir)
    }

    fn test_member(id: &str, name: &str, phone: Option<&str>) -> Member {
        Member {
            id: id.to_string(),
            user_id: "user::1".to_string(),
            name: name.to_string(),
            phone: phone.map(|p| p.to_string()),
            created_at: "2025-01-02T10:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_retrieve_member() {
        let (repo, _temp_dir) = setup_test_repo().await;

        let member = test_member("member::1", "Amit Shah", Some("9876543210"));
        repo.store_member(&member).await.unwrap();

        let retrieved = repo.get_member("user::1", "member::1").await.unwrap();
        assert_eq!(retrieved, Some(member));
    }

    #[tokio::test]
    async fn test_phone_round_trips_including_none() {
        let (repo, _temp_dir) = setup_test_repo().await;

        repo.store_member(&test_member("member::1", "Amit", None))
            .await
            .unwrap();
        repo.store_member(&test_member("member::2", "Bina", Some("5551234")))
            .await
            .unwrap();

        let members = repo.list_members("user::1").await.unwrap();
        assert_eq!(members[0].phone, None);
        assert_eq!(members[1].phone, Some("5551234".to_string()));
    }

    #[tokio::test]
    async fn test_list_members_ordered_by_name() {
        let (repo, _temp_dir) = setup_test_repo().await;

        repo.store_member(&test_member("member::1", "Zubin", None))
            .await
            .unwrap();
        repo.store_member(&test_member("member::2", "Amit", None))
            .await
            .unwrap();

        let members = repo.list_members("user::1").await.unwrap();
        assert_eq!(members[0].name, "Amit");
        assert_eq!(members[1].name, "Zubin");
    }

    #[tokio::test]
    async fn test_members_are_scoped_to_their_user() {
        let (repo, _temp_dir) = setup_test_repo().await;

        repo.store_member(&test_member("member::1", "Amit", None))
            .await
            .unwrap();

        // Unknown user sees nothing
        let members = repo.list_members("user::999").await.unwrap();
        assert!(members.is_empty());

        let member = repo.get_member("user::999", "member::1").await.unwrap();
        assert!(member.is_none());
    }

    #[tokio::test]
    async fn test_store_member_for_unknown_user_fails() {
        let (repo, _temp_dir) = setup_test_repo().await;

        let mut member = test_member("member::1", "Amit", None);
        member.user_id = "user::999".to_string();

        let result = repo.store_member(&member).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("User not found"));
    }
}
