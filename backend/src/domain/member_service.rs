use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::storage::{Connection, MemberStorage};
use shared::{unique_epoch_millis, CreateMemberRequest, Member, MemberListResponse, MemberResponse};

/// Service for managing a user's members. Members are immutable after
/// creation and are never deleted.
#[derive(Clone)]
pub struct MemberService<C: Connection> {
    member_repository: C::MemberRepository,
}

impl<C: Connection> MemberService<C> {
    /// Create a new MemberService
    pub fn new(connection: Arc<C>) -> Self {
        let member_repository = connection.create_member_repository();
        Self { member_repository }
    }

    /// Create a new member owned by the given user
    pub async fn create_member(
        &self,
        user_id: &str,
        request: CreateMemberRequest,
    ) -> Result<MemberResponse> {
        info!("Creating member for user {}: name={}", user_id, request.name);

        self.validate_create_request(&request)?;

        let now = Utc::now();
        let phone = request
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string());

        let member = Member {
            id: Member::generate_id(unique_epoch_millis(now.timestamp_millis() as u64)),
            user_id: user_id.to_string(),
            name: request.name.trim().to_string(),
            phone,
            created_at: now.to_rfc3339(),
        };

        self.member_repository.store_member(&member).await?;

        info!("Created member: {} with ID: {}", member.name, member.id);

        Ok(MemberResponse {
            member,
            success_message: "Member added successfully".to_string(),
        })
    }

    /// Get one of the user's members by ID
    pub async fn get_member(&self, user_id: &str, member_id: &str) -> Result<Option<Member>> {
        let member = self.member_repository.get_member(user_id, member_id).await?;

        if member.is_none() {
            warn!("Member not found for user {}: {}", user_id, member_id);
        }

        Ok(member)
    }

    /// List all of the user's members
    pub async fn list_members(&self, user_id: &str) -> Result<MemberListResponse> {
        let members = self.member_repository.list_members(user_id).await?;

        info!("Found {} members for user {}", members.len(), user_id);

        Ok(MemberListResponse { members })
    }

    /// Validate a create member request
    fn validate_create_request(&self, request: &CreateMemberRequest) -> Result<()> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Member name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(anyhow!("Member name cannot exceed 100 characters"));
        }

        if let Some(phone) = request.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            self.validate_phone(phone)?;
        }

        Ok(())
    }

    /// Validate a phone number: digits with an optional leading '+',
    /// spaces and dashes allowed, 7 to 15 digits total
    fn validate_phone(&self, phone: &str) -> Result<()> {
        let mut digits = 0;

        for (i, c) in phone.chars().enumerate() {
            match c {
                '0'..='9' => digits += 1,
                '+' if i == 0 => {}
                ' ' | '-' => {}
                _ => return Err(anyhow!("Phone number contains invalid characters")),
            }
        }

        if !(7..=15).contains(&digits) {
            return Err(anyhow!("Phone number must contain 7 to 15 digits"));
        }

        Ok(())
    }
}
