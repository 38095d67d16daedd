//! Identity provider for the ledger.
//!
//! Signup and login against the user store. Passwords are compared as
//! plain strings; hardening (hashing, sessions, expiry) is explicitly out
//! of scope for this application.

use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::storage::{Connection, UserStorage};
use shared::{unique_epoch_millis, AuthResponse, LoginRequest, SignupRequest, User};

/// Service for authenticating users and creating accounts
#[derive(Clone)]
pub struct AuthService<C: Connection> {
    user_repository: C::UserRepository,
}

impl<C: Connection> AuthService<C> {
    /// Create a new AuthService
    pub fn new(connection: Arc<C>) -> Self {
        let user_repository = connection.create_user_repository();
        Self { user_repository }
    }

    /// Create a new account
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse> {
        info!("Signing up user: email={}", request.email);

        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Name cannot be empty"));
        }

        let email = request.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(anyhow!("Email address is not valid"));
        }

        if request.password.len() < 6 {
            return Err(anyhow!("Password must be at least 6 characters"));
        }

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            warn!("Signup rejected, email already registered: {}", email);
            return Err(anyhow!("An account with this email already exists"));
        }

        let now = Utc::now();
        let user = User {
            id: User::generate_id(unique_epoch_millis(now.timestamp_millis() as u64)),
            name: name.to_string(),
            email,
            password: request.password,
            created_at: now.to_rfc3339(),
        };

        self.user_repository.store_user(&user).await?;

        info!("Created user: {} with ID: {}", user.name, user.id);

        Ok(AuthResponse {
            user,
            success_message: "Account created successfully".to_string(),
        })
    }

    /// Authenticate a user, yielding their stable user ID
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        info!("Login attempt: email={}", email);

        match self.user_repository.find_user_by_email(&email).await? {
            Some(user) if user.password == request.password => {
                info!("Login succeeded for user: {}", user.id);
                Ok(AuthResponse {
                    user,
                    success_message: "Logged in successfully".to_string(),
                })
            }
            _ => {
                warn!("Login failed for email: {}", email);
                Err(anyhow!("Invalid email or password"))
            }
        }
    }

    /// Look up a user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.user_repository.get_user(user_id).await
    }
}
