//! User service
//!
//! Implements business logic for account management:
//! - Registration (the first account ever becomes an active admin;
//!   everyone after that starts as a pending author awaiting approval)
//! - Sign-in with JWT issuance
//! - Admin-side role/status updates with self-modification protection

use crate::config::AuthConfig;
use crate::db::repositories::UserRepository;
use crate::models::{User, UserRole, UserStatus};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::issue_token;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Invalid email or password")]
    AuthenticationError,

    /// Account exists but may not sign in
    #[error("Account is {0}. Please contact an administrator.")]
    AccountInactive(UserStatus),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// User not found
    #[error("User not found")]
    NotFound,

    /// Admins may not change or delete their own account through the
    /// management endpoints
    #[error("You cannot modify your own account")]
    SelfModification,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Input for user sign-in
#[derive(Debug, Clone)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

/// User service for account management and authentication
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    auth: AuthConfig,
}

impl UserService {
    /// Create a new user service
    pub fn new(repo: Arc<dyn UserRepository>, auth: AuthConfig) -> Self {
        Self { repo, auth }
    }

    /// Check if no users exist yet
    pub async fn is_first_user(&self) -> Result<bool, UserServiceError> {
        let count = self.repo.count().await.context("Failed to count users")?;
        Ok(count == 0)
    }

    /// Register a new user.
    ///
    /// The very first registration bootstraps the system: that account is
    /// created as an active admin. All later registrations are authors in
    /// `pending` status until an admin activates them.
    pub async fn signup(&self, input: SignupInput) -> Result<User, UserServiceError> {
        if self
            .repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        if self
            .repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let (role, status) = if self.is_first_user().await? {
            (UserRole::Admin, UserStatus::Active)
        } else {
            (UserRole::Author, UserStatus::Pending)
        };

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(
            input.username,
            input.email,
            input.name,
            password_hash,
            role,
            status,
        );

        let created = self
            .repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        tracing::info!("New user registered: {} - {}", created.id, created.email);

        Ok(created)
    }

    /// Sign in with credentials.
    ///
    /// Returns the user and a signed JWT on success. The password is
    /// verified before the status check so a suspended account cannot be
    /// probed without knowing its password.
    pub async fn signin(&self, input: SigninInput) -> Result<(User, String), UserServiceError> {
        let user = self
            .repo
            .get_by_email(&input.email)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::AuthenticationError)?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError);
        }

        if !user.is_active() {
            return Err(UserServiceError::AccountInactive(user.status));
        }

        let token = issue_token(&user, &self.auth.jwt_secret, self.auth.jwt_expiry_hours)
            .context("Failed to issue token")?;

        tracing::info!("User signed in: {} - {}", user.id, user.email);

        Ok((user, token))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?)
    }

    /// List all users, most recent first
    pub async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repo.list().await.context("Failed to list users")?)
    }

    /// Update a user's role and/or status (admin operation).
    ///
    /// An admin may not change their own role or status.
    pub async fn update_role_status(
        &self,
        id: i64,
        role: Option<UserRole>,
        status: Option<UserStatus>,
        acting_user_id: i64,
    ) -> Result<User, UserServiceError> {
        if role.is_none() && status.is_none() {
            return Err(UserServiceError::ValidationError(
                "At least one of role or status must be provided".to_string(),
            ));
        }

        let mut user = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or(UserServiceError::NotFound)?;

        if user.id == acting_user_id {
            return Err(UserServiceError::SelfModification);
        }

        if let Some(role) = role {
            user.role = role;
        }
        if let Some(status) = status {
            user.status = status;
        }

        let updated = self
            .repo
            .update(&user)
            .await
            .context("Failed to update user")?;

        tracing::info!("User {} updated by admin {}", id, acting_user_id);

        Ok(updated)
    }

    /// Delete a user (admin operation). An admin may not delete themselves.
    pub async fn delete(&self, id: i64, acting_user_id: i64) -> Result<(), UserServiceError> {
        let user = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or(UserServiceError::NotFound)?;

        if user.id == acting_user_id {
            return Err(UserServiceError::SelfModification);
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete user")?;

        tracing::info!("User {} deleted by admin {}", id, acting_user_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxUserRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> UserService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let auth = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 24,
        };
        UserService::new(SqlxUserRepository::boxed(pool), auth)
    }

    fn signup_input(username: &str, email: &str) -> SignupInput {
        SignupInput {
            username: username.to_string(),
            email: email.to_string(),
            name: "Test User".to_string(),
            password: "Sup3rSecret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_user_becomes_active_admin() {
        let service = setup().await;
        assert!(service.is_first_user().await.unwrap());

        let first = service.signup(signup_input("admin", "admin@example.com")).await.unwrap();
        assert_eq!(first.role, UserRole::Admin);
        assert_eq!(first.status, UserStatus::Active);

        let second = service.signup(signup_input("writer", "writer@example.com")).await.unwrap();
        assert_eq!(second.role, UserRole::Author);
        assert_eq!(second.status, UserStatus::Pending);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicates() {
        let service = setup().await;
        service.signup(signup_input("user", "user@example.com")).await.unwrap();

        let result = service.signup(signup_input("user", "other@example.com")).await;
        assert!(matches!(result, Err(UserServiceError::UserExists(_))));

        let result = service.signup(signup_input("other", "user@example.com")).await;
        assert!(matches!(result, Err(UserServiceError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_signin_success_returns_token() {
        let service = setup().await;
        service.signup(signup_input("admin", "admin@example.com")).await.unwrap();

        let (user, token) = service
            .signin(SigninInput {
                email: "admin@example.com".to_string(),
                password: "Sup3rSecret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "admin@example.com");
        let claims = crate::services::token::decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let service = setup().await;
        service.signup(signup_input("admin", "admin@example.com")).await.unwrap();

        let result = service
            .signin(SigninInput {
                email: "admin@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserServiceError::AuthenticationError)));
    }

    #[tokio::test]
    async fn test_signin_unknown_email() {
        let service = setup().await;
        let result = service
            .signin(SigninInput {
                email: "ghost@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserServiceError::AuthenticationError)));
    }

    #[tokio::test]
    async fn test_signin_pending_account_is_rejected() {
        let service = setup().await;
        service.signup(signup_input("admin", "admin@example.com")).await.unwrap();
        service.signup(signup_input("writer", "writer@example.com")).await.unwrap();

        let result = service
            .signin(SigninInput {
                email: "writer@example.com".to_string(),
                password: "Sup3rSecret".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(UserServiceError::AccountInactive(UserStatus::Pending))
        ));
    }

    #[tokio::test]
    async fn test_admin_activates_pending_author() {
        let service = setup().await;
        let admin = service.signup(signup_input("admin", "admin@example.com")).await.unwrap();
        let writer = service.signup(signup_input("writer", "writer@example.com")).await.unwrap();

        let updated = service
            .update_role_status(writer.id, None, Some(UserStatus::Active), admin.id)
            .await
            .unwrap();
        assert_eq!(updated.status, UserStatus::Active);

        // Activated author can now sign in
        let result = service
            .signin(SigninInput {
                email: "writer@example.com".to_string(),
                password: "Sup3rSecret".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_admin_cannot_modify_self() {
        let service = setup().await;
        let admin = service.signup(signup_input("admin", "admin@example.com")).await.unwrap();

        let result = service
            .update_role_status(admin.id, Some(UserRole::Author), None, admin.id)
            .await;
        assert!(matches!(result, Err(UserServiceError::SelfModification)));

        let result = service.delete(admin.id, admin.id).await;
        assert!(matches!(result, Err(UserServiceError::SelfModification)));
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let service = setup().await;
        let admin = service.signup(signup_input("admin", "admin@example.com")).await.unwrap();
        let writer = service.signup(signup_input("writer", "writer@example.com")).await.unwrap();

        let result = service
            .update_role_status(writer.id, None, None, admin.id)
            .await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = setup().await;
        let admin = service.signup(signup_input("admin", "admin@example.com")).await.unwrap();
        let writer = service.signup(signup_input("writer", "writer@example.com")).await.unwrap();

        service.delete(writer.id, admin.id).await.unwrap();
        assert!(service.get_by_id(writer.id).await.unwrap().is_none());

        let result = service.delete(writer.id, admin.id).await;
        assert!(matches!(result, Err(UserServiceError::NotFound)));
    }
}
