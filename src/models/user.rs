//! User model
//!
//! This module defines the User entity and related types for the Tandem backend.
//!
//! Users are either administrators (full access to every resource) or authors
//! (may publish news articles). New accounts start in `pending` status and
//! must be activated by an administrator before they can sign in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered backend account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Full display name
    pub name: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role
    pub role: UserRole,
    /// Account status
    pub status: UserStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(
        username: String,
        email: String,
        name: String,
        password_hash: String,
        role: UserRole,
        status: UserStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            name,
            password_hash,
            role,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if the user may sign in
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Check if the user can edit the given content.
    ///
    /// Admins can edit any content; authors only their own.
    pub fn can_edit(&self, author_id: i64) -> bool {
        self.is_admin() || self.id == author_id
    }
}

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access
    Admin,
    /// Author - can manage own news articles
    Author,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Author
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Author => write!(f, "author"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "author" => Ok(UserRole::Author),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Account status.
///
/// New registrations are `pending` until an administrator approves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Awaiting admin approval - cannot sign in
    Pending,
    /// Normal access
    Active,
    /// Blocked by an administrator - cannot sign in
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl FromStr for UserStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(anyhow::anyhow!("Invalid user status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(role: UserRole, status: UserStatus) -> User {
        User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "Test User".to_string(),
            "hash".to_string(),
            role,
            status,
        )
    }

    #[test]
    fn test_user_new_defaults() {
        let user = make_user(UserRole::Author, UserStatus::Pending);
        assert_eq!(user.id, 0);
        assert_eq!(user.username, "testuser");
        assert!(!user.is_admin());
        assert!(!user.is_active());
    }

    #[test]
    fn test_user_can_edit() {
        let mut admin = make_user(UserRole::Admin, UserStatus::Active);
        admin.id = 1;
        let mut author = make_user(UserRole::Author, UserStatus::Active);
        author.id = 2;

        // Admin can edit anyone's content
        assert!(admin.can_edit(1));
        assert!(admin.can_edit(2));
        assert!(admin.can_edit(999));

        // Author can only edit own content
        assert!(author.can_edit(2));
        assert!(!author.can_edit(1));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("AUTHOR").unwrap(), UserRole::Author);
        assert!(UserRole::from_str("editor").is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(UserStatus::from_str("pending").unwrap(), UserStatus::Pending);
        assert_eq!(UserStatus::from_str("Active").unwrap(), UserStatus::Active);
        assert_eq!(UserStatus::from_str("suspended").unwrap(), UserStatus::Suspended);
        assert!(UserStatus::from_str("banned").is_err());
        assert_eq!(UserStatus::default(), UserStatus::Pending);
    }
}
