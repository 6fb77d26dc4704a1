//! JWT token issuance and validation
//!
//! Stateless authentication: a signed token carries the user's id, email
//! and role. No session state is kept server-side; expiry is enforced by
//! the `exp` claim.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{User, UserRole};

/// Claims embedded in every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// User email
    pub email: String,
    /// User role at issuance time
    pub role: UserRole,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Check if the token belongs to an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if the token holder can edit content owned by `author_id`.
    ///
    /// Admins can edit anything; authors only their own content.
    pub fn can_edit(&self, author_id: i64) -> bool {
        self.is_admin() || self.sub == author_id
    }
}

/// Issue a signed token for the given user.
pub fn issue_token(user: &User, secret: &str, expiry_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Decode and validate a token, returning its claims.
///
/// Fails on bad signature, malformed token, or expiry.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Invalid or expired token")?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;

    const SECRET: &str = "test-secret";

    fn make_user(id: i64, role: UserRole) -> User {
        let mut user = User::new(
            "user".to_string(),
            "user@example.com".to_string(),
            "User".to_string(),
            "hash".to_string(),
            role,
            UserStatus::Active,
        );
        user.id = id;
        user
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let user = make_user(7, UserRole::Author);
        let token = issue_token(&user, SECRET, 24).unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, UserRole::Author);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let user = make_user(1, UserRole::Admin);
        let token = issue_token(&user, SECRET, 24).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_token("not.a.token", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let user = make_user(1, UserRole::Author);
        // Negative expiry puts `exp` in the past
        let token = issue_token(&user, SECRET, -1).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_claims_permissions() {
        let admin = Claims {
            sub: 1,
            email: "a@example.com".to_string(),
            role: UserRole::Admin,
            iat: 0,
            exp: i64::MAX,
        };
        let author = Claims {
            sub: 2,
            email: "b@example.com".to_string(),
            role: UserRole::Author,
            iat: 0,
            exp: i64::MAX,
        };

        assert!(admin.is_admin());
        assert!(admin.can_edit(999));
        assert!(!author.is_admin());
        assert!(author.can_edit(2));
        assert!(!author.can_edit(1));
    }
}
