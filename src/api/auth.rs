//! Authentication API endpoints
//!
//! - POST /api/auth/signup - Register a new account
//! - POST /api/auth/signin - Sign in and obtain a JWT
//!
//! Sign-in is guarded by a per-identifier limiter on failed attempts.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::middleware::{validation_failed, ApiError, AppState};
use crate::models::User;
use crate::services::{SigninInput, SignupInput, UserServiceError};

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{3,30}$").unwrap());

/// Username: alphanumeric, 3-30 characters
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("username")
            .with_message("username must be 3-30 alphanumeric characters".into()))
    }
}

/// Password: 8-128 characters with at least one lowercase letter, one
/// uppercase letter, and one digit
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = (8..=128).contains(&password.len());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_lower && has_upper && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password").with_message(
            "password must be 8-128 characters and contain an uppercase letter, \
             a lowercase letter, and a digit"
                .into(),
        ))
    }
}

/// Request body for registration
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,
    #[validate(custom(function = validate_password))]
    pub password: String,
}

/// Request body for sign-in
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Public user view returned from auth endpoints
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            status: user.status.to_string(),
        }
    }
}

/// Response for successful registration
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

/// Response for successful sign-in
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

/// Build the public auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

/// POST /api/auth/signup - Register a new account
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate().map_err(|e| validation_failed(&e))?;

    let user = state
        .user_service
        .signup(SignupInput {
            username: body.username,
            email: body.email,
            name: body.name,
            password: body.password,
        })
        .await
        .map_err(|e| match e {
            UserServiceError::UserExists(msg) => ApiError::conflict(msg),
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            _ => ApiError::internal_error("An error occurred during registration"),
        })?;

    let message = if user.is_active() {
        "Administrator account created successfully."
    } else {
        "User registered successfully. Awaiting admin approval."
    };

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: message.to_string(),
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/signin - Sign in and obtain a JWT
async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    body.validate().map_err(|e| validation_failed(&e))?;

    // Throttle brute-force attempts per identifier
    if state.rate_limiter.is_auth_limited(&body.email).await {
        return Err(ApiError::rate_limited(format!(
            "Too many failed sign-in attempts. Please try again in {} seconds.",
            state.rate_limiter.auth_retry_after_seconds()
        )));
    }

    let result = state
        .user_service
        .signin(SigninInput {
            email: body.email.clone(),
            password: body.password,
        })
        .await;

    let (user, token) = match result {
        Ok(ok) => ok,
        Err(e) => {
            if matches!(e, UserServiceError::AuthenticationError) {
                state.rate_limiter.record_failed_auth(&body.email).await;
            }
            return Err(match e {
                UserServiceError::AuthenticationError => {
                    ApiError::unauthorized("Invalid email or password")
                }
                UserServiceError::AccountInactive(status) => ApiError::forbidden(format!(
                    "Account is {}. Please contact admin.",
                    status
                )),
                _ => ApiError::internal_error("An error occurred during login"),
            });
        }
    };

    state.rate_limiter.clear_auth_attempts(&body.email).await;

    Ok(Json(SigninResponse {
        success: true,
        message: "Logged in successfully".to_string(),
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice2026").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("dash-ed").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Sup3rSecret").is_ok());
        assert!(validate_password("short1A").is_err()); // too short
        assert!(validate_password("alllowercase1").is_err()); // no uppercase
        assert!(validate_password("ALLUPPERCASE1").is_err()); // no lowercase
        assert!(validate_password("NoDigitsHere").is_err()); // no digit
    }

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            password: "Sup3rSecret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = SignupRequest {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            name: "A".to_string(),
            password: "weak".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
