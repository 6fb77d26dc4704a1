//! User management API endpoints
//!
//! - GET /api/users - List all users (authenticated)
//! - GET /api/users/{id} - Get a user (authenticated)
//! - PUT /api/users/{id} - Update role/status (admin)
//! - DELETE /api/users/{id} - Delete a user (admin)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::auth::UserResponse;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::StatusMessage;
use crate::models::{UserRole, UserStatus};
use crate::services::UserServiceError;

/// Response for the user list
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserResponse>,
}

/// Response for a single user
#[derive(Debug, Serialize)]
pub struct SingleUserResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Request body for role/status updates
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Response after an update
#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

/// GET /api/users - List all users
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state
        .user_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();

    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        users,
    }))
}

/// GET /api/users/{id} - Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<SingleUserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(SingleUserResponse {
        success: true,
        user: user.into(),
    }))
}

/// PUT /api/users/{id} - Update a user's role and/or status (admin)
pub async fn update_user(
    State(state): State<AppState>,
    acting: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let role = body
        .role
        .as_deref()
        .map(UserRole::from_str)
        .transpose()
        .map_err(|_| ApiError::validation_error("Role must be admin or author"))?;
    let status = body
        .status
        .as_deref()
        .map(UserStatus::from_str)
        .transpose()
        .map_err(|_| ApiError::validation_error("Status must be pending, active or suspended"))?;

    let user = state
        .user_service
        .update_role_status(id, role, status, acting.0.sub)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UpdateUserResponse {
        success: true,
        message: "User updated successfully".to_string(),
        user: user.into(),
    }))
}

/// DELETE /api/users/{id} - Delete a user (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    acting: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .user_service
        .delete(id, acting.0.sub)
        .await
        .map_err(map_user_error)?;

    Ok(Json(StatusMessage::ok("User deleted successfully")))
}

fn map_user_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::NotFound => ApiError::not_found("User not found"),
        UserServiceError::SelfModification => {
            ApiError::forbidden("You cannot modify your own account")
        }
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        _ => ApiError::internal_error("An error occurred while updating user"),
    }
}
