//! Leadership message API endpoints
//!
//! Director messages under /api/director-messages and finance-minister
//! messages under /api/finance-minister-messages:
//! - GET / - List all revisions (public)
//! - GET /active - The revision currently displayed (public)
//! - GET /{id} - Get a revision (public)
//! - POST/PUT/DELETE - Admin writes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::StatusMessage;
use crate::models::{DirectorMessage, DirectorMessageInput, MinisterMessage, MinisterMessageInput};
use crate::services::MessageServiceError;

/// Request body for director messages (create and update)
#[derive(Debug, Deserialize)]
pub struct DirectorMessageRequest {
    pub director_name: Option<String>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub x: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

impl From<DirectorMessageRequest> for DirectorMessageInput {
    fn from(body: DirectorMessageRequest) -> Self {
        Self {
            director_name: body.director_name,
            title_en: body.title_en,
            title_fr: body.title_fr,
            excerpt_en: body.excerpt_en,
            excerpt_fr: body.excerpt_fr,
            content_en: body.content_en,
            content_fr: body.content_fr,
            image_url: body.image_url,
            x: body.x,
            linkedin: body.linkedin,
            email: body.email,
        }
    }
}

/// Request body for minister messages (create and update)
#[derive(Debug, Deserialize)]
pub struct MinisterMessageRequest {
    pub minister_name: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl From<MinisterMessageRequest> for MinisterMessageInput {
    fn from(body: MinisterMessageRequest) -> Self {
        Self {
            minister_name: body.minister_name,
            content_en: body.content_en,
            content_fr: body.content_fr,
            image_url: body.image_url,
            telephone: body.telephone,
            email: body.email,
            website: body.website,
        }
    }
}

/// Response for the director message list
#[derive(Debug, Serialize)]
pub struct DirectorMessageListResponse {
    pub success: bool,
    pub count: usize,
    pub messages: Vec<DirectorMessage>,
}

/// Response for a single director message
#[derive(Debug, Serialize)]
pub struct SingleDirectorMessageResponse {
    pub success: bool,
    pub message: DirectorMessage,
}

/// Response for the minister message list
#[derive(Debug, Serialize)]
pub struct MinisterMessageListResponse {
    pub success: bool,
    pub count: usize,
    pub messages: Vec<MinisterMessage>,
}

/// Response for a single minister message
#[derive(Debug, Serialize)]
pub struct SingleMinisterMessageResponse {
    pub success: bool,
    pub message: MinisterMessage,
}

fn map_message_error(e: MessageServiceError) -> ApiError {
    match e {
        MessageServiceError::NotFound => ApiError::not_found("Message not found"),
        MessageServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

// ============================================================================
// Director messages
// ============================================================================

/// GET /api/director-messages - List director messages
pub async fn list_director_messages(
    State(state): State<AppState>,
) -> Result<Json<DirectorMessageListResponse>, ApiError> {
    let messages = state
        .message_service
        .list_director()
        .await
        .map_err(map_message_error)?;

    Ok(Json(DirectorMessageListResponse {
        success: true,
        count: messages.len(),
        messages,
    }))
}

/// GET /api/director-messages/active - Get the active director message
pub async fn get_active_director_message(
    State(state): State<AppState>,
) -> Result<Json<SingleDirectorMessageResponse>, ApiError> {
    let message = state
        .message_service
        .active_director()
        .await
        .map_err(map_message_error)?
        .ok_or_else(|| ApiError::not_found("No director message found"))?;

    Ok(Json(SingleDirectorMessageResponse {
        success: true,
        message,
    }))
}

/// GET /api/director-messages/{id} - Get a director message by ID
pub async fn get_director_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleDirectorMessageResponse>, ApiError> {
    let message = state
        .message_service
        .get_director(id)
        .await
        .map_err(map_message_error)?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(SingleDirectorMessageResponse {
        success: true,
        message,
    }))
}

/// POST /api/director-messages - Create a director message (admin)
pub async fn create_director_message(
    State(state): State<AppState>,
    Json(body): Json<DirectorMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .message_service
        .create_director(body.into())
        .await
        .map_err(map_message_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SingleDirectorMessageResponse {
            success: true,
            message,
        }),
    ))
}

/// PUT /api/director-messages/{id} - Update a director message (admin)
pub async fn update_director_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DirectorMessageRequest>,
) -> Result<Json<SingleDirectorMessageResponse>, ApiError> {
    let message = state
        .message_service
        .update_director(id, body.into())
        .await
        .map_err(map_message_error)?;

    Ok(Json(SingleDirectorMessageResponse {
        success: true,
        message,
    }))
}

/// DELETE /api/director-messages/{id} - Delete a director message (admin)
pub async fn delete_director_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .message_service
        .delete_director(id)
        .await
        .map_err(map_message_error)?;

    Ok(Json(StatusMessage::ok("Message deleted successfully")))
}

// ============================================================================
// Finance minister messages
// ============================================================================

/// GET /api/finance-minister-messages - List minister messages
pub async fn list_minister_messages(
    State(state): State<AppState>,
) -> Result<Json<MinisterMessageListResponse>, ApiError> {
    let messages = state
        .message_service
        .list_minister()
        .await
        .map_err(map_message_error)?;

    Ok(Json(MinisterMessageListResponse {
        success: true,
        count: messages.len(),
        messages,
    }))
}

/// GET /api/finance-minister-messages/active - Get the active minister message
pub async fn get_active_minister_message(
    State(state): State<AppState>,
) -> Result<Json<SingleMinisterMessageResponse>, ApiError> {
    let message = state
        .message_service
        .active_minister()
        .await
        .map_err(map_message_error)?
        .ok_or_else(|| ApiError::not_found("No minister message found"))?;

    Ok(Json(SingleMinisterMessageResponse {
        success: true,
        message,
    }))
}

/// GET /api/finance-minister-messages/{id} - Get a minister message by ID
pub async fn get_minister_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleMinisterMessageResponse>, ApiError> {
    let message = state
        .message_service
        .get_minister(id)
        .await
        .map_err(map_message_error)?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(SingleMinisterMessageResponse {
        success: true,
        message,
    }))
}

/// POST /api/finance-minister-messages - Create a minister message (admin)
pub async fn create_minister_message(
    State(state): State<AppState>,
    Json(body): Json<MinisterMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .message_service
        .create_minister(body.into())
        .await
        .map_err(map_message_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SingleMinisterMessageResponse {
            success: true,
            message,
        }),
    ))
}

/// PUT /api/finance-minister-messages/{id} - Update a minister message (admin)
pub async fn update_minister_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<MinisterMessageRequest>,
) -> Result<Json<SingleMinisterMessageResponse>, ApiError> {
    let message = state
        .message_service
        .update_minister(id, body.into())
        .await
        .map_err(map_message_error)?;

    Ok(Json(SingleMinisterMessageResponse {
        success: true,
        message,
    }))
}

/// DELETE /api/finance-minister-messages/{id} - Delete a minister message (admin)
pub async fn delete_minister_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .message_service
        .delete_minister(id)
        .await
        .map_err(map_message_error)?;

    Ok(Json(StatusMessage::ok("Message deleted successfully")))
}
