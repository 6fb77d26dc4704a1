//! Subscription API endpoints
//!
//! - POST /api/subscribe - Subscribe an email (public)
//! - POST /api/unsubscribe - Unsubscribe an email (public)
//! - GET /api/subscribers - List subscribers (admin, ?status= filter)
//! - DELETE /api/subscribers/{id} - Delete a subscriber (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::api::middleware::{validation_failed, ApiError, AppState};
use crate::api::responses::{ListMeta, StatusMessage};
use crate::models::{ListParams, Subscriber, SubscriberStatus};
use crate::services::{SubscribeOutcome, SubscriberServiceError};

/// Request body for subscribe/unsubscribe
#[derive(Debug, Deserialize, Validate)]
pub struct SubscriptionRequest {
    #[validate(email(message = "email must be valid"))]
    pub email: String,
}

/// Query parameters for listing subscribers
#[derive(Debug, Deserialize)]
pub struct ListSubscribersQuery {
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Response for the subscriber list
#[derive(Debug, Serialize)]
pub struct SubscriberListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub subscribers: Vec<Subscriber>,
}

/// POST /api/subscribe - Subscribe an email address
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate().map_err(|e| validation_failed(&e))?;

    let outcome = state
        .subscriber_service
        .subscribe(&body.email)
        .await
        .map_err(map_subscriber_error)?;

    let (status, message) = match outcome {
        SubscribeOutcome::Created => (
            StatusCode::CREATED,
            "Successfully subscribed to newsletter",
        ),
        SubscribeOutcome::Reactivated => {
            (StatusCode::OK, "Subscription reactivated successfully")
        }
    };

    Ok((status, Json(StatusMessage::ok(message))))
}

/// POST /api/unsubscribe - Unsubscribe an email address
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscriptionRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    body.validate().map_err(|e| validation_failed(&e))?;

    state
        .subscriber_service
        .unsubscribe(&body.email)
        .await
        .map_err(map_subscriber_error)?;

    Ok(Json(StatusMessage::ok(
        "Successfully unsubscribed from newsletter",
    )))
}

/// GET /api/subscribers - List subscribers (admin)
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<ListSubscribersQuery>,
) -> Result<Json<SubscriberListResponse>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(SubscriberStatus::from_str)
        .transpose()
        .map_err(|_| ApiError::validation_error("Status must be active or unsubscribed"))?;

    let params = ListParams::new(query.page, query.limit);

    let result = state
        .subscriber_service
        .list(status, &params)
        .await
        .map_err(map_subscriber_error)?;

    Ok(Json(SubscriberListResponse {
        meta: ListMeta::from_result(&result),
        subscribers: result.items,
    }))
}

/// DELETE /api/subscribers/{id} - Delete a subscriber (admin)
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .subscriber_service
        .delete(id)
        .await
        .map_err(map_subscriber_error)?;

    Ok(Json(StatusMessage::ok("Subscriber deleted successfully")))
}

fn map_subscriber_error(e: SubscriberServiceError) -> ApiError {
    match e {
        SubscriberServiceError::AlreadySubscribed => {
            ApiError::conflict("This email is already subscribed")
        }
        SubscriberServiceError::AlreadyUnsubscribed => {
            ApiError::validation_error("Email already unsubscribed")
        }
        SubscriberServiceError::NotFound => ApiError::not_found("Email not found in subscribers"),
        SubscriberServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}
