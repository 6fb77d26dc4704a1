//! Contact form API endpoint
//!
//! - POST /api/contact - Validate a contact-form submission and relay it
//!   by email to the configured inbox (public)

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::api::middleware::{validation_failed, ApiError, AppState};
use crate::api::responses::StatusMessage;
use crate::services::ContactMessage;

const ALLOWED_TITLES: [&str; 5] = ["Mr", "Mrs", "Ms", "Dr", "Prof"];

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if ALLOWED_TITLES.contains(&title) {
        Ok(())
    } else {
        Err(ValidationError::new("title")
            .with_message("title must be one of Mr, Mrs, Ms, Dr, Prof".into()))
    }
}

/// Request body for the contact form
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(custom(function = validate_title))]
    pub title: String,
    #[validate(length(min = 2, max = 50, message = "first name must be 2-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50, message = "last name must be 2-50 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 5, max = 200, message = "subject must be 5-200 characters"))]
    pub subject: String,
    #[validate(length(min = 10, max = 2000, message = "message must be 10-2000 characters"))]
    pub message: String,
}

/// POST /api/contact - Relay a contact-form submission
pub async fn send_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    body.validate().map_err(|e| validation_failed(&e))?;

    let message = ContactMessage {
        title: body.title,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        subject: body.subject,
        message: body.message,
    };

    state
        .mailer
        .send_contact_message(&message)
        .await
        .map_err(|e| {
            tracing::error!("Error sending contact email: {}", e);
            ApiError::internal_error("Failed to send message. Please try again.")
        })?;

    Ok(Json(StatusMessage::ok(
        "Contact form submitted successfully!",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ContactRequest {
        ContactRequest {
            title: "Mr".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Mbarga".to_string(),
            email: "jean@example.com".to_string(),
            subject: "Partnership inquiry".to_string(),
            message: "I would like to discuss a partnership.".to_string(),
        }
    }

    #[test]
    fn test_valid_contact_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_title_must_be_known() {
        let mut request = valid_request();
        request.title = "Captain".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_field_length_bounds() {
        let mut request = valid_request();
        request.subject = "Hey".to_string(); // below 5 chars
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.message = "Too short".to_string(); // below 10 chars
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.first_name = "J".to_string();
        assert!(request.validate().is_err());
    }
}
