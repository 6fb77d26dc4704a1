//! API middleware
//!
//! Contains middleware for:
//! - Authentication (JWT bearer token validation)
//! - Authorization (admin gate)
//! - Rate limiting (general API window, per client IP)
//! - Request statistics

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::db::repositories::{
    AssetRepository, EbookRepository, FactRepository, NewsletterRepository, PartnerRepository,
    ProjectRepository, StaffRepository,
};
use crate::db::DynDatabasePool;
use crate::services::token::{decode_token, Claims};
use crate::services::{
    ArticleService, CategoryService, Mailer, MessageService, RateLimiter, SubscriberService,
    UserService,
};

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    /// Total number of requests processed
    total_requests: AtomicU64,
    /// Total response time in microseconds (for calculating average)
    total_response_time_us: AtomicU64,
    /// Application start time
    start_time: Instant,
}

impl RequestStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(duration_us, Ordering::Relaxed);
    }

    /// Get total request count
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Get average response time in microseconds
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application state
// ============================================================================

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub config: Arc<Config>,
    pub user_service: Arc<UserService>,
    pub article_service: Arc<ArticleService>,
    pub category_service: Arc<CategoryService>,
    pub message_service: Arc<MessageService>,
    pub subscriber_service: Arc<SubscriberService>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
    pub partner_repo: Arc<dyn PartnerRepository>,
    pub newsletter_repo: Arc<dyn NewsletterRepository>,
    pub ebook_repo: Arc<dyn EbookRepository>,
    pub fact_repo: Arc<dyn FactRepository>,
    pub asset_repo: Arc<dyn AssetRepository>,
    pub mailer: Arc<Mailer>,
    pub rate_limiter: Arc<RateLimiter>,
    pub request_stats: Arc<RequestStats>,
}

/// Authenticated token claims extracted from the request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// ============================================================================
// Error envelope
// ============================================================================

/// Error detail carried in every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    pub status_code: u16,
}

/// Error response for API errors.
///
/// Serializes as `{"success": false, "error": {code, message, status_code}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: ApiErrorDetail,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success: false,
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                status_code: status.as_u16(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message, StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message, StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message, StatusCode::NOT_FOUND)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message, StatusCode::BAD_REQUEST)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message, StatusCode::CONFLICT)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new("RATE_LIMITED", message, StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx means something broke on our side; 4xx is a client problem
        if status.is_server_error() {
            tracing::error!(code = %self.error.code, "{}", self.error.message);
        } else {
            tracing::warn!(code = %self.error.code, "{}", self.error.message);
        }

        (status, Json(self)).into_response()
    }
}

/// Flatten validator errors into a single readable message
pub fn validation_failed(errors: &validator::ValidationErrors) -> ApiError {
    let mut parts = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value ({})", error.code));
            parts.push(format!("{}: {}", field, message));
        }
    }
    parts.sort();
    ApiError::validation_error(parts.join("; "))
}

// ============================================================================
// Authentication / authorization middleware
// ============================================================================

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Authentication middleware.
///
/// Validates the bearer token and injects the decoded claims into request
/// extensions for handlers and the admin gate.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("No token provided. Authorization denied."))?;

    let claims = decode_token(&token, &state.config.auth.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

/// Admin authorization middleware. Must run after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.0.is_admin() {
        return Err(ApiError::forbidden("Access denied. Admin only."));
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Rate limiting middleware
// ============================================================================

/// Extract the client IP from proxy headers
pub fn extract_client_ip(request: &Request) -> Option<IpAddr> {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    request
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// General API rate limiting middleware.
///
/// No-op unless rate limiting is enabled in configuration. Requests with
/// no resolvable client IP are not limited.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.rate_limiter.is_enabled() {
        if let Some(ip) = extract_client_ip(&request) {
            if state.rate_limiter.is_request_limited(ip).await {
                return Err(ApiError::rate_limited(format!(
                    "Too many requests from this IP, please try again in {} seconds.",
                    state.rate_limiter.retry_after_seconds()
                )));
            }
            state.rate_limiter.record_request(ip).await;
        }
    }

    Ok(next.run(request).await)
}

/// Request statistics middleware.
///
/// Records request count and response time for the health endpoint.
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_us = start.elapsed().as_micros() as u64;
    state.request_stats.record(duration_us);

    response
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let request = request_with_headers(&[("authorization", "Bearer abc123")]);
        assert_eq!(extract_bearer_token(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let request = request_with_headers(&[]);
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let request = request_with_headers(&[("authorization", "Basic abc123")]);
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_client_ip_forwarded_for() {
        let request = request_with_headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1")]);
        assert_eq!(
            extract_client_ip(&request),
            Some("203.0.113.9".parse().unwrap())
        );
    }

    #[test]
    fn test_extract_client_ip_real_ip_fallback() {
        let request = request_with_headers(&[("x-real-ip", "198.51.100.7")]);
        assert_eq!(
            extract_client_ip(&request),
            Some("198.51.100.7".parse().unwrap())
        );
    }

    #[test]
    fn test_extract_client_ip_invalid() {
        let request = request_with_headers(&[("x-forwarded-for", "not-an-ip")]);
        assert!(extract_client_ip(&request).is_none());
    }

    #[test]
    fn test_api_error_codes_map_to_status() {
        assert_eq!(ApiError::unauthorized("x").error.status_code, 401);
        assert_eq!(ApiError::forbidden("x").error.status_code, 403);
        assert_eq!(ApiError::not_found("x").error.status_code, 404);
        assert_eq!(ApiError::validation_error("x").error.status_code, 400);
        assert_eq!(ApiError::conflict("x").error.status_code, 409);
        assert_eq!(ApiError::rate_limited("x").error.status_code, 429);
        assert_eq!(ApiError::internal_error("x").error.status_code, 500);
    }

    #[test]
    fn test_api_error_envelope_shape() {
        let error = ApiError::not_found("Article not found");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Article not found");
        assert_eq!(json["error"]["status_code"], 404);
    }

    #[test]
    fn test_request_stats() {
        let stats = RequestStats::new();
        assert_eq!(stats.total_requests(), 0);
        assert_eq!(stats.avg_response_time_us(), 0.0);

        stats.record(100);
        stats.record(300);
        assert_eq!(stats.total_requests(), 2);
        assert_eq!(stats.avg_response_time_us(), 200.0);
    }
}
