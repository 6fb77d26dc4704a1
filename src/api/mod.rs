//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the Tandem backend:
//! - Auth (signup/signin) and user management
//! - News articles, categories, projects, staff, partners
//! - Newsletters, facts, e-books, assets
//! - Director and finance-minister messages
//! - Newsletter subscriptions and the contact form
//! - File uploads and static serving of the uploads tree

pub mod assets;
pub mod auth;
pub mod categories;
pub mod contact;
pub mod ebooks;
pub mod facts;
pub mod messages;
pub mod middleware;
pub mod news;
pub mod newsletters;
pub mod partners;
pub mod projects;
pub mod responses;
pub mod staff;
pub mod subscribers;
pub mod upload;
pub mod users;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser, RequestStats};

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub uptime_seconds: u64,
    pub total_requests: u64,
}

/// GET /api/health - Service health check
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "Tandem backend is healthy".to_string(),
        uptime_seconds: state.request_stats.uptime_seconds(),
        total_requests: state.request_stats.total_requests(),
    })
}

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need admin role)
    let admin_routes = Router::new()
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/projects", post(projects::create_project))
        .route(
            "/projects/{id}",
            put(projects::update_project).delete(projects::delete_project),
        )
        .route("/staffs", post(staff::create_staff))
        .route(
            "/staffs/{id}",
            put(staff::update_staff).delete(staff::delete_staff),
        )
        .route("/partners", post(partners::create_partner))
        .route(
            "/partners/{id}",
            put(partners::update_partner).delete(partners::delete_partner),
        )
        .route("/newsletters", post(newsletters::create_newsletter))
        .route(
            "/newsletters/{id}",
            put(newsletters::update_newsletter).delete(newsletters::delete_newsletter),
        )
        .route("/facts", post(facts::create_fact))
        .route(
            "/facts/{id}",
            put(facts::update_fact).delete(facts::delete_fact),
        )
        .route("/ebooks", post(ebooks::create_ebook))
        .route(
            "/ebooks/{id}",
            put(ebooks::update_ebook).delete(ebooks::delete_ebook),
        )
        .route("/assets", post(assets::create_asset))
        .route(
            "/assets/{id}",
            put(assets::update_asset).delete(assets::delete_asset),
        )
        .route(
            "/director-messages",
            post(messages::create_director_message),
        )
        .route(
            "/director-messages/{id}",
            put(messages::update_director_message).delete(messages::delete_director_message),
        )
        .route(
            "/finance-minister-messages",
            post(messages::create_minister_message),
        )
        .route(
            "/finance-minister-messages/{id}",
            put(messages::update_minister_message).delete(messages::delete_minister_message),
        )
        .route("/subscribers", get(subscribers::list_subscribers))
        .route("/subscribers/{id}", delete(subscribers::delete_subscriber))
        .route("/upload/{target}", post(upload::upload_file))
        .route(
            "/upload/{target}/{filename}",
            delete(upload::delete_file),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (need auth but not admin)
    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/news", post(news::create_news))
        .route(
            "/news/{id}",
            put(news::update_news).delete(news::delete_news),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
        .route("/news", get(news::list_news))
        .route("/news/slug/{slug}", get(news::get_news_by_slug))
        .route("/news/{id}", get(news::get_news_by_id))
        .route("/categories", get(categories::list_categories))
        .route("/categories/{id}", get(categories::get_category))
        .route("/projects", get(projects::list_projects))
        .route("/projects/{id}", get(projects::get_project))
        .route("/staffs", get(staff::list_staff))
        .route("/staffs/{id}", get(staff::get_staff))
        .route("/partners", get(partners::list_partners))
        .route("/partners/{id}", get(partners::get_partner))
        .route("/newsletters", get(newsletters::list_newsletters))
        .route("/newsletters/search", get(newsletters::search_newsletters))
        .route("/newsletters/{id}", get(newsletters::get_newsletter))
        .route("/facts", get(facts::list_facts))
        .route("/facts/{id}", get(facts::get_fact))
        .route("/ebooks", get(ebooks::list_ebooks))
        .route("/ebooks/search", get(ebooks::search_ebooks))
        .route("/ebooks/{id}", get(ebooks::get_ebook))
        .route("/assets", get(assets::list_assets))
        .route("/assets/search", get(assets::search_assets))
        .route("/assets/{id}", get(assets::get_asset))
        .route(
            "/director-messages",
            get(messages::list_director_messages),
        )
        .route(
            "/director-messages/active",
            get(messages::get_active_director_message),
        )
        .route(
            "/director-messages/{id}",
            get(messages::get_director_message),
        )
        .route(
            "/finance-minister-messages",
            get(messages::list_minister_messages),
        )
        .route(
            "/finance-minister-messages/active",
            get(messages::get_active_minister_message),
        )
        .route(
            "/finance-minister-messages/{id}",
            get(messages::get_minister_message),
        )
        .route("/subscribe", post(subscribers::subscribe))
        .route("/unsubscribe", post(subscribers::unsubscribe))
        .route("/contact", post(contact::send_contact))
        .merge(admin_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .server
                .cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Uploads are large multipart bodies; raise the default body limit to
    // fit the configured maximum plus form overhead
    let body_limit = state.config.upload.max_file_size as usize + 1024 * 1024;

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .nest_service(
            "/uploads",
            ServeDir::new(&state.config.upload.path).append_index_html_on_directories(false),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // General API rate limiter (no-op unless enabled in config)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        // Request stats middleware (outermost layer, runs for all requests)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::Config;
    use crate::db::repositories::{
        SqlxArticleRepository, SqlxAssetRepository, SqlxCategoryRepository,
        SqlxDirectorMessageRepository, SqlxEbookRepository, SqlxFactRepository,
        SqlxMinisterMessageRepository, SqlxNewsletterRepository, SqlxPartnerRepository,
        SqlxProjectRepository, SqlxStaffRepository, SqlxSubscriberRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::{
        ArticleService, CategoryService, Mailer, MessageService, RateLimiter, SubscriberService,
        UserService,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    async fn test_state() -> AppState {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let mut config = Config::default();
        config.auth.jwt_secret = "router-test-secret".to_string();
        let config = Arc::new(config);

        let cache = create_cache(&config.cache);
        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let article_repo = SqlxArticleRepository::boxed(pool.clone());
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());

        AppState {
            pool: pool.clone(),
            config: config.clone(),
            user_service: Arc::new(UserService::new(user_repo, config.auth.clone())),
            article_service: Arc::new(ArticleService::new(
                article_repo.clone(),
                category_repo.clone(),
            )),
            category_service: Arc::new(CategoryService::new(
                category_repo,
                article_repo,
                cache.clone(),
            )),
            message_service: Arc::new(MessageService::new(
                SqlxDirectorMessageRepository::boxed(pool.clone()),
                SqlxMinisterMessageRepository::boxed(pool.clone()),
                cache,
            )),
            subscriber_service: Arc::new(SubscriberService::new(SqlxSubscriberRepository::boxed(
                pool.clone(),
            ))),
            project_repo: SqlxProjectRepository::boxed(pool.clone()),
            staff_repo: SqlxStaffRepository::boxed(pool.clone()),
            partner_repo: SqlxPartnerRepository::boxed(pool.clone()),
            newsletter_repo: SqlxNewsletterRepository::boxed(pool.clone()),
            ebook_repo: SqlxEbookRepository::boxed(pool.clone()),
            fact_repo: SqlxFactRepository::boxed(pool.clone()),
            asset_repo: SqlxAssetRepository::boxed(pool.clone()),
            mailer: Arc::new(Mailer::new(config.smtp.clone())),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            request_stats: Arc::new(RequestStats::new()),
        }
    }

    async fn test_server() -> TestServer {
        TestServer::new(build_router(test_state().await)).expect("Failed to start test server")
    }

    /// Register the bootstrap admin and return a bearer token for it
    async fn admin_token(server: &TestServer) -> String {
        server
            .post("/api/auth/signup")
            .json(&json!({
                "username": "admin",
                "email": "admin@example.com",
                "name": "Administrator",
                "password": "Sup3rSecret"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post("/api/auth/signin")
            .json(&json!({
                "email": "admin@example.com",
                "password": "Sup3rSecret"
            }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = test_server().await;
        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_signup_signin_flow() {
        let server = test_server().await;
        let token = admin_token(&server).await;
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_signin_bad_password_is_unauthorized() {
        let server = test_server().await;
        admin_token(&server).await;

        let response = server
            .post("/api/auth/signin")
            .json(&json!({
                "email": "admin@example.com",
                "password": "WrongPass1"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let server = test_server().await;
        let response = server.get("/api/users").await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_route_rejects_author() {
        let server = test_server().await;
        let admin = admin_token(&server).await;

        // Register and activate an author
        server
            .post("/api/auth/signup")
            .json(&json!({
                "username": "writer",
                "email": "writer@example.com",
                "name": "Writer",
                "password": "Sup3rSecret"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let users: serde_json::Value = server
            .get("/api/users")
            .authorization_bearer(&admin)
            .await
            .json();
        let writer_id = users["users"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["username"] == "writer")
            .unwrap()["id"]
            .as_i64()
            .unwrap();

        server
            .put(&format!("/api/users/{}", writer_id))
            .authorization_bearer(&admin)
            .json(&json!({"status": "active"}))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/auth/signin")
            .json(&json!({"email": "writer@example.com", "password": "Sup3rSecret"}))
            .await;
        let writer_token = response.json::<serde_json::Value>()["token"]
            .as_str()
            .unwrap()
            .to_string();

        // Author cannot create a category
        let response = server
            .post("/api/categories")
            .authorization_bearer(&writer_token)
            .json(&json!({"name_en": "News", "name_fr": "Actualités"}))
            .await;
        response.assert_status(axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_category_and_news_crud_flow() {
        let server = test_server().await;
        let token = admin_token(&server).await;

        // Create a category
        let response = server
            .post("/api/categories")
            .authorization_bearer(&token)
            .json(&json!({"name_en": "News", "name_fr": "Actualités"}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let category_id = response.json::<serde_json::Value>()["category"]["id"]
            .as_i64()
            .unwrap();

        // Create an article in it
        let response = server
            .post("/api/news")
            .authorization_bearer(&token)
            .json(&json!({
                "category_id": category_id,
                "title_en": "Budget Review 2026",
                "title_fr": "Revue du Budget 2026",
                "content_en": "Details of the budget.",
                "content_fr": "Détails du budget."
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let article = response.json::<serde_json::Value>();
        assert_eq!(article["article"]["slug_en"], "budget-review-2026");

        // Public slug lookup (French)
        let response = server
            .get("/api/news/slug/revue-du-budget-2026?lang=fr")
            .await;
        response.assert_status_ok();

        // Unknown slug is a 404 with the standard envelope
        let response = server.get("/api/news/slug/missing").await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["status_code"], 404);

        // Category with an article cannot be deleted
        let response = server
            .delete(&format!("/api/categories/{}", category_id))
            .authorization_bearer(&token)
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe_flow() {
        let server = test_server().await;

        let response = server
            .post("/api/subscribe")
            .json(&json!({"email": "reader@example.com"}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        // Subscribing again conflicts
        let response = server
            .post("/api/subscribe")
            .json(&json!({"email": "reader@example.com"}))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);

        // Unsubscribe, then resubscribe reactivates
        server
            .post("/api/unsubscribe")
            .json(&json!({"email": "reader@example.com"}))
            .await
            .assert_status_ok();

        server
            .post("/api/subscribe")
            .json(&json!({"email": "reader@example.com"}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_subscribe_invalid_email_rejected() {
        let server = test_server().await;
        let response = server
            .post("/api/subscribe")
            .json(&json!({"email": "not-an-email"}))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_director_message_active_flow() {
        let server = test_server().await;
        let token = admin_token(&server).await;

        // Nothing published yet
        server
            .get("/api/director-messages/active")
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);

        server
            .post("/api/director-messages")
            .authorization_bearer(&token)
            .json(&json!({
                "director_name": "Director General",
                "content_en": "Welcome to our institution.",
                "content_fr": "Bienvenue dans notre institution."
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server.get("/api/director-messages/active").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"]["director_name"], "Director General");
    }
}
