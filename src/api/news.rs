//! News API endpoints
//!
//! - GET /api/news - List articles with filters and pagination (public)
//! - GET /api/news/slug/{slug} - Get an article by slug (public, ?lang=)
//! - GET /api/news/{id} - Get an article by ID (public)
//! - POST /api/news - Create an article (authenticated)
//! - PUT /api/news/{id} - Update an article (author owns it, or admin)
//! - DELETE /api/news/{id} - Delete an article (author owns it, or admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{ListMeta, StatusMessage};
use crate::models::{
    Article, ArticleFilter, CreateArticleInput, Lang, ListParams, UpdateArticleInput,
};
use crate::services::ArticleServiceError;

/// Query parameters for listing news
#[derive(Debug, Deserialize)]
pub struct ListNewsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub category_id: Option<i64>,
    pub is_featured: Option<bool>,
    pub author_id: Option<i64>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Query parameter selecting the slug language
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Lang,
}

/// Category info embedded in article responses
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: i64,
    pub name_en: String,
    pub name_fr: String,
}

/// Author info embedded in article responses
#[derive(Debug, Serialize)]
pub struct AuthorInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Full article response with embedded relations
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub category_id: i64,
    pub author_id: i64,
    pub title_en: String,
    pub title_fr: String,
    pub slug_en: String,
    pub slug_fr: String,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: String,
    pub content_fr: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorInfo>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            category_id: article.category_id,
            author_id: article.author_id,
            title_en: article.title_en,
            title_fr: article.title_fr,
            slug_en: article.slug_en,
            slug_fr: article.slug_fr,
            excerpt_en: article.excerpt_en,
            excerpt_fr: article.excerpt_fr,
            content_en: article.content_en,
            content_fr: article.content_fr,
            image_url: article.image_url,
            is_featured: article.is_featured,
            published_at: article.published_at.to_rfc3339(),
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            category: None,
            author: None,
        }
    }
}

/// Response for the article list
#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub articles: Vec<ArticleResponse>,
}

/// Response for a single article
#[derive(Debug, Serialize)]
pub struct SingleNewsResponse {
    pub success: bool,
    pub article: ArticleResponse,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct NewsMutationResponse {
    pub success: bool,
    pub message: String,
    pub article: ArticleResponse,
}

/// Request body for creating an article
#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub category_id: i64,
    pub title_en: String,
    pub title_fr: String,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: String,
    pub content_fr: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Request body for updating an article
#[derive(Debug, Deserialize)]
pub struct UpdateNewsRequest {
    pub category_id: Option<i64>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}

/// Attach category and author info to an article response
async fn with_relations(state: &AppState, article: Article) -> ArticleResponse {
    let category = state
        .category_service
        .get_by_id(article.category_id)
        .await
        .ok()
        .flatten();
    let author = state
        .user_service
        .get_by_id(article.author_id)
        .await
        .ok()
        .flatten();

    let mut response: ArticleResponse = article.into();
    response.category = category.map(|c| CategoryInfo {
        id: c.id,
        name_en: c.name_en,
        name_fr: c.name_fr,
    });
    response.author = author.map(|u| AuthorInfo {
        id: u.id,
        name: u.name,
        email: u.email,
    });
    response
}

/// GET /api/news - List articles
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<NewsListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);
    let filter = ArticleFilter {
        category_id: query.category_id,
        is_featured: query.is_featured,
        author_id: query.author_id,
    };

    let result = state
        .article_service
        .list(&filter, &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let meta = ListMeta::from_result(&result);

    let mut articles = Vec::with_capacity(result.items.len());
    for article in result.items {
        articles.push(with_relations(&state, article).await);
    }

    tracing::info!("Fetched {} articles (page {})", articles.len(), meta.current_page);

    Ok(Json(NewsListResponse { meta, articles }))
}

/// GET /api/news/slug/{slug} - Get an article by slug
pub async fn get_news_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<SingleNewsResponse>, ApiError> {
    let article = state
        .article_service
        .get_by_slug(&slug, query.lang)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(SingleNewsResponse {
        success: true,
        article: with_relations(&state, article).await,
    }))
}

/// GET /api/news/{id} - Get an article by ID
pub async fn get_news_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleNewsResponse>, ApiError> {
    let article = state
        .article_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(SingleNewsResponse {
        success: true,
        article: with_relations(&state, article).await,
    }))
}

/// POST /api/news - Create an article.
///
/// The author is taken from the token, never from the request body.
pub async fn create_news(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateNewsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateArticleInput {
        category_id: body.category_id,
        author_id: user.0.sub,
        title_en: body.title_en,
        title_fr: body.title_fr,
        excerpt_en: body.excerpt_en,
        excerpt_fr: body.excerpt_fr,
        content_en: body.content_en,
        content_fr: body.content_fr,
        image_url: body.image_url,
        is_featured: body.is_featured,
    };

    let article = state
        .article_service
        .create(input)
        .await
        .map_err(map_article_error)?;

    Ok((
        StatusCode::CREATED,
        Json(NewsMutationResponse {
            success: true,
            message: "Article created successfully".to_string(),
            article: with_relations(&state, article).await,
        }),
    ))
}

/// PUT /api/news/{id} - Update an article
pub async fn update_news(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateNewsRequest>,
) -> Result<Json<NewsMutationResponse>, ApiError> {
    let existing = state
        .article_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    if !user.0.can_edit(existing.author_id) {
        return Err(ApiError::forbidden(
            "You don't have permission to edit this article",
        ));
    }

    let input = UpdateArticleInput {
        category_id: body.category_id,
        title_en: body.title_en,
        title_fr: body.title_fr,
        excerpt_en: body.excerpt_en,
        excerpt_fr: body.excerpt_fr,
        content_en: body.content_en,
        content_fr: body.content_fr,
        image_url: body.image_url,
        is_featured: body.is_featured,
    };

    let article = state
        .article_service
        .update(id, input)
        .await
        .map_err(map_article_error)?;

    Ok(Json(NewsMutationResponse {
        success: true,
        message: "Article updated successfully".to_string(),
        article: with_relations(&state, article).await,
    }))
}

/// DELETE /api/news/{id} - Delete an article
pub async fn delete_news(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    let existing = state
        .article_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    if !user.0.can_edit(existing.author_id) {
        return Err(ApiError::forbidden(
            "You don't have permission to delete this article",
        ));
    }

    state
        .article_service
        .delete(id)
        .await
        .map_err(map_article_error)?;

    Ok(Json(StatusMessage::ok("Article deleted successfully")))
}

fn map_article_error(e: ArticleServiceError) -> ApiError {
    match e {
        ArticleServiceError::NotFound => ApiError::not_found("Article not found"),
        ArticleServiceError::CategoryNotFound => ApiError::not_found("Category not found"),
        ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ArticleServiceError::DuplicateSlug => {
            ApiError::conflict("Article with similar title already exists")
        }
        ArticleServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}
