//! Project API endpoints
//!
//! - GET /api/projects - List projects (public, paginated)
//! - GET /api/projects/{id} - Get a project (public)
//! - POST/PUT/DELETE - Admin writes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ListMeta, StatusMessage};
use crate::models::{ListParams, PagedResult, Project};

/// Query parameters for listing projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Response for the project list
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub projects: Vec<Project>,
}

/// Response for a single project
#[derive(Debug, Serialize)]
pub struct SingleProjectResponse {
    pub success: bool,
    pub project: Project,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct ProjectMutationResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}

/// Request body for creating a project
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title_en: String,
    pub title_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Request body for updating a project
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// GET /api/projects - List projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .project_repo
        .list(&params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(ProjectListResponse {
        meta: ListMeta::from_result(&result),
        projects: result.items,
    }))
}

/// GET /api/projects/{id} - Get a project by ID
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleProjectResponse>, ApiError> {
    let project = state
        .project_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(SingleProjectResponse {
        success: true,
        project,
    }))
}

/// POST /api/projects - Create a project (admin)
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title_en.trim().is_empty() || body.title_fr.trim().is_empty() {
        return Err(ApiError::validation_error("Both titles are required"));
    }

    let now = chrono::Utc::now();
    let project = state
        .project_repo
        .create(&Project {
            id: 0,
            title_en: body.title_en,
            title_fr: body.title_fr,
            description_en: body.description_en,
            description_fr: body.description_fr,
            link: body.link,
            image_url: body.image_url,
            posted_on: now,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectMutationResponse {
            success: true,
            message: "Project created successfully".to_string(),
            project,
        }),
    ))
}

/// PUT /api/projects/{id} - Update a project (admin)
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectMutationResponse>, ApiError> {
    let mut project = state
        .project_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if let Some(title_en) = body.title_en {
        project.title_en = title_en;
    }
    if let Some(title_fr) = body.title_fr {
        project.title_fr = title_fr;
    }
    if let Some(description_en) = body.description_en {
        project.description_en = Some(description_en);
    }
    if let Some(description_fr) = body.description_fr {
        project.description_fr = Some(description_fr);
    }
    if let Some(link) = body.link {
        project.link = Some(link);
    }
    if let Some(image_url) = body.image_url {
        project.image_url = Some(image_url);
    }

    let project = state
        .project_repo
        .update(&project)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(ProjectMutationResponse {
        success: true,
        message: "Project updated successfully".to_string(),
        project,
    }))
}

/// DELETE /api/projects/{id} - Delete a project (admin)
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .project_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    state
        .project_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Project deleted successfully")))
}
