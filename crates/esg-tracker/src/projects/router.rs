use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{
    BookmarkId, NewBookmark, NewProject, ProjectFilter, ProjectId, ProjectPatch, UserId,
};
use super::repository::{BookmarkRepository, ProjectRepository, RepositoryError};
use super::service::{ProjectService, ProjectServiceError};
use crate::insights::InsightsError;
use crate::scoring::{CategoryGrades, Pillar, ScoringError, CATEGORIES};

/// Raw grades stay as strings until the handler so that invalid letters and
/// unknown ids surface as scoring errors rather than generic body rejections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitAssessmentRequest {
    pub(crate) project_id: ProjectId,
    pub(crate) grades: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) grades: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InsightsQuery {
    pub(crate) project_id: ProjectId,
    pub(crate) category: Pillar,
}

/// Router builder exposing the catalogue, assessment, bookmark, and insights endpoints.
pub fn project_router<R, B>(service: Arc<ProjectService<R, B>>) -> Router
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    Router::new()
        .route("/api/categories", get(categories_handler))
        .route(
            "/api/projects",
            get(list_projects_handler::<R, B>).post(create_project_handler::<R, B>),
        )
        .route(
            "/api/projects/:project_id",
            get(get_project_handler::<R, B>)
                .patch(update_project_handler::<R, B>)
                .delete(delete_project_handler::<R, B>),
        )
        .route(
            "/api/risk-assessments",
            post(submit_assessment_handler::<R, B>),
        )
        .route(
            "/api/risk-assessments/:project_id",
            get(assessment_handler::<R, B>),
        )
        .route(
            "/api/assessments/preview",
            post(preview_handler::<R, B>),
        )
        .route("/api/bookmarks", post(add_bookmark_handler::<R, B>))
        .route(
            "/api/bookmarks/:id",
            get(bookmarks_handler::<R, B>).delete(remove_bookmark_handler::<R, B>),
        )
        .route("/api/generate-insights", post(insights_handler::<R, B>))
        .with_state(service)
}

pub(crate) async fn categories_handler() -> Response {
    (StatusCode::OK, Json(&CATEGORIES[..])).into_response()
}

pub(crate) async fn list_projects_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    query: Result<Query<ProjectFilter>, QueryRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let Query(filter) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    match service.list_projects(&filter) {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_project_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let draft = match json_body(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    match service.create_project(draft) {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_project_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(project_id): Path<u64>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    match service.get_project(ProjectId(project_id)) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_project_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(project_id): Path<u64>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let patch = match json_body(payload) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    match service.update_project(ProjectId(project_id), patch) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_project_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(project_id): Path<u64>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    match service.delete_project(ProjectId(project_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_assessment_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    payload: Result<Json<SubmitAssessmentRequest>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let grades = match CategoryGrades::parse(request.grades) {
        Ok(grades) => grades,
        Err(error) => return error_response(error.into()),
    };

    match service.submit_assessment(request.project_id, grades) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(project_id): Path<u64>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    match service.assessment_for(ProjectId(project_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = CategoryGrades::parse(request.grades)
        .map_err(ProjectServiceError::from)
        .and_then(|grades| service.preview(grades));

    match result {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_bookmark_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    payload: Result<Json<NewBookmark>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match service.add_bookmark(request) {
        Ok(bookmark) => (StatusCode::CREATED, Json(bookmark)).into_response(),
        Err(error) => error_response(error),
    }
}

/// `GET /api/bookmarks/:id` reads the segment as a user id; `DELETE` reads it
/// as a bookmark id.
pub(crate) async fn bookmarks_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    match service.bookmarks_for(UserId(user_id)) {
        Ok(bookmarks) => (StatusCode::OK, Json(bookmarks)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_bookmark_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    Path(bookmark_id): Path<u64>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    match service.remove_bookmark(BookmarkId(bookmark_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn insights_handler<R, B>(
    State(service): State<Arc<ProjectService<R, B>>>,
    payload: Result<Json<InsightsQuery>, JsonRejection>,
) -> Response
where
    R: ProjectRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let query = match json_body(payload) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match service.insights(query.project_id, query.category) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Unwraps a JSON body, turning extractor rejections into the same
/// `{"error": ...}` shape the service errors use.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
}

fn rejection_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "error": detail }))).into_response()
}

pub(crate) fn error_response(error: ProjectServiceError) -> Response {
    let status = match &error {
        ProjectServiceError::InvalidProject(_)
        | ProjectServiceError::Scoring(_)
        | ProjectServiceError::Insights(InsightsError::Rejected(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ProjectServiceError::ProjectNotFound(_)
        | ProjectServiceError::AssessmentNotFound(_)
        | ProjectServiceError::BookmarkNotFound(_)
        | ProjectServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProjectServiceError::AlreadyBookmarked
        | ProjectServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ProjectServiceError::Insights(InsightsError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ProjectServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        warn!(%error, "request failed");
    }

    let mut payload = json!({ "error": error.to_string() });
    if let ProjectServiceError::Scoring(ScoringError::IncompleteAssessment(incomplete)) = &error {
        payload["missing"] = json!(incomplete.missing);
    }

    (status, Json(payload)).into_response()
}
