use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::access::Identity;
use super::applications::domain::{Application, ApplicationStatus, ApplicationSubmission};
use super::directory::ContractorDirectory;
use super::error::MatchingError;
use super::matching::MatchingApi;
use super::projects::domain::{ProjectDraft, ProjectFilter, ProjectId, ProjectPatch, WorkerId};
use super::projects::store::ProjectStore;

/// Header carrying the caller id, set by the upstream auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller role (`contractor` or `worker`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

type SharedApi<S, D> = Arc<MatchingApi<S, D>>;

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationQuery {
    #[serde(default)]
    status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    status: ApplicationStatus,
}

/// Router builder exposing the project and application endpoints.
pub fn matching_router<S, D>(api: SharedApi<S, D>) -> Router
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    Router::new()
        .route(
            "/projects",
            get(list_projects_handler::<S, D>).post(create_project_handler::<S, D>),
        )
        .route(
            "/projects/:project_id",
            get(get_project_handler::<S, D>)
                .put(update_project_handler::<S, D>)
                .delete(delete_project_handler::<S, D>),
        )
        .route(
            "/projects/:project_id/applications",
            get(list_applications_handler::<S, D>).post(apply_handler::<S, D>),
        )
        .route(
            "/projects/:project_id/applications/:worker_id",
            put(review_handler::<S, D>),
        )
        .with_state(api)
}

impl IntoResponse for MatchingError {
    fn into_response(self) -> Response {
        let status = match &self {
            MatchingError::NotFound { .. } => StatusCode::NOT_FOUND,
            MatchingError::Validation(_) => StatusCode::BAD_REQUEST,
            MatchingError::Conflict(_) | MatchingError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            MatchingError::Forbidden(_) => StatusCode::FORBIDDEN,
            MatchingError::Storage(err) => {
                error!(error = %err, "storage failure while serving request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let payload = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(payload)).into_response()
    }
}

fn identity(headers: &HeaderMap) -> Option<Identity> {
    let id = headers.get(USER_ID_HEADER)?.to_str().ok()?;
    let role = headers.get(USER_ROLE_HEADER)?.to_str().ok()?;
    Identity::from_parts(role, id)
}

fn unauthenticated() -> Response {
    let payload = json!({
        "error": "unauthenticated",
        "message": format!("missing or invalid `{USER_ID_HEADER}` / `{USER_ROLE_HEADER}` headers"),
    });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn malformed_body(rejection: JsonRejection) -> Response {
    bad_request(rejection.body_text())
}

fn malformed_query(rejection: QueryRejection) -> Response {
    bad_request(rejection.body_text())
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": "validation",
        "message": message,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) async fn list_projects_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    filter: Result<Query<ProjectFilter>, QueryRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Query(filter) = match filter {
        Ok(filter) => filter,
        Err(rejection) => return malformed_query(rejection),
    };

    match api.list_projects(&filter) {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_project_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path(project_id): Path<String>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    match api.get_project(&ProjectId(project_id)) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_project_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    headers: HeaderMap,
    payload: Result<Json<ProjectDraft>, JsonRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match identity
        .contractor()
        .and_then(|capability| api.post_project(&capability, draft))
    {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_project_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    let id = ProjectId(project_id);
    match identity
        .contractor()
        .and_then(|capability| api.update_project(&capability, &id, patch))
    {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_project_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };

    let id = ProjectId(project_id);
    match identity
        .contractor()
        .and_then(|capability| api.delete_project(&capability, &id))
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Project deleted" }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn apply_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    let id = ProjectId(project_id);
    match identity
        .worker()
        .and_then(|capability| api.apply_to_project(&capability, &id, submission))
    {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_applications_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return malformed_query(rejection),
    };

    let id = ProjectId(project_id);
    match identity
        .contractor()
        .and_then(|capability| api.project_applications(&capability, &id, query.status))
    {
        Ok(applications) => {
            let body: Vec<&Application> = applications.iter().collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn review_handler<S, D>(
    State(api): State<SharedApi<S, D>>,
    Path((project_id, worker_id)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Response
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    let Some(identity) = identity(&headers) else {
        return unauthenticated();
    };
    let Json(review) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    let project = ProjectId(project_id);
    let worker = WorkerId(worker_id);
    match identity.contractor().and_then(|capability| {
        api.review_application(&capability, &project, &worker, review.status)
    }) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}
