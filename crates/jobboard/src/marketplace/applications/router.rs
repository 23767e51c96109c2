use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{ApplicationId, ApplicationSubmission, JobId};
use super::repository::{ApplicationRepository, ApplicationView};
use super::service::{ApplicationService, ApplicationServiceError};
use super::status::TransitionError;
use crate::error::error_body;
use crate::marketplace::RepositoryError;
use crate::session::Identity;

/// Body of a status change request. `reason` is only read for `rejected`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Router builder exposing HTTP endpoints for intake and status changes.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R>))
        .route(
            "/api/v1/applications/:application_id",
            get(fetch_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(update_status_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(list_for_job_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    payload: Result<axum::Json<ApplicationSubmission>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_body(rejection.status(), rejection.body_text()),
    };
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_for_job_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list_for_job(&JobId(job_id)) {
        Ok(records) => {
            let views: Vec<ApplicationView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
    identity: Option<Identity>,
    payload: Result<axum::Json<StatusUpdateRequest>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_body(rejection.status(), rejection.body_text()),
    };
    let id = ApplicationId(application_id);
    match service.update_status(&id, &request.status, request.reason.as_deref()) {
        Ok(record) => {
            info!(
                application_id = %id,
                status = %record.status,
                actor = identity.as_ref().map(|identity| identity.user_id.as_str()),
                "status change committed"
            );
            (StatusCode::OK, axum::Json(record.view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::IncompleteSubmission(_)
        | ApplicationServiceError::Transition(
            TransitionError::InvalidStatus(_) | TransitionError::MissingReason,
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(%error, "application store unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    error_body(status, error)
}
