use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{EntityKind, ModerationFlag, ModerationTarget, UnknownName};
use super::service::{ModerationError, ModerationService};
use super::store::ModerationStore;
use crate::error::error_body;
use crate::marketplace::RepositoryError;
use crate::session::AdminIdentity;

#[derive(Debug, Clone, Deserialize)]
pub struct RemarkRequest {
    pub text: String,
}

/// Admin-only endpoints. Every handler requires an admin identity.
pub fn moderation_router<S>(service: Arc<ModerationService<S>>) -> Router
where
    S: ModerationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/moderation/:kind/:id/:flag/toggle",
            post(toggle_handler::<S>),
        )
        .route(
            "/api/v1/admin/companies/:company_id/remarks",
            post(remark_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn toggle_handler<S>(
    State(service): State<Arc<ModerationService<S>>>,
    AdminIdentity(admin): AdminIdentity,
    Path((kind, id, flag)): Path<(String, String, String)>,
) -> Response
where
    S: ModerationStore + 'static,
{
    let parsed = kind
        .parse::<EntityKind>()
        .and_then(|kind| flag.parse::<ModerationFlag>().map(|flag| (kind, flag)));
    let (kind, flag) = match parsed {
        Ok(pair) => pair,
        Err(error) => return bad_request(error),
    };

    let target = ModerationTarget::new(kind, id);
    match service.toggle(&target, flag) {
        Ok(outcome) => {
            info!(admin = %admin.user_id, kind = %kind, flag = %flag, "admin toggle applied");
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remark_handler<S>(
    State(service): State<Arc<ModerationService<S>>>,
    AdminIdentity(admin): AdminIdentity,
    Path(company_id): Path<String>,
    payload: Result<axum::Json<RemarkRequest>, JsonRejection>,
) -> Response
where
    S: ModerationStore + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_body(rejection.status(), rejection.body_text()),
    };
    match service.add_remark(&company_id, &request.text) {
        Ok(remark) => {
            info!(admin = %admin.user_id, company_id = %company_id, "remark added");
            (StatusCode::CREATED, axum::Json(remark)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn bad_request(error: UnknownName) -> Response {
    error_body(StatusCode::BAD_REQUEST, error)
}

fn error_response(error: ModerationError) -> Response {
    let status = match &error {
        ModerationError::UnsupportedFlag { .. } => StatusCode::BAD_REQUEST,
        ModerationError::EmptyRemark => StatusCode::UNPROCESSABLE_ENTITY,
        ModerationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ModerationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ModerationError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(%error, "moderation store unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    error_body(status, error)
}
