use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::import::parse_timestamp;
use super::service::NotificationFeedService;
use super::source::NotificationSource;
use crate::error::error_body;
use crate::marketplace::RepositoryError;

/// Client-held watermark; notifications at or before it are hidden from the response.
///
/// Accepts RFC 3339 or `YYYY-MM-DD`, the same grammar as the CSV exports.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub cleared_at: Option<String>,
}

impl FeedQuery {
    pub fn watermark(&self) -> Result<Option<DateTime<Utc>>, String> {
        let Some(raw) = self.cleared_at.as_deref() else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        parse_timestamp(raw)
            .or_else(|| {
                // an unencoded `+hh:mm` offset arrives as a space
                let (stamp, offset) = raw.trim().rsplit_once(' ')?;
                parse_timestamp(&format!("{stamp}+{offset}"))
            })
            .map(Some)
            .ok_or_else(|| format!("invalid cleared_at '{raw}'"))
    }
}

pub fn notification_router<S>(service: Arc<NotificationFeedService<S>>) -> Router
where
    S: NotificationSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/recipients/:recipient_id/notifications",
            get(feed_handler::<S>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_read_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn feed_handler<S>(
    State(service): State<Arc<NotificationFeedService<S>>>,
    Path(recipient_id): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Response
where
    S: NotificationSource + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_body(rejection.status(), rejection.body_text()),
    };
    let cleared_at = match query.watermark() {
        Ok(cleared_at) => cleared_at,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, message),
    };

    let outcome = service.feed(&recipient_id, cleared_at);
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

pub(crate) async fn mark_read_handler<S>(
    State(service): State<Arc<NotificationFeedService<S>>>,
    Path(notification_id): Path<String>,
) -> Response
where
    S: NotificationSource + 'static,
{
    match service.mark_read(&notification_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            let status = match error {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict => StatusCode::CONFLICT,
                RepositoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            error_body(status, error)
        }
    }
}
