use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::notifications::{
    notification_router, FeedAggregator, NotificationFeedService,
};

fn router(source: MemorySource) -> axum::Router {
    notification_router(Arc::new(build_service(source)))
}

fn seeded() -> MemorySource {
    MemorySource::with(
        vec![notification("a", "Job X viewed", 100)],
        vec![remark(None, "needs ID proof", 50)],
    )
}

#[tokio::test]
async fn feed_route_returns_merged_items() {
    let response = router(seeded())
        .oneshot(
            Request::get("/api/v1/recipients/company-1/notifications")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let items = payload["notifications"].as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["message"], json!("Job X viewed"));
    assert_eq!(items[1]["type"], json!("remark"));
    assert!(payload.get("degraded_sources").is_none());
}

#[tokio::test]
async fn feed_route_applies_cleared_watermark() {
    let response = router(seeded())
        .oneshot(
            Request::get(
                "/api/v1/recipients/company-1/notifications?cleared_at=1970-01-01T00:01:15Z",
            )
            .body(Body::empty())
            .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let items = payload["notifications"].as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!("a"));
}

#[tokio::test]
async fn feed_route_rejects_malformed_watermark() {
    let response = router(seeded())
        .oneshot(
            Request::get("/api/v1/recipients/company-1/notifications?cleared_at=soon")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("cleared_at"));
}

async fn feed_len(uri: &str) -> usize {
    let response = router(seeded())
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    payload["notifications"].as_array().expect("array").len()
}

#[tokio::test]
async fn feed_route_accepts_date_only_watermark() {
    let base = "/api/v1/recipients/company-1/notifications";
    assert_eq!(feed_len(&format!("{base}?cleared_at=1970-01-01")).await, 2);
    assert_eq!(feed_len(&format!("{base}?cleared_at=1970-01-02")).await, 0);
}

#[tokio::test]
async fn feed_route_accepts_unencoded_offset() {
    // `+` in a query string decodes to a space
    let uri = "/api/v1/recipients/company-1/notifications?cleared_at=1970-01-01T01:01:15+01:00";
    assert_eq!(feed_len(uri).await, 1);
}

#[tokio::test]
async fn mark_read_route_maps_outcomes() {
    let app = router(seeded());

    let ok = app
        .clone()
        .oneshot(
            Request::post("/api/v1/notifications/a/read")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    let missing = app
        .oneshot(
            Request::post("/api/v1/notifications/zzz/read")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mark_read_route_reports_outage() {
    let source = FlakySource {
        inner: seeded(),
        fail_standard: false,
        fail_remarks: false,
    };
    let service = NotificationFeedService::new(Arc::new(source), FeedAggregator::default());
    let response = notification_router(Arc::new(service))
        .oneshot(
            Request::post("/api/v1/notifications/a/read")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
