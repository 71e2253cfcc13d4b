use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, FixedOffset};
use tower::util::ServiceExt;

mod common;

// The upstream base URL is never contacted by the health probe; point it at
// a discard address.
const UNUSED_UPSTREAM: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn health_check_returns_ok_with_rfc3339_timestamp() {
    let app = common::test_router(UNUSED_UPSTREAM, 30, 20);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "recipe-service");
    DateTime::parse_from_rfc3339(body["timestamp"].as_str().expect("timestamp should be set"))
        .expect("timestamp should be RFC 3339");
}

#[tokio::test]
async fn health_check_timestamps_do_not_go_backwards() {
    let app = common::test_router(UNUSED_UPSTREAM, 30, 20);

    let mut timestamps: Vec<DateTime<FixedOffset>> = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = common::body_json(response).await;
        timestamps.push(
            DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap())
                .expect("timestamp should be RFC 3339"),
        );
    }

    assert!(timestamps[1] >= timestamps[0]);
}
