use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use recipe_service::config::{OpenAiSettings, RateLimitSettings};
use recipe_service::services::OpenAiClient;
use recipe_service::startup::{build_router, AppState};

/// Build a router wired to the given upstream base URL, with a test API key.
pub fn test_router(api_base: &str, timeout_secs: u64, max_requests: u32) -> Router {
    let chef = OpenAiClient::new(OpenAiSettings {
        api_key: "test-key".to_string(),
        api_base: api_base.to_string(),
        model: "gpt-3.5-turbo".to_string(),
        timeout_secs,
    })
    .expect("test client should build");

    build_router(
        AppState { chef },
        &RateLimitSettings {
            max_requests,
            window_seconds: 900,
        },
    )
}

#[allow(dead_code)]
pub fn post_recipe(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recipe")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn post_recipe_from(body: serde_json::Value, client_ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recipe")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client_ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
