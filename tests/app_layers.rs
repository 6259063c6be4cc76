mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use coffee_shop_api::{app::build_router, config::Config};

use common::*;

fn config(app_env: &str) -> Config {
    let app_env = app_env.to_string();
    Config::from_lookup(move |key| match key {
        "AUTH0_DOMAIN" => Some("issuer".to_string()),
        "AUTH_AUDIENCE" => Some(AUDIENCE.to_string()),
        "APP_ENV" => Some(app_env.clone()),
        "CORS_ALLOWED_ORIGINS" => Some("https://shop.example".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn responses_carry_security_headers_and_a_request_id() {
    let app = TestApp::new();
    let router = build_router(app.state.clone(), &config("development"));

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let app = TestApp::new();
    let router = build_router(app.state.clone(), &config("development"));

    let response = router
        .oneshot(
            Request::get("/drinks-detail")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn production_cors_only_allows_listed_origins() {
    let app = TestApp::new();
    let router = build_router(app.state.clone(), &config("production"));

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/drinks")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = router
        .clone()
        .oneshot(preflight("https://shop.example"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://shop.example"
    );

    let denied = router.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(
        !denied
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
