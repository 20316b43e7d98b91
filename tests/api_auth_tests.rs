// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication tests for protected and public routes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

const PROTECTED_ROUTES: [(&str, &str); 10] = [
    ("GET", "/api/me"),
    ("GET", "/api/auth/me"),
    ("PUT", "/api/me"),
    ("GET", "/api/trips"),
    ("POST", "/api/trips"),
    ("GET", "/api/trips/stats"),
    ("GET", "/api/dashboard"),
    ("GET", "/api/dashboard/progress"),
    ("POST", "/api/leaderboard/update"),
    ("POST", "/api/routes/compare"),
];

#[tokio::test]
async fn test_protected_routes_require_token() {
    for (method, uri) in PROTECTED_ROUTES {
        let (app, _state) = common::create_test_app();

        let response = app
            .oneshot(common::json_request(method, uri, None, None))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require auth"
        );
    }
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", b"some_other_signing_key_32_bytes!");

    let response = app
        .oneshot(common::json_request("GET", "/api/trips", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/trips")
                .header(header::AUTHORIZATION, "Token abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::json_request("GET", "/api/trips", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_cookie_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/trips/stats")
                .header(header::COOKIE, format!("greenways_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let response = app
        .oneshot(common::json_request("GET", "/api/leaderboard", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
