// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use crate::claims::CLAIMS_HEADER;

use super::{member_claims, send, test_app};

#[tokio::test]
async fn test_missing_claims_is_unauthenticated() {
    let (_, app) = test_app();

    let (status, body) = send(&app, "GET", "/payments", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "Unauthenticated");
}

#[tokio::test]
async fn test_malformed_claims_are_unauthenticated() {
    let (_, app) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/payments")
                .header(CLAIMS_HEADER, "not json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_claims_without_subject_are_unauthenticated() {
    let (_, app) = test_app();
    let claims = json!({ "cognito:groups": ["admins"] });

    let (status, body) = send(&app, "GET", "/payments", Some(&claims), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthenticated");
}

#[tokio::test]
async fn test_member_may_list_payments_but_not_create() {
    let (_, app) = test_app();

    let (status, body) = send(&app, "GET", "/payments", Some(&member_claims()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        "POST",
        "/payments",
        Some(&member_claims()),
        Some(json!({ "due_date": "2026-03-01", "payment_value": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
}

#[tokio::test]
async fn test_suffixed_admin_group_is_admitted() {
    let (_, app) = test_app();
    let claims = json!({ "email": "sensei@example.com", "cognito:groups": "members, dojo admins" });

    let (status, _) = send(&app, "GET", "/members", Some(&claims), None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_needs_no_claims() {
    let (_, app) = test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["service"], "nafuda-server");
}
