// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod claims_tests;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use nafuda::{FixedClock, ScopedRecipients};
use nafuda_api::{DEFAULT_GROUPS_CLAIM, GroupMembershipGate};
use nafuda_persistence::Persistence;

use crate::claims::CLAIMS_HEADER;
use crate::{AppState, build_router};

/// Helper to create test app state with in-memory persistence and a clock
/// fixed at 2026-02-10 12:00:00.
fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        gate: Arc::new(GroupMembershipGate::default()),
        policy: Arc::new(ScopedRecipients::default()),
        clock: Arc::new(FixedClock("2026-02-10 12:00:00".parse().unwrap())),
        groups_claim: Arc::from(DEFAULT_GROUPS_CLAIM),
    }
}

fn admin_claims() -> Value {
    json!({ "sub": "admin-123", "cognito:groups": "[admins]" })
}

fn member_claims() -> Value {
    json!({ "sub": "member-456", "cognito:groups": ["members"] })
}

/// Sends one request and returns the status and decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    claims: Option<&Value>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(claims) = claims {
        builder = builder.header(CLAIMS_HEADER, claims.to_string());
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, value)
}

async fn admin_post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(&admin_claims()), Some(body)).await
}

fn test_app() -> (AppState, Router) {
    let app_state: AppState = create_test_app_state();
    let app: Router = build_router(app_state.clone());
    (app_state, app)
}
