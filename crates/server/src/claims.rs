// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller extraction from gateway-forwarded identity claims.
//!
//! Tokens are verified by the gateway in front of this server, which
//! forwards the verified claims as a JSON object in the
//! `x-authorizer-claims` header. This extractor only parses them.
//!
//! # Errors
//!
//! Rejects the request with 401 if:
//! - the header is missing
//! - the header is not valid UTF-8
//! - the header is not a JSON object
//! - the claims carry no subject

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use nafuda_api::{ApiError, CallerIdentity};

use crate::{AppState, HttpError};

/// Header carrying the verified identity claims.
pub const CLAIMS_HEADER: &str = "x-authorizer-claims";

/// Extractor for the authenticated caller.
pub struct Caller(pub CallerIdentity);

fn unauthenticated(reason: &str) -> HttpError {
    HttpError::from(ApiError::Unauthenticated {
        reason: reason.to_string(),
    })
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw: &str = parts
            .headers
            .get(CLAIMS_HEADER)
            .ok_or_else(|| {
                debug!("Missing claims header");
                unauthenticated("missing identity claims")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Claims header is not valid UTF-8");
                unauthenticated("unreadable identity claims")
            })?;

        let claims: Map<String, Value> = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(claims)) => claims,
            Ok(_) | Err(_) => {
                warn!("Claims header is not a JSON object");
                return Err(unauthenticated("identity claims must be a JSON object"));
            }
        };

        let identity: CallerIdentity = CallerIdentity::from_claims(&claims, &state.groups_claim)
            .map_err(|e| {
                warn!(error = %e, "Rejected identity claims");
                HttpError::from(e)
            })?;

        Ok(Self(identity))
    }
}
