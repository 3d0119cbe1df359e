// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and the authorization gate.
//!
//! Tokens are verified upstream by the gateway; this module only reads the
//! claims it forwards. Group claims arrive in several shapes depending on
//! the identity provider and the gateway's stringification, so they are
//! normalized before any decision is made.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Claim carrying the caller's groups when none is configured.
pub const DEFAULT_GROUPS_CLAIM: &str = "cognito:groups";

/// Group that grants administrative access when none is configured.
pub const DEFAULT_ADMIN_GROUP: &str = "admins";

/// An authenticated caller as described by forwarded identity claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The `sub` claim, or the `email` claim when no subject is present.
    pub subject: String,
    /// Normalized group names.
    pub groups: Vec<String>,
}

impl CallerIdentity {
    #[must_use]
    pub const fn new(subject: String, groups: Vec<String>) -> Self {
        Self { subject, groups }
    }

    /// Builds an identity from a verified claims object.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` if neither `sub` nor `email` is a
    /// non-empty string.
    pub fn from_claims(claims: &Map<String, Value>, groups_claim: &str) -> Result<Self, ApiError> {
        let subject: String = ["sub", "email"]
            .iter()
            .filter_map(|name| claims.get(*name).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Unauthenticated {
                reason: String::from("claims carry no subject"),
            })?;

        let groups: Vec<String> = claims.get(groups_claim).map_or_else(Vec::new, normalize_groups);

        debug!(subject = %subject, groups = ?groups, "Resolved caller identity");
        Ok(Self { subject, groups })
    }
}

/// Flattens a group claim into a list of group names.
///
/// Accepts a JSON array of strings, a bracketed string such as
/// `"[admins, members]"`, or a comma-separated string. Entries are trimmed
/// and empty entries dropped. Anything else yields no groups.
#[must_use]
pub fn normalize_groups(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::String(s) => split_group_list(s),
                _ => Vec::new(),
            })
            .collect(),
        Value::String(s) => split_group_list(s),
        _ => Vec::new(),
    }
}

fn split_group_list(raw: &str) -> Vec<String> {
    let trimmed: &str = raw.trim();
    let inner: &str = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|g| g.trim().trim_matches('"').trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decides whether a caller may perform administrative operations.
pub trait AuthorizationGate: Send + Sync {
    fn is_admin(&self, caller: &CallerIdentity) -> bool;

    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` naming `action` if the caller is not an
    /// administrator.
    fn require_admin(&self, caller: &CallerIdentity, action: &str) -> Result<(), ApiError> {
        if self.is_admin(caller) {
            return Ok(());
        }
        warn!(subject = %caller.subject, action, "Rejected non-admin caller");
        Err(ApiError::Forbidden {
            action: action.to_string(),
        })
    }
}

/// Admits callers in the admin group or in any group named
/// `"<something> <admin group>"`, such as `"dojo admins"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembershipGate {
    admin_group: String,
    suffix: String,
}

impl GroupMembershipGate {
    #[must_use]
    pub fn new(admin_group: &str) -> Self {
        let admin_group: String = admin_group.trim().to_string();
        let suffix: String = format!(" {admin_group}");
        Self {
            admin_group,
            suffix,
        }
    }
}

impl Default for GroupMembershipGate {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_GROUP)
    }
}

impl AuthorizationGate for GroupMembershipGate {
    fn is_admin(&self, caller: &CallerIdentity) -> bool {
        caller
            .groups
            .iter()
            .any(|g| *g == self.admin_group || g.ends_with(&self.suffix))
    }
}
