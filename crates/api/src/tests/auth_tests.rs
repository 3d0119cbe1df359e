// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value, json};

use crate::{
    ApiError, AuthorizationGate, CallerIdentity, DEFAULT_GROUPS_CLAIM, GroupMembershipGate,
    normalize_groups,
};

fn claims(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("claims must be an object, got {other}"),
    }
}

fn caller_in(groups: &[&str]) -> CallerIdentity {
    CallerIdentity::new(
        String::from("caller"),
        groups.iter().map(|g| (*g).to_string()).collect(),
    )
}

#[test]
fn test_identity_prefers_subject_claim() {
    let claims = claims(json!({
        "sub": "abc-123",
        "email": "sensei@example.com",
        "cognito:groups": ["admins"],
    }));

    let identity = CallerIdentity::from_claims(&claims, DEFAULT_GROUPS_CLAIM).unwrap();

    assert_eq!(identity.subject, "abc-123");
    assert_eq!(identity.groups, vec![String::from("admins")]);
}

#[test]
fn test_identity_falls_back_to_email() {
    let claims = claims(json!({ "sub": "  ", "email": "sensei@example.com" }));

    let identity = CallerIdentity::from_claims(&claims, DEFAULT_GROUPS_CLAIM).unwrap();

    assert_eq!(identity.subject, "sensei@example.com");
    assert!(identity.groups.is_empty());
}

#[test]
fn test_identity_without_subject_is_unauthenticated() {
    let claims = claims(json!({ "cognito:groups": "admins" }));

    let result = CallerIdentity::from_claims(&claims, DEFAULT_GROUPS_CLAIM);

    assert!(matches!(result, Err(ApiError::Unauthenticated { .. })));
}

#[test]
fn test_identity_reads_configured_groups_claim() {
    let claims = claims(json!({ "sub": "x", "groups": "dojo admins" }));

    let identity = CallerIdentity::from_claims(&claims, "groups").unwrap();

    assert_eq!(identity.groups, vec![String::from("dojo admins")]);
}

#[test]
fn test_normalize_groups_shapes() {
    assert_eq!(
        normalize_groups(&json!(["admins", "members"])),
        vec![String::from("admins"), String::from("members")]
    );
    assert_eq!(
        normalize_groups(&json!("[admins, members]")),
        vec![String::from("admins"), String::from("members")]
    );
    assert_eq!(
        normalize_groups(&json!("admins,members")),
        vec![String::from("admins"), String::from("members")]
    );
    assert_eq!(
        normalize_groups(&json!("[\"admins\"]")),
        vec![String::from("admins")]
    );
}

#[test]
fn test_normalize_groups_drops_empty_and_non_string_entries() {
    assert_eq!(
        normalize_groups(&json!(["", 7, " admins "])),
        vec![String::from("admins")]
    );
    assert!(normalize_groups(&json!("[]")).is_empty());
    assert!(normalize_groups(&json!(42)).is_empty());
    assert!(normalize_groups(&Value::Null).is_empty());
}

#[test]
fn test_gate_admits_exact_and_suffixed_groups() {
    let gate = GroupMembershipGate::default();

    assert!(gate.is_admin(&caller_in(&["admins"])));
    assert!(gate.is_admin(&caller_in(&["members", "dojo admins"])));
    assert!(!gate.is_admin(&caller_in(&["superadmins"])));
    assert!(!gate.is_admin(&caller_in(&["members"])));
    assert!(!gate.is_admin(&caller_in(&[])));
}

#[test]
fn test_gate_honours_custom_admin_group() {
    let gate = GroupMembershipGate::new("senseis");

    assert!(gate.is_admin(&caller_in(&["senseis"])));
    assert!(gate.is_admin(&caller_in(&["head senseis"])));
    assert!(!gate.is_admin(&caller_in(&["admins"])));
}

#[test]
fn test_require_admin_names_the_action() {
    let gate = GroupMembershipGate::default();

    let result = gate.require_admin(&caller_in(&["members"]), "assign_payment");

    assert_eq!(
        result,
        Err(ApiError::Forbidden {
            action: String::from("assign_payment")
        })
    );
    assert!(gate.require_admin(&caller_in(&["admins"]), "assign_payment").is_ok());
}
