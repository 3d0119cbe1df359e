// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use serde_json::Value;

use nafuda::{FixedClock, ScopedRecipients};
use nafuda_domain::{MemberDraft, MemberId, MemberStatus};
use nafuda_persistence::Persistence;

use crate::{ApiError, CallerIdentity, FieldMap, GroupMembershipGate, RequestContext};

/// Owns everything a `RequestContext` borrows, so tests can hand out
/// contexts while holding `&mut Persistence` separately.
pub struct TestEnv {
    pub gate: GroupMembershipGate,
    pub admin: CallerIdentity,
    pub member: CallerIdentity,
    pub clock: FixedClock,
    pub policy: ScopedRecipients,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            gate: GroupMembershipGate::default(),
            admin: create_test_admin(),
            member: create_test_member_caller(),
            clock: FixedClock("2026-02-10 12:00:00".parse().unwrap()),
            policy: ScopedRecipients::default(),
        }
    }

    pub fn as_admin(&self) -> RequestContext<'_> {
        RequestContext {
            gate: &self.gate,
            caller: &self.admin,
            clock: &self.clock,
        }
    }

    pub fn as_member(&self) -> RequestContext<'_> {
        RequestContext {
            gate: &self.gate,
            caller: &self.member,
            clock: &self.clock,
        }
    }
}

pub fn create_test_admin() -> CallerIdentity {
    CallerIdentity::new(String::from("admin-123"), vec![String::from("admins")])
}

pub fn create_test_member_caller() -> CallerIdentity {
    CallerIdentity::new(String::from("member-456"), vec![String::from("members")])
}

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn fields(body: Value) -> FieldMap {
    FieldMap::from_json(body).expect("Test body must be a JSON object")
}

pub fn register_test_member(
    persistence: &mut Persistence,
    first_name: &str,
    status: MemberStatus,
) -> MemberId {
    let draft: MemberDraft = MemberDraft {
        first_name: first_name.to_string(),
        last_name: String::from("Sato"),
        email: format!("{}@example.com", first_name.to_lowercase()),
        rank_type: String::from("Dan"),
        rank_number: String::from("2"),
        zekken_text: String::new(),
        status,
    };
    persistence
        .register_member(&draft)
        .expect("Failed to register member")
        .member_id
}

pub fn assert_kind(result: Result<impl std::fmt::Debug, ApiError>, kind: crate::ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {kind} error, got success: {value:?}"),
        Err(err) => assert_eq!(err.kind(), kind, "unexpected error: {err}"),
    }
}
