// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;

use nafuda_domain::{MemberId, MemberStatus};

use crate::{ErrorKind, FieldMap, lookup_members, register_member};

use super::helpers::{TestEnv, assert_kind, fields, register_test_member, setup_test_persistence};

#[test]
fn test_register_member_detects_duplicates() {
    let mut persistence = setup_test_persistence();
    let env = TestEnv::new();
    let body = fields(json!({
        "first_name": "Aiko",
        "last_name": "Sato",
        "email": "Aiko@Example.com",
        "rank_type": "Dan",
        "rank_number": "2",
    }));

    let first = register_member(&mut persistence, &env.as_admin(), &body).unwrap();
    assert!(!first.duplicate);
    assert_eq!(first.member_id, MemberId::new(1));

    let second = register_member(&mut persistence, &env.as_admin(), &body).unwrap();
    assert!(second.duplicate);
    assert_eq!(second.member_id, first.member_id);
}

#[test]
fn test_register_member_validation() {
    let mut persistence = setup_test_persistence();
    let env = TestEnv::new();

    assert_kind(
        register_member(
            &mut persistence,
            &env.as_admin(),
            &fields(json!({ "first_name": "Aiko", "last_name": "Sato" })),
        ),
        ErrorKind::MissingField,
    );
    assert_kind(
        register_member(
            &mut persistence,
            &env.as_admin(),
            &fields(json!({ "first_name": "Aiko", "last_name": "Sato", "email": "nope" })),
        ),
        ErrorKind::InvalidMember,
    );
    assert_kind(
        register_member(
            &mut persistence,
            &env.as_admin(),
            &fields(json!({
                "first_name": "Aiko",
                "last_name": "Sato",
                "email": "aiko@example.com",
                "status": "retired",
            })),
        ),
        ErrorKind::InvalidField,
    );
}

#[test]
fn test_lookup_by_id_and_email() {
    let mut persistence = setup_test_persistence();
    let env = TestEnv::new();
    let aiko = register_test_member(&mut persistence, "Aiko", MemberStatus::Active);
    register_test_member(&mut persistence, "Kenji", MemberStatus::Guest);

    let by_id = lookup_members(
        &mut persistence,
        &env.as_admin(),
        &fields(json!({ "member_id": aiko.value() })),
    )
    .unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].first_name, "Aiko");

    let by_email = lookup_members(
        &mut persistence,
        &env.as_admin(),
        &fields(json!({ "email": "AIKO@example.com" })),
    )
    .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].member_id, aiko);

    let unknown = lookup_members(
        &mut persistence,
        &env.as_admin(),
        &fields(json!({ "member_id": 99 })),
    )
    .unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn test_lookup_with_filter_expression() {
    let mut persistence = setup_test_persistence();
    let env = TestEnv::new();
    register_test_member(&mut persistence, "Aiko", MemberStatus::Active);
    register_test_member(&mut persistence, "Kenji", MemberStatus::Guest);
    register_test_member(&mut persistence, "Hana", MemberStatus::Exempt);

    let everyone = lookup_members(&mut persistence, &env.as_admin(), &FieldMap::default()).unwrap();
    assert_eq!(everyone.len(), 3);

    let no_guests = lookup_members(
        &mut persistence,
        &env.as_admin(),
        &fields(json!({ "filter": "no-guests" })),
    )
    .unwrap();
    assert_eq!(no_guests.len(), 2);

    assert_kind(
        lookup_members(
            &mut persistence,
            &env.as_admin(),
            &fields(json!({ "filter": "black-belts" })),
        ),
        ErrorKind::InvalidField,
    );
}

#[test]
fn test_member_lookups_are_admin_only() {
    let mut persistence = setup_test_persistence();
    let env = TestEnv::new();

    assert_kind(
        lookup_members(&mut persistence, &env.as_member(), &FieldMap::default()),
        ErrorKind::Forbidden,
    );
    assert_kind(
        register_member(&mut persistence, &env.as_member(), &FieldMap::default()),
        ErrorKind::Forbidden,
    );
}
