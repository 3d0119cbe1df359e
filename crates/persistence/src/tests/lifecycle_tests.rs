// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lifecycle operations running against the `SQLite` ledger.

use time::Month;

use nafuda::{
    AssignRequest, AssignmentLedger, BroadcastOutcome, BroadcastRequest, CoreError, FixedClock,
    PaymentCatalog, ScopedRecipients, SubmitRequest, SubmissionLedger, assign_payment,
    broadcast_payment, create_payment, remove_payment, submit_payment, sweep_overdue,
    unassign_payment,
};
use nafuda_domain::{
    AssignmentFilter, AssignmentKey, AssignmentStatus, DueScope, MemberId, MemberStatus, Money,
    PaymentDefinition, PaymentFilter, SubmissionEntry, SubmissionFilter,
};

use crate::Persistence;
use crate::tests::{create_test_clock, create_test_draft, date, register, ts};

#[test]
fn test_assign_sweep_submit_charges_penalty() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let payment: PaymentDefinition = create_payment(
        &mut persistence,
        &clock,
        create_test_draft(date(2026, Month::February, 1)),
    )
    .unwrap();

    assign_payment(
        &mut persistence,
        &clock,
        AssignRequest {
            member_id: aiko,
            payment_id: payment.payment_id,
            assigned_on: None,
            status: None,
        },
    )
    .unwrap();

    let marked: Vec<AssignmentKey> = sweep_overdue(&mut persistence, clock.0).unwrap();
    assert_eq!(marked, vec![AssignmentKey::new(aiko, payment.payment_id)]);

    let receipt: SubmissionEntry = submit_payment(
        &mut persistence,
        &clock,
        SubmitRequest {
            member_id: aiko,
            payment_id: payment.payment_id,
            submitted_on: None,
        },
    )
    .unwrap();

    assert!(receipt.overdue);
    assert_eq!(receipt.total_paid, Money::from_cents(7500));
    assert_eq!(receipt.submitted_on, ts("2026-02-10 12:00:00"));
    assert!(
        persistence
            .assignments(&AssignmentFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_submit_twice_reports_missing_assignment() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let payment: PaymentDefinition = create_payment(
        &mut persistence,
        &clock,
        create_test_draft(date(2026, Month::March, 1)),
    )
    .unwrap();
    assign_payment(
        &mut persistence,
        &clock,
        AssignRequest {
            member_id: aiko,
            payment_id: payment.payment_id,
            assigned_on: None,
            status: None,
        },
    )
    .unwrap();

    let request: SubmitRequest = SubmitRequest {
        member_id: aiko,
        payment_id: payment.payment_id,
        submitted_on: None,
    };
    submit_payment(&mut persistence, &clock, request).unwrap();
    let second = submit_payment(&mut persistence, &clock, request);

    assert!(matches!(second, Err(CoreError::AssignmentNotFound(_))));
    assert_eq!(
        persistence
            .submissions(&SubmissionFilter::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_duplicate_assign_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let payment: PaymentDefinition = create_payment(
        &mut persistence,
        &clock,
        create_test_draft(date(2026, Month::March, 1)),
    )
    .unwrap();
    let request: AssignRequest = AssignRequest {
        member_id: aiko,
        payment_id: payment.payment_id,
        assigned_on: None,
        status: Some(AssignmentStatus::Due),
    };

    assign_payment(&mut persistence, &clock, request).unwrap();
    let again = assign_payment(&mut persistence, &clock, request);

    assert!(matches!(again, Err(CoreError::DuplicateAssignment(_))));
}

#[test]
fn test_broadcast_follows_recipient_policy() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();
    let active: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let inactive: MemberId = register(&mut persistence, "Kenji", MemberStatus::Inactive);
    register(&mut persistence, "Sora", MemberStatus::Guest);

    let dojo: BroadcastOutcome = broadcast_payment(
        &mut persistence,
        &clock,
        &ScopedRecipients::default(),
        BroadcastRequest {
            draft: create_test_draft(date(2026, Month::March, 1)),
            scope: DueScope::Dojo,
        },
    )
    .unwrap();
    let federation: BroadcastOutcome = broadcast_payment(
        &mut persistence,
        &clock,
        &ScopedRecipients::default(),
        BroadcastRequest {
            draft: create_test_draft(date(2026, Month::March, 1)),
            scope: DueScope::Federation,
        },
    )
    .unwrap();

    assert_eq!(dojo.assigned_member_count, 1);
    assert_eq!(federation.assigned_member_count, 2);

    let federation_members: Vec<MemberId> = persistence
        .assignments(&AssignmentFilter {
            payment_id: Some(federation.payment.payment_id),
            ..AssignmentFilter::default()
        })
        .unwrap()
        .into_iter()
        .map(|a| a.member_id)
        .collect();
    assert_eq!(federation_members, vec![active, inactive]);
}

#[test]
fn test_broadcast_to_empty_roster_creates_payment_only() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();

    let outcome: BroadcastOutcome = broadcast_payment(
        &mut persistence,
        &clock,
        &ScopedRecipients::default(),
        BroadcastRequest {
            draft: create_test_draft(date(2026, Month::March, 1)),
            scope: DueScope::Dojo,
        },
    )
    .unwrap();

    assert_eq!(outcome.assigned_member_count, 0);
    assert_eq!(
        persistence.payments(&PaymentFilter::default()).unwrap(),
        vec![outcome.payment]
    );
}

#[test]
fn test_remove_payment_keeps_submissions() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let clock: FixedClock = create_test_clock();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let kenji: MemberId = register(&mut persistence, "Kenji", MemberStatus::Active);
    let payment: PaymentDefinition = create_payment(
        &mut persistence,
        &clock,
        create_test_draft(date(2026, Month::March, 1)),
    )
    .unwrap();
    for member_id in [aiko, kenji] {
        assign_payment(
            &mut persistence,
            &clock,
            AssignRequest {
                member_id,
                payment_id: payment.payment_id,
                assigned_on: None,
                status: None,
            },
        )
        .unwrap();
    }
    submit_payment(
        &mut persistence,
        &clock,
        SubmitRequest {
            member_id: aiko,
            payment_id: payment.payment_id,
            submitted_on: None,
        },
    )
    .unwrap();

    let removed = remove_payment(&mut persistence, payment.payment_id).unwrap();

    assert_eq!(removed.cleared_assignments, 1);
    assert_eq!(persistence.payment(payment.payment_id).unwrap(), None);
    assert_eq!(
        persistence
            .submissions(&SubmissionFilter::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_unassign_missing_pair_is_noop() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);

    let removed = unassign_payment(
        &mut persistence,
        AssignmentKey::new(aiko, nafuda_domain::PaymentId::new(9)),
    )
    .unwrap();

    assert_eq!(removed, None);
}
