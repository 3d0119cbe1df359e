// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Month;

use nafuda::{AssignmentLedger, PaymentCatalog, PaymentStore, StoreError};
use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentFilter, AssignmentKey, AssignmentStatus,
    MemberId, MemberStatus, PaymentId,
};

use crate::Persistence;
use crate::tests::{create_test_payment, date, register, ts};

fn setup() -> (Persistence, MemberId, MemberId) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let aiko: MemberId = register(&mut persistence, "Aiko", MemberStatus::Active);
    let kenji: MemberId = register(&mut persistence, "Kenji", MemberStatus::Active);
    persistence
        .insert_payment(&create_test_payment(1, date(2026, Month::February, 1)))
        .unwrap();
    persistence
        .insert_payment(&create_test_payment(2, date(2026, Month::March, 1)))
        .unwrap();
    (persistence, aiko, kenji)
}

fn entry(member_id: MemberId, payment_id: i64) -> AssignmentEntry {
    AssignmentEntry {
        member_id,
        payment_id: PaymentId::new(payment_id),
        status: AssignmentStatus::Due,
        assigned_on: ts("2026-01-10 08:00:00"),
    }
}

#[test]
fn test_assignment_round_trips() {
    let (mut persistence, aiko, _) = setup();
    let assigned: AssignmentEntry = entry(aiko, 1);

    persistence.insert_assignment(&assigned).unwrap();

    assert_eq!(
        persistence.assignment(assigned.key()).unwrap(),
        Some(assigned)
    );
}

#[test]
fn test_second_assignment_of_pair_conflicts() {
    let (mut persistence, aiko, _) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();

    let result: Result<(), StoreError> = persistence.insert_assignment(&entry(aiko, 1));
    assert!(matches!(result, Err(StoreError::Conflict(_))));
}

#[test]
fn test_assignment_to_unknown_payment_is_rejected() {
    let (mut persistence, aiko, _) = setup();

    let result: Result<(), StoreError> = persistence.insert_assignment(&entry(aiko, 42));
    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[test]
fn test_assignments_filter_by_member_and_status() {
    let (mut persistence, aiko, kenji) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();
    persistence.insert_assignment(&entry(aiko, 2)).unwrap();
    let mut overdue: AssignmentEntry = entry(kenji, 1);
    overdue.status = AssignmentStatus::Overdue;
    persistence.insert_assignment(&overdue).unwrap();

    let for_aiko = persistence
        .assignments(&AssignmentFilter {
            member_id: Some(aiko),
            ..AssignmentFilter::default()
        })
        .unwrap();
    assert_eq!(for_aiko.len(), 2);

    let late = persistence
        .assignments(&AssignmentFilter {
            status: Some(AssignmentStatus::Overdue),
            ..AssignmentFilter::default()
        })
        .unwrap();
    assert_eq!(late, vec![overdue]);
}

#[test]
fn test_update_assignment_applies_present_fields_only() {
    let (mut persistence, aiko, _) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();
    let key: AssignmentKey = AssignmentKey::new(aiko, PaymentId::new(1));

    let updated: AssignmentEntry = persistence
        .update_assignment(
            key,
            &AssignmentChanges {
                assigned_on: None,
                status: Some(AssignmentStatus::Overdue),
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, AssignmentStatus::Overdue);
    assert_eq!(updated.assigned_on, ts("2026-01-10 08:00:00"));
}

#[test]
fn test_update_missing_assignment_is_none() {
    let (mut persistence, aiko, _) = setup();
    let key: AssignmentKey = AssignmentKey::new(aiko, PaymentId::new(2));

    let result = persistence
        .update_assignment(
            key,
            &AssignmentChanges {
                assigned_on: Some(ts("2026-02-01 00:00:00")),
                status: None,
            },
        )
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_delete_assignment_is_repeatable() {
    let (mut persistence, aiko, _) = setup();
    let assigned: AssignmentEntry = entry(aiko, 1);
    persistence.insert_assignment(&assigned).unwrap();

    assert_eq!(
        persistence.delete_assignment(assigned.key()).unwrap(),
        Some(assigned.clone())
    );
    assert_eq!(persistence.delete_assignment(assigned.key()).unwrap(), None);
}

#[test]
fn test_mark_overdue_flips_only_past_due_rows() {
    let (mut persistence, aiko, kenji) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();
    persistence.insert_assignment(&entry(kenji, 1)).unwrap();
    persistence.insert_assignment(&entry(aiko, 2)).unwrap();

    let marked: Vec<AssignmentKey> = persistence
        .mark_overdue(date(2026, Month::February, 10))
        .unwrap();

    assert_eq!(
        marked,
        vec![
            AssignmentKey::new(aiko, PaymentId::new(1)),
            AssignmentKey::new(kenji, PaymentId::new(1)),
        ]
    );
    let untouched = persistence
        .assignment(AssignmentKey::new(aiko, PaymentId::new(2)))
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, AssignmentStatus::Due);
}

#[test]
fn test_mark_overdue_keeps_due_date_itself_on_time() {
    let (mut persistence, aiko, _) = setup();
    persistence.insert_assignment(&entry(aiko, 2)).unwrap();

    assert!(
        persistence
            .mark_overdue(date(2026, Month::March, 1))
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        persistence
            .mark_overdue(date(2026, Month::March, 2))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_mark_overdue_is_idempotent() {
    let (mut persistence, aiko, _) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();

    let today = date(2026, Month::June, 1);
    assert_eq!(persistence.mark_overdue(today).unwrap().len(), 1);
    assert!(persistence.mark_overdue(today).unwrap().is_empty());
}

#[test]
fn test_remove_payment_cascade_clears_assignments() {
    let (mut persistence, aiko, kenji) = setup();
    persistence.insert_assignment(&entry(aiko, 1)).unwrap();
    persistence.insert_assignment(&entry(kenji, 1)).unwrap();
    persistence.insert_assignment(&entry(aiko, 2)).unwrap();

    let (payment, cleared) = persistence
        .remove_payment_cascade(PaymentId::new(1))
        .unwrap()
        .unwrap();

    assert_eq!(payment.payment_id, PaymentId::new(1));
    assert_eq!(cleared, 2);
    assert_eq!(
        persistence
            .assignments(&AssignmentFilter::default())
            .unwrap()
            .len(),
        1
    );
    assert!(
        persistence
            .remove_payment_cascade(PaymentId::new(1))
            .unwrap()
            .is_none()
    );
}
