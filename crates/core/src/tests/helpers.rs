// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory ledger backend with fault injection.
//!
//! Uses the default compound-effect implementations on `PaymentStore`, so
//! the tests here exercise the compensation paths that SQLite overrides.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month};

use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentFilter, AssignmentKey, IdCounter, Member,
    MemberFilter, MemberId, MemberStatus, Money, PaymentDefinition, PaymentDraft, PaymentFilter,
    PaymentId, SubmissionEntry, SubmissionFilter, Timestamp,
};

use crate::{
    AssignmentLedger, FixedClock, IdAllocator, MemberDirectory, PaymentCatalog, PaymentStore,
    StoreError, SubmissionLedger,
};

#[derive(Default)]
pub struct MemoryBackend {
    pub members: BTreeMap<MemberId, Member>,
    pub payments: BTreeMap<PaymentId, PaymentDefinition>,
    pub assignments: BTreeMap<AssignmentKey, AssignmentEntry>,
    pub submissions: Vec<SubmissionEntry>,
    pub counters: HashMap<&'static str, i64>,

    /// Reject every submission insert.
    pub fail_submission_insert: bool,
    /// Reject every submission read.
    pub fail_submission_reads: bool,
    /// Number of assignment deletes to reject before succeeding.
    pub failing_assignment_deletes: u32,
    /// Reject assignment inserts for this member.
    pub fail_assign_for: Option<MemberId>,
    /// Count of assignment delete calls, successful or not.
    pub assignment_delete_calls: u32,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, id: i64, status: MemberStatus) -> MemberId {
        let member_id: MemberId = MemberId::new(id);
        self.members.insert(
            member_id,
            Member {
                member_id,
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
                email: format!("member{id}@example.com"),
                rank_type: String::from("Kyu"),
                rank_number: String::from("1"),
                zekken_text: String::new(),
                status,
            },
        );
        member_id
    }

    pub fn add_payment(&mut self, id: i64, value_cents: i64, penalty_cents: i64) -> PaymentId {
        let payment_id: PaymentId = PaymentId::new(id);
        self.payments.insert(
            payment_id,
            PaymentDefinition {
                payment_id,
                title: format!("Payment {id}"),
                created_at: ts("2026-01-01 00:00:00"),
                due_date: date(2026, Month::March, 1),
                payment_value: Money::from_cents(value_cents),
                overdue_penalty: Money::from_cents(penalty_cents),
                event_id: None,
            },
        );
        payment_id
    }
}

impl MemberDirectory for MemoryBackend {
    fn member_exists(&mut self, member_id: MemberId) -> Result<bool, StoreError> {
        Ok(self.members.contains_key(&member_id))
    }

    fn member(&mut self, member_id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.members.get(&member_id).cloned())
    }

    fn members_by_email(&mut self, email: &str) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .members
            .values()
            .filter(|m| m.email.eq_ignore_ascii_case(email))
            .cloned()
            .collect())
    }

    fn member_ids(&mut self, filter: &MemberFilter) -> Result<Vec<MemberId>, StoreError> {
        Ok(self
            .members
            .values()
            .filter(|m| filter.matches(m.status))
            .map(|m| m.member_id)
            .collect())
    }
}

impl IdAllocator for MemoryBackend {
    fn next_id(&mut self, counter: IdCounter) -> Result<i64, StoreError> {
        let value: &mut i64 = self.counters.entry(counter.as_str()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

impl PaymentCatalog for MemoryBackend {
    fn insert_payment(&mut self, payment: &PaymentDefinition) -> Result<(), StoreError> {
        if self.payments.contains_key(&payment.payment_id) {
            return Err(StoreError::Conflict(format!(
                "payment {} exists",
                payment.payment_id
            )));
        }
        self.payments.insert(payment.payment_id, payment.clone());
        Ok(())
    }

    fn payment(&mut self, payment_id: PaymentId) -> Result<Option<PaymentDefinition>, StoreError> {
        Ok(self.payments.get(&payment_id).cloned())
    }

    fn payments(&mut self, filter: &PaymentFilter) -> Result<Vec<PaymentDefinition>, StoreError> {
        Ok(self
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn replace_payment(&mut self, payment: &PaymentDefinition) -> Result<bool, StoreError> {
        match self.payments.get_mut(&payment.payment_id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<bool, StoreError> {
        Ok(self.payments.remove(&payment_id).is_some())
    }
}

impl AssignmentLedger for MemoryBackend {
    fn insert_assignment(&mut self, entry: &AssignmentEntry) -> Result<(), StoreError> {
        if self.fail_assign_for == Some(entry.member_id) {
            return Err(StoreError::Backend(String::from("injected assign failure")));
        }
        if self.assignments.contains_key(&entry.key()) {
            return Err(StoreError::Conflict(entry.key().to_string()));
        }
        self.assignments.insert(entry.key(), entry.clone());
        Ok(())
    }

    fn assignment(&mut self, key: AssignmentKey) -> Result<Option<AssignmentEntry>, StoreError> {
        Ok(self.assignments.get(&key).cloned())
    }

    fn assignments(
        &mut self,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentEntry>, StoreError> {
        Ok(self
            .assignments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn update_assignment(
        &mut self,
        key: AssignmentKey,
        changes: &AssignmentChanges,
    ) -> Result<Option<AssignmentEntry>, StoreError> {
        Ok(self.assignments.get_mut(&key).map(|entry| {
            entry.apply(changes);
            entry.clone()
        }))
    }

    fn delete_assignment(
        &mut self,
        key: AssignmentKey,
    ) -> Result<Option<AssignmentEntry>, StoreError> {
        self.assignment_delete_calls += 1;
        if self.failing_assignment_deletes > 0 {
            self.failing_assignment_deletes -= 1;
            return Err(StoreError::Backend(String::from("injected delete failure")));
        }
        Ok(self.assignments.remove(&key))
    }
}

impl SubmissionLedger for MemoryBackend {
    fn insert_submission(&mut self, entry: &SubmissionEntry) -> Result<(), StoreError> {
        if self.fail_submission_insert {
            return Err(StoreError::Backend(String::from("injected insert failure")));
        }
        if self.submissions.iter().any(|s| {
            s.key() == entry.key() && s.submitted_on == entry.submitted_on
        }) {
            return Err(StoreError::Conflict(format!(
                "submission for {} at {}",
                entry.key(),
                entry.submitted_on
            )));
        }
        self.submissions.push(entry.clone());
        Ok(())
    }

    fn submissions(
        &mut self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionEntry>, StoreError> {
        if self.fail_submission_reads {
            return Err(StoreError::Backend(String::from("injected read failure")));
        }
        Ok(self
            .submissions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    fn delete_submissions(
        &mut self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionEntry>, StoreError> {
        let (removed, kept): (Vec<SubmissionEntry>, Vec<SubmissionEntry>) = self
            .submissions
            .drain(..)
            .partition(|s| filter.matches(s));
        self.submissions = kept;
        Ok(removed)
    }
}

impl PaymentStore for MemoryBackend {}

pub fn ts(text: &str) -> Timestamp {
    text.parse().unwrap()
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap()
}

pub fn create_test_clock() -> FixedClock {
    FixedClock(ts("2026-02-10 12:00:00"))
}

pub fn create_test_draft() -> PaymentDraft {
    PaymentDraft {
        title: String::from("Dojo Dues February"),
        created_at: None,
        due_date: date(2026, Month::February, 28),
        payment_value: Money::from_cents(4500),
        overdue_penalty: Some(Money::from_cents(1000)),
        event_id: None,
    }
}
