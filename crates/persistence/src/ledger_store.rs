// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage collaborator implementations for [`Persistence`].
//!
//! The compound effects of `PaymentStore` are overridden with single
//! transactions, so a failed submit or cascade leaves no partial state.

use time::Date;

use nafuda::{
    AssignmentLedger, IdAllocator, MemberDirectory, PaymentCatalog, PaymentStore, StoreError,
    SubmissionLedger,
};
use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentFilter, AssignmentKey, IdCounter, Member,
    MemberFilter, MemberId, PaymentDefinition, PaymentFilter, PaymentId, SubmissionEntry,
    SubmissionFilter,
};

use crate::Persistence;
use crate::{mutations, queries};

impl MemberDirectory for Persistence {
    fn member_exists(&mut self, member_id: MemberId) -> Result<bool, StoreError> {
        Ok(queries::members::member_exists(&mut self.conn, member_id)?)
    }

    fn member(&mut self, member_id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(queries::members::get_member(&mut self.conn, member_id)?)
    }

    fn members_by_email(&mut self, email: &str) -> Result<Vec<Member>, StoreError> {
        Ok(queries::members::get_members_by_email(&mut self.conn, email)?)
    }

    fn member_ids(&mut self, filter: &MemberFilter) -> Result<Vec<MemberId>, StoreError> {
        Ok(queries::members::list_member_ids(&mut self.conn, filter)?)
    }
}

impl IdAllocator for Persistence {
    fn next_id(&mut self, counter: IdCounter) -> Result<i64, StoreError> {
        Ok(mutations::counters::next_counter_value(&mut self.conn, counter)?)
    }
}

impl PaymentCatalog for Persistence {
    fn insert_payment(&mut self, payment: &PaymentDefinition) -> Result<(), StoreError> {
        Ok(mutations::payments::insert_payment(&mut self.conn, payment)?)
    }

    fn payment(&mut self, payment_id: PaymentId) -> Result<Option<PaymentDefinition>, StoreError> {
        Ok(queries::payments::get_payment(&mut self.conn, payment_id)?)
    }

    fn payments(&mut self, filter: &PaymentFilter) -> Result<Vec<PaymentDefinition>, StoreError> {
        Ok(queries::payments::list_payments(&mut self.conn, filter)?)
    }

    fn replace_payment(&mut self, payment: &PaymentDefinition) -> Result<bool, StoreError> {
        Ok(mutations::payments::replace_payment(&mut self.conn, payment)?)
    }

    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<bool, StoreError> {
        Ok(mutations::payments::delete_payment(&mut self.conn, payment_id)?)
    }
}

impl AssignmentLedger for Persistence {
    fn insert_assignment(&mut self, entry: &AssignmentEntry) -> Result<(), StoreError> {
        Ok(mutations::assignments::insert_assignment(&mut self.conn, entry)?)
    }

    fn assignment(&mut self, key: AssignmentKey) -> Result<Option<AssignmentEntry>, StoreError> {
        Ok(queries::assignments::get_assignment(&mut self.conn, key)?)
    }

    fn assignments(
        &mut self,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentEntry>, StoreError> {
        Ok(queries::assignments::list_assignments(&mut self.conn, filter)?)
    }

    fn update_assignment(
        &mut self,
        key: AssignmentKey,
        changes: &AssignmentChanges,
    ) -> Result<Option<AssignmentEntry>, StoreError> {
        Ok(mutations::assignments::update_assignment(
            &mut self.conn,
            key,
            changes,
        )?)
    }

    fn delete_assignment(
        &mut self,
        key: AssignmentKey,
    ) -> Result<Option<AssignmentEntry>, StoreError> {
        Ok(mutations::assignments::delete_assignment(&mut self.conn, key)?)
    }
}

impl SubmissionLedger for Persistence {
    fn insert_submission(&mut self, entry: &SubmissionEntry) -> Result<(), StoreError> {
        Ok(mutations::submissions::insert_submission(&mut self.conn, entry)?)
    }

    fn submissions(
        &mut self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionEntry>, StoreError> {
        Ok(queries::submissions::list_submissions(&mut self.conn, filter)?)
    }

    fn delete_submissions(
        &mut self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionEntry>, StoreError> {
        Ok(mutations::submissions::delete_submissions(&mut self.conn, filter)?)
    }
}

impl PaymentStore for Persistence {
    fn move_to_submitted(&mut self, submission: &SubmissionEntry) -> Result<(), StoreError> {
        Ok(mutations::submissions::move_to_submitted(
            &mut self.conn,
            submission,
        )?)
    }

    fn mark_overdue(&mut self, today: Date) -> Result<Vec<AssignmentKey>, StoreError> {
        Ok(mutations::assignments::mark_overdue(&mut self.conn, today)?)
    }

    fn remove_payment_cascade(
        &mut self,
        payment_id: PaymentId,
    ) -> Result<Option<(PaymentDefinition, usize)>, StoreError> {
        Ok(mutations::payments::remove_payment_cascade(
            &mut self.conn,
            payment_id,
        )?)
    }
}
