// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lifecycle operations over the payment ledgers.
//!
//! Every operation validates its input completely before the first write.

use tracing::{error, info, warn};

use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentKey, AssignmentStatus, DueScope, IdCounter,
    MemberFilter, MemberId, PaymentChanges, PaymentDefinition, PaymentDraft, PaymentId,
    SubmissionEntry, SubmissionFilter, Timestamp, validate_payment_changes,
    validate_payment_draft,
};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::ports::{LedgerBackend, StoreError};
use crate::recipients::RecipientPolicy;

/// Input to [`assign_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignRequest {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
    /// Defaults to now.
    pub assigned_on: Option<Timestamp>,
    /// Defaults to `due`.
    pub status: Option<AssignmentStatus>,
}

/// Input to [`submit_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRequest {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
    /// Defaults to now.
    pub submitted_on: Option<Timestamp>,
}

/// Input to [`broadcast_payment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub draft: PaymentDraft,
    pub scope: DueScope,
}

/// Result of a completed broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub payment: PaymentDefinition,
    pub assigned_member_count: usize,
}

/// Result of removing a payment definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPayment {
    pub payment: PaymentDefinition,
    /// Outstanding assignments removed along with it.
    pub cleared_assignments: usize,
}

/// Assigns a payment to a member.
///
/// # Errors
///
/// Returns an error if:
/// - the member is not on the roster
/// - the payment is not in the catalog
/// - the pair is already assigned
/// - the store fails
pub fn assign_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    clock: &dyn Clock,
    request: AssignRequest,
) -> Result<AssignmentEntry, CoreError> {
    let key: AssignmentKey = AssignmentKey::new(request.member_id, request.payment_id);

    if !backend.member_exists(request.member_id)? {
        return Err(CoreError::MemberNotFound(request.member_id));
    }
    if backend.payment(request.payment_id)?.is_none() {
        return Err(CoreError::PaymentNotFound(request.payment_id));
    }
    if backend.assignment(key)?.is_some() {
        return Err(CoreError::DuplicateAssignment(key));
    }

    let entry: AssignmentEntry = AssignmentEntry {
        member_id: request.member_id,
        payment_id: request.payment_id,
        status: request.status.unwrap_or_default(),
        assigned_on: request.assigned_on.unwrap_or_else(|| clock.now()),
    };

    backend.insert_assignment(&entry).map_err(|e| match e {
        StoreError::Conflict(_) => CoreError::DuplicateAssignment(key),
        other => CoreError::Store(other),
    })?;

    info!(%key, status = %entry.status, "Assigned payment");
    Ok(entry)
}

/// Removes an outstanding assignment without recording a submission.
///
/// Returns the removed entry, or `None` if nothing was assigned.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn unassign_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    key: AssignmentKey,
) -> Result<Option<AssignmentEntry>, CoreError> {
    let removed: Option<AssignmentEntry> = backend.delete_assignment(key)?;
    if removed.is_some() {
        info!(%key, "Unassigned payment");
    }
    Ok(removed)
}

/// Applies a partial update to an outstanding assignment.
///
/// # Errors
///
/// Returns an error if `changes` is empty, the assignment does not exist,
/// or the store fails.
pub fn update_assignment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    key: AssignmentKey,
    changes: &AssignmentChanges,
) -> Result<AssignmentEntry, CoreError> {
    if changes.is_empty() {
        return Err(CoreError::NothingToUpdate);
    }

    let updated: AssignmentEntry = backend
        .update_assignment(key, changes)?
        .ok_or(CoreError::AssignmentNotFound(key))?;

    info!(%key, status = %updated.status, "Updated assignment");
    Ok(updated)
}

/// Settles an outstanding assignment into the submission ledger.
///
/// The charge is the payment value plus, for an overdue assignment, the
/// overdue penalty.
///
/// # Errors
///
/// Returns an error if the member or assignment does not exist, or the
/// store fails. A failed submission insert leaves the assignment in place.
pub fn submit_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    clock: &dyn Clock,
    request: SubmitRequest,
) -> Result<SubmissionEntry, CoreError> {
    let key: AssignmentKey = AssignmentKey::new(request.member_id, request.payment_id);

    if !backend.member_exists(request.member_id)? {
        return Err(CoreError::MemberNotFound(request.member_id));
    }
    let assignment: AssignmentEntry = backend
        .assignment(key)?
        .ok_or(CoreError::AssignmentNotFound(key))?;

    let definition: Option<PaymentDefinition> = backend.payment(request.payment_id)?;
    if definition.is_none() {
        warn!(%key, "Submitting assignment whose payment is no longer in the catalog");
    }

    let submitted_on: Timestamp = request.submitted_on.unwrap_or_else(|| clock.now());
    let submission: SubmissionEntry =
        SubmissionEntry::settle(&assignment, definition.as_ref(), submitted_on);

    backend.move_to_submitted(&submission).map_err(|e| match e {
        StoreError::Conflict(_) => CoreError::DuplicateSubmission {
            key,
            submitted_on: submission.submitted_on,
        },
        other => {
            error!(%key, error = %other, "Failed to record submission");
            CoreError::Store(other)
        }
    })?;

    info!(
        %key,
        total_paid = %submission.total_paid,
        overdue = submission.overdue,
        "Recorded payment submission"
    );
    Ok(submission)
}

/// Creates a payment definition and assigns it to every member the policy
/// selects for the scope.
///
/// A failure after the definition exists withdraws the definition and every
/// assignment made so far, then reports the failure. A failed broadcast can
/// therefore be retried as-is.
///
/// # Errors
///
/// Returns a validation error before anything is written, or
/// `CoreError::BroadcastAborted` if the fan-out failed.
pub fn broadcast_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    clock: &dyn Clock,
    policy: &dyn RecipientPolicy,
    request: BroadcastRequest,
) -> Result<BroadcastOutcome, CoreError> {
    let payment: PaymentDefinition = create_payment(backend, clock, request.draft)?;
    let payment_id: PaymentId = payment.payment_id;

    let filter: MemberFilter = policy.filter_for(request.scope);
    let recipients: Vec<MemberId> = match backend.member_ids(&filter) {
        Ok(ids) => ids,
        Err(e) => return Err(abort_broadcast(backend, payment_id, None, e.into())),
    };

    info!(
        %payment_id,
        scope = %request.scope,
        %filter,
        recipients = recipients.len(),
        "Broadcasting payment"
    );

    let assigned_on: Timestamp = clock.now();
    for member_id in &recipients {
        let assignment: AssignRequest = AssignRequest {
            member_id: *member_id,
            payment_id,
            assigned_on: Some(assigned_on),
            status: Some(AssignmentStatus::Due),
        };
        if let Err(e) = assign_payment(backend, clock, assignment) {
            return Err(abort_broadcast(backend, payment_id, Some(*member_id), e));
        }
    }

    Ok(BroadcastOutcome {
        payment,
        assigned_member_count: recipients.len(),
    })
}

fn abort_broadcast<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    payment_id: PaymentId,
    member_id: Option<MemberId>,
    cause: CoreError,
) -> CoreError {
    error!(%payment_id, member_id = ?member_id, error = %cause, "Broadcast failed, withdrawing payment");

    let rolled_back: bool = match backend.remove_payment_cascade(payment_id) {
        Ok(_) => true,
        Err(e) => {
            error!(%payment_id, error = %e, "Failed to withdraw broadcast payment");
            false
        }
    };

    CoreError::BroadcastAborted {
        payment_id,
        member_id,
        rolled_back,
        cause: Box::new(cause),
    }
}

/// Overdue sweep: marks every `due` assignment whose payment's due date is
/// before `now`'s date as `overdue`. Running it twice changes nothing the
/// second time.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn sweep_overdue<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    now: Timestamp,
) -> Result<Vec<AssignmentKey>, CoreError> {
    let marked: Vec<AssignmentKey> = backend.mark_overdue(now.date())?;
    info!(as_of = %now, marked = marked.len(), "Overdue sweep complete");
    Ok(marked)
}

/// Adds a payment definition to the catalog under a freshly allocated id.
///
/// # Errors
///
/// Returns an error if the draft is invalid or the store fails. Nothing is
/// allocated for an invalid draft.
pub fn create_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    clock: &dyn Clock,
    draft: PaymentDraft,
) -> Result<PaymentDefinition, CoreError> {
    validate_payment_draft(&draft)?;

    let payment_id: PaymentId = PaymentId::new(backend.next_id(IdCounter::Payment)?);
    let payment: PaymentDefinition = draft.into_definition(payment_id, clock.now());
    backend.insert_payment(&payment)?;

    info!(%payment_id, title = %payment.title, value = %payment.payment_value, "Created payment");
    Ok(payment)
}

/// Applies a partial update to a payment definition.
///
/// # Errors
///
/// Returns an error if `changes` is empty or invalid, the payment does not
/// exist, or the store fails.
pub fn update_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    payment_id: PaymentId,
    changes: &PaymentChanges,
) -> Result<PaymentDefinition, CoreError> {
    if changes.is_empty() {
        return Err(CoreError::NothingToUpdate);
    }
    validate_payment_changes(changes)?;

    let mut payment: PaymentDefinition = backend
        .payment(payment_id)?
        .ok_or(CoreError::PaymentNotFound(payment_id))?;
    payment.apply(changes);

    if !backend.replace_payment(&payment)? {
        return Err(CoreError::PaymentNotFound(payment_id));
    }

    info!(%payment_id, "Updated payment");
    Ok(payment)
}

/// Removes a payment definition and its outstanding assignments.
/// Recorded submissions are kept.
///
/// # Errors
///
/// Returns an error if the payment does not exist or the store fails.
pub fn remove_payment<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    payment_id: PaymentId,
) -> Result<RemovedPayment, CoreError> {
    let (payment, cleared_assignments) = backend
        .remove_payment_cascade(payment_id)?
        .ok_or(CoreError::PaymentNotFound(payment_id))?;

    info!(%payment_id, cleared_assignments, "Removed payment");
    Ok(RemovedPayment {
        payment,
        cleared_assignments,
    })
}

/// Deletes submissions matching `filter`; an empty filter clears the ledger.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn remove_submissions<B: LedgerBackend + ?Sized>(
    backend: &mut B,
    filter: &SubmissionFilter,
) -> Result<Vec<SubmissionEntry>, CoreError> {
    if filter.is_empty() {
        warn!("Clearing the entire submission ledger");
    }
    let removed: Vec<SubmissionEntry> = backend.delete_submissions(filter)?;
    info!(removed = removed.len(), "Removed submissions");
    Ok(removed)
}
