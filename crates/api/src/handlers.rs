// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Every handler authorizes first, parses its fields completely, and only
//! then runs exactly one lifecycle operation. Nothing is written for a
//! rejected request.

use tracing::{error, info};

use nafuda::{
    AssignRequest, AssignmentLedger, BroadcastRequest, Clock, MemberDirectory, PaymentCatalog,
    RecipientPolicy, SubmissionLedger, SubmitRequest,
};
use nafuda_domain::{
    AssignmentChanges, AssignmentFilter, AssignmentKey, DueScope, Member, MemberDraft,
    MemberFilter, Money, PaymentChanges, PaymentDraft, PaymentFilter, SubmissionFilter,
    Timestamp, format_date,
};
use nafuda_persistence::Persistence;

use crate::auth::{AuthorizationGate, CallerIdentity};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_store_error,
};
use crate::request_response::{
    AssignmentResponse, BroadcastResponse, FieldMap, MembersResponse, PaymentResponse,
    RegisterMemberResponse, RemovePaymentResponse, RemoveSubmissionsResponse,
    SubmissionResponse, SweepResponse, UnassignResponse,
};

/// Shared context of one request.
pub struct RequestContext<'a> {
    pub gate: &'a dyn AuthorizationGate,
    pub caller: &'a CallerIdentity,
    pub clock: &'a dyn Clock,
}

impl RequestContext<'_> {
    fn require_admin(&self, action: &str) -> Result<(), ApiError> {
        self.gate.require_admin(self.caller, action)
    }
}

fn key_from(fields: &FieldMap) -> Result<AssignmentKey, ApiError> {
    Ok(AssignmentKey::new(
        fields.required_member_id("member_id")?,
        fields.required_payment_id("payment_id")?,
    ))
}

fn log_failure(action: &str, err: &ApiError) {
    if matches!(err, ApiError::UpstreamFailure { .. }) {
        error!(action, error = %err, "Operation failed");
    }
}

// ---------------------------------------------------------------------
// Payment catalog
// ---------------------------------------------------------------------

/// Lists payment definitions. Open to every authenticated caller.
///
/// # Errors
///
/// Returns an error if a filter field is malformed or the store fails.
pub fn list_payments(
    persistence: &mut Persistence,
    fields: &FieldMap,
) -> Result<Vec<PaymentResponse>, ApiError> {
    let filter: PaymentFilter = PaymentFilter {
        payment_id: fields.optional_payment_id("payment_id")?,
        title: fields.optional_string("title")?,
        created_at: fields.optional_timestamp("created_at")?,
        due_date: fields.optional_date("due_date")?,
        payment_value: fields.optional_money("payment_value")?,
        overdue_penalty: fields.optional_money("overdue_penalty")?,
        event_id: fields.optional_event_id("event_id")?,
    };

    let payments = persistence
        .payments(&filter)
        .map_err(|e| translate_store_error(&e))?;
    Ok(payments.into_iter().map(PaymentResponse::from).collect())
}

/// Creates a payment definition.
///
/// A missing title defaults to `Payment due <due_date>`.
///
/// # Errors
///
/// Returns an error if:
/// - the caller is not an admin
/// - `due_date` or `payment_value` is missing or malformed
/// - the value is below `$1.00` or the penalty is negative
/// - the store fails
pub fn create_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<PaymentResponse, ApiError> {
    ctx.require_admin("create_payment")?;

    let due_date = fields.required_date("due_date")?;
    let payment_value: Money = fields
        .optional_money("payment_value")?
        .ok_or_else(|| ApiError::missing("payment_value"))?;
    let draft: PaymentDraft = PaymentDraft {
        title: fields
            .optional_string("title")?
            .unwrap_or_else(|| format!("Payment due {}", format_date(due_date))),
        created_at: fields.optional_timestamp("created_at")?,
        due_date,
        payment_value,
        overdue_penalty: fields.optional_money("overdue_penalty")?,
        event_id: fields.optional_event_id("event_id")?,
    };

    let payment = nafuda::create_payment(persistence, ctx.clock, draft)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("create_payment", e))?;
    Ok(payment.into())
}

/// Applies a partial update to a payment definition.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, `payment_id` is missing,
/// no updatable field is present, a field is invalid, the payment does not
/// exist, or the store fails.
pub fn update_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<PaymentResponse, ApiError> {
    ctx.require_admin("update_payment")?;

    let payment_id = fields.required_payment_id("payment_id")?;
    let changes: PaymentChanges = PaymentChanges {
        title: fields.optional_string("title")?,
        created_at: fields.optional_timestamp("created_at")?,
        due_date: fields.optional_date("due_date")?,
        payment_value: fields.optional_money("payment_value")?,
        overdue_penalty: fields.optional_money("overdue_penalty")?,
        event_id: fields.optional_event_id("event_id")?,
    };
    if changes.is_empty() {
        return Err(ApiError::missing(
            "title, created_at, due_date, payment_value, overdue_penalty or event_id",
        ));
    }

    let payment = nafuda::update_payment(persistence, payment_id, &changes)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("update_payment", e))?;
    Ok(payment.into())
}

/// Removes a payment definition and its outstanding assignments.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, `payment_id` is missing,
/// the payment does not exist, or the store fails.
pub fn remove_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<RemovePaymentResponse, ApiError> {
    ctx.require_admin("remove_payment")?;

    let payment_id = fields.required_payment_id("payment_id")?;
    let removed = nafuda::remove_payment(persistence, payment_id)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("remove_payment", e))?;
    Ok(removed.into())
}

/// Creates a payment and assigns it to every member the recipient policy
/// selects for its due scope.
///
/// # Errors
///
/// Returns an error if:
/// - the caller is not an admin
/// - neither or both of `federation_due` and `dojo_due` are set
/// - `title` or `due_date` is missing, or a field is malformed
/// - the value is missing or below `$1.00`, or the penalty is negative
/// - an assignment fails; the payment is withdrawn again in that case
pub fn broadcast_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    policy: &dyn RecipientPolicy,
    fields: &FieldMap,
) -> Result<BroadcastResponse, ApiError> {
    ctx.require_admin("broadcast_payment")?;

    let scope: DueScope =
        DueScope::from_flags(fields.flag("federation_due")?, fields.flag("dojo_due")?)
            .map_err(translate_domain_error)?;

    let payment_value: Money = fields
        .optional_money("payment_value")?
        .ok_or_else(|| ApiError::InvalidPayment {
            message: String::from(
                "Invalid payment value. Please create a payment of at least $1.00.",
            ),
        })?;
    let draft: PaymentDraft = PaymentDraft {
        title: fields.required_string("title")?,
        created_at: fields.optional_timestamp("created_at")?,
        due_date: fields.required_date("due_date")?,
        payment_value,
        overdue_penalty: fields.optional_money("overdue_penalty")?,
        event_id: fields.optional_event_id("event_id")?,
    };

    let outcome = nafuda::broadcast_payment(
        persistence,
        ctx.clock,
        policy,
        BroadcastRequest { draft, scope },
    )
    .map_err(translate_core_error)
    .inspect_err(|e| log_failure("broadcast_payment", e))?;

    info!(
        subject = %ctx.caller.subject,
        payment_id = %outcome.payment.payment_id,
        assigned = outcome.assigned_member_count,
        "Broadcast payment"
    );
    Ok(outcome.into())
}

/// Runs the overdue sweep as of the clock's current time.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the store fails.
pub fn clear_overdue(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
) -> Result<SweepResponse, ApiError> {
    ctx.require_admin("clear_overdue")?;
    run_overdue_sweep(persistence, ctx.clock.now())
}

/// Runs the overdue sweep without an authorization check.
///
/// For the server's scheduler only.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn run_overdue_sweep(
    persistence: &mut Persistence,
    as_of: Timestamp,
) -> Result<SweepResponse, ApiError> {
    let marked = nafuda::sweep_overdue(persistence, as_of)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("clear_overdue", e))?;

    Ok(SweepResponse {
        as_of,
        marked_count: marked.len(),
        marked: marked.into_iter().map(Into::into).collect(),
    })
}

// ---------------------------------------------------------------------
// Assignment ledger
// ---------------------------------------------------------------------

/// Lists outstanding assignments.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a filter field is
/// malformed, or the store fails.
pub fn list_assignments(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<Vec<AssignmentResponse>, ApiError> {
    ctx.require_admin("list_assignments")?;

    let filter: AssignmentFilter = AssignmentFilter {
        member_id: fields.optional_member_id("member_id")?,
        payment_id: fields.optional_payment_id("payment_id")?,
        status: fields.optional_status("status")?,
        assigned_on: fields.optional_timestamp("assigned_on")?,
    };

    let entries = persistence
        .assignments(&filter)
        .map_err(|e| translate_store_error(&e))?;
    Ok(entries.into_iter().map(AssignmentResponse::from).collect())
}

/// Assigns a payment to a member.
///
/// # Errors
///
/// Returns an error if:
/// - the caller is not an admin
/// - `member_id` or `payment_id` is missing or not an integer
/// - the member or payment does not exist
/// - the pair is already assigned
/// - the store fails
pub fn assign_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<AssignmentResponse, ApiError> {
    ctx.require_admin("assign_payment")?;

    let key: AssignmentKey = key_from(fields)?;
    let request: AssignRequest = AssignRequest {
        member_id: key.member_id,
        payment_id: key.payment_id,
        assigned_on: fields.optional_timestamp("assigned_on")?,
        status: fields.optional_status("status")?,
    };

    let entry = nafuda::assign_payment(persistence, ctx.clock, request)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("assign_payment", e))?;
    Ok(entry.into())
}

/// Removes an outstanding assignment without recording a submission.
/// Removing a pair that is not assigned succeeds with `removed: false`.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a key field is missing,
/// or the store fails.
pub fn unassign_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<UnassignResponse, ApiError> {
    ctx.require_admin("unassign_payment")?;

    let key: AssignmentKey = key_from(fields)?;
    let removed = nafuda::unassign_payment(persistence, key)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("unassign_payment", e))?;

    Ok(UnassignResponse {
        removed: removed.is_some(),
        assignment: removed.map(Into::into),
    })
}

/// Applies a partial update to an outstanding assignment.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a key field is missing,
/// neither `assigned_on` nor `status` is present, the assignment does not
/// exist, or the store fails.
pub fn update_assignment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<AssignmentResponse, ApiError> {
    ctx.require_admin("update_assignment")?;

    let key: AssignmentKey = key_from(fields)?;
    let changes: AssignmentChanges = AssignmentChanges {
        assigned_on: fields.optional_timestamp("assigned_on")?,
        status: fields.optional_status("status")?,
    };
    if changes.is_empty() {
        return Err(ApiError::missing("assigned_on or status"));
    }

    let entry = nafuda::update_assignment(persistence, key, &changes)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("update_assignment", e))?;
    Ok(entry.into())
}

// ---------------------------------------------------------------------
// Submission ledger
// ---------------------------------------------------------------------

fn submission_filter(fields: &FieldMap) -> Result<SubmissionFilter, ApiError> {
    Ok(SubmissionFilter {
        member_id: fields.optional_member_id("member_id")?,
        payment_id: fields.optional_payment_id("payment_id")?,
        assigned_on: fields.optional_timestamp("assigned_on")?,
        submitted_on: fields.optional_timestamp("submitted_on")?,
        overdue: fields.optional_bool("overdue")?,
        total_paid: fields.optional_money("total_paid")?,
    })
}

/// Lists recorded submissions.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a filter field is
/// malformed, or the store fails.
pub fn list_submissions(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<Vec<SubmissionResponse>, ApiError> {
    ctx.require_admin("list_submissions")?;

    let entries = persistence
        .submissions(&submission_filter(fields)?)
        .map_err(|e| translate_store_error(&e))?;
    Ok(entries.into_iter().map(SubmissionResponse::from).collect())
}

/// Settles an outstanding assignment into the submission ledger.
///
/// # Errors
///
/// Returns an error if:
/// - the caller is not an admin
/// - `member_id` or `payment_id` is missing or not an integer
/// - the member does not exist
/// - nothing is assigned for the pair
/// - the store fails
pub fn submit_payment(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<SubmissionResponse, ApiError> {
    ctx.require_admin("submit_payment")?;

    let key: AssignmentKey = key_from(fields)?;
    let request: SubmitRequest = SubmitRequest {
        member_id: key.member_id,
        payment_id: key.payment_id,
        submitted_on: fields.optional_timestamp("submitted_on")?,
    };

    let entry = nafuda::submit_payment(persistence, ctx.clock, request)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("submit_payment", e))?;
    Ok(entry.into())
}

/// Deletes submissions matching the given fields; no fields clears the
/// whole ledger.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a filter field is
/// malformed, or the store fails.
pub fn remove_submissions(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<RemoveSubmissionsResponse, ApiError> {
    ctx.require_admin("remove_submissions")?;

    let filter: SubmissionFilter = submission_filter(fields)?;
    let removed = nafuda::remove_submissions(persistence, &filter)
        .map_err(translate_core_error)
        .inspect_err(|e| log_failure("remove_submissions", e))?;

    info!(subject = %ctx.caller.subject, removed = removed.len(), "Removed submissions");
    Ok(RemoveSubmissionsResponse {
        removed_count: removed.len(),
        removed: removed.into_iter().map(Into::into).collect(),
    })
}

// ---------------------------------------------------------------------
// Member directory
// ---------------------------------------------------------------------

/// Looks members up by `member_id`, by `email`, or lists them with an
/// optional `filter` expression such as `active,no-guests`.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is malformed,
/// or the store fails.
pub fn lookup_members(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<MembersResponse, ApiError> {
    ctx.require_admin("lookup_members")?;

    if let Some(member_id) = fields.optional_member_id("member_id")? {
        let member: Option<Member> = persistence
            .member(member_id)
            .map_err(|e| translate_store_error(&e))?;
        return Ok(member.into_iter().collect());
    }

    if let Some(email) = fields.optional_string("email")? {
        return persistence
            .members_by_email(&email)
            .map_err(|e| translate_store_error(&e));
    }

    let filter: MemberFilter = match fields.optional_string("filter")? {
        Some(expr) => expr.parse().map_err(translate_domain_error)?,
        None => MemberFilter::ALL,
    };
    persistence
        .list_members(&filter)
        .map_err(translate_persistence_error)
}

/// Registers a member. A registration matching an existing member by
/// name, rank, zekken and email returns that member with `duplicate: true`.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a name or the email is
/// missing, the status is unknown, or the store fails.
pub fn register_member(
    persistence: &mut Persistence,
    ctx: &RequestContext<'_>,
    fields: &FieldMap,
) -> Result<RegisterMemberResponse, ApiError> {
    ctx.require_admin("register_member")?;

    let draft: MemberDraft = MemberDraft {
        first_name: fields.required_string("first_name")?,
        last_name: fields.required_string("last_name")?,
        email: fields.required_string("email")?,
        rank_type: fields.optional_string("rank_type")?.unwrap_or_default(),
        rank_number: fields.optional_string("rank_number")?.unwrap_or_default(),
        zekken_text: fields.optional_string("zekken_text")?.unwrap_or_default(),
        status: fields.optional_member_status("status")?.unwrap_or_default(),
    };

    let registration = persistence
        .register_member(&draft)
        .map_err(translate_persistence_error)
        .inspect_err(|e| log_failure("register_member", e))?;
    Ok(registration.into())
}
