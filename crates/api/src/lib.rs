// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary of the payment ledger.
//!
//! Requests arrive as loosely typed field maps together with the caller's
//! identity claims. This crate authorizes the caller, turns the fields into
//! typed lifecycle requests, runs them, and renders the outcome as a
//! success or error envelope. It knows nothing about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthorizationGate, CallerIdentity, DEFAULT_ADMIN_GROUP, DEFAULT_GROUPS_CLAIM,
    GroupMembershipGate, normalize_groups,
};
pub use error::{
    ApiError, ErrorKind, translate_core_error, translate_domain_error,
    translate_persistence_error, translate_store_error,
};
pub use handlers::{
    RequestContext, assign_payment, broadcast_payment, clear_overdue, create_payment,
    list_assignments, list_payments, list_submissions, lookup_members, register_member,
    remove_payment, remove_submissions, run_overdue_sweep, submit_payment, unassign_payment,
    update_assignment, update_payment,
};
pub use request_response::{
    AssignmentKeyResponse, AssignmentResponse, BroadcastResponse, Envelope, FieldMap,
    MembersResponse, PaymentResponse, RegisterMemberResponse, RemovePaymentResponse,
    RemoveSubmissionsResponse, SubmissionResponse, SweepResponse, UnassignResponse,
};
