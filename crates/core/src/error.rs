// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nafuda_domain::{AssignmentKey, DomainError, MemberId, PaymentId, Timestamp};

use crate::ports::StoreError;

/// Errors that can occur during payment lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The member is not on the roster.
    MemberNotFound(MemberId),
    /// The payment is not in the catalog.
    PaymentNotFound(PaymentId),
    /// No outstanding assignment exists for the pair.
    AssignmentNotFound(AssignmentKey),
    /// The pair is already assigned.
    DuplicateAssignment(AssignmentKey),
    /// A submission with the same pair and `submitted_on` already exists.
    DuplicateSubmission {
        key: AssignmentKey,
        submitted_on: Timestamp,
    },
    /// A partial update carried no fields.
    NothingToUpdate,
    /// A broadcast stopped part-way through its fan-out.
    BroadcastAborted {
        /// The payment the broadcast created.
        payment_id: PaymentId,
        /// The member whose assignment failed, if the fan-out had started.
        member_id: Option<MemberId>,
        /// Whether the payment and its assignments were removed again.
        rolled_back: bool,
        /// The underlying failure.
        cause: Box<Self>,
    },
    /// A storage collaborator failed.
    Store(StoreError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::MemberNotFound(id) => write!(f, "Invalid member ID: {id}"),
            Self::PaymentNotFound(id) => write!(f, "Invalid payment ID: {id}"),
            Self::AssignmentNotFound(key) => write!(f, "No outstanding assignment for {key}"),
            Self::DuplicateAssignment(key) => write!(f, "Payment already assigned for {key}"),
            Self::DuplicateSubmission { key, submitted_on } => write!(
                f,
                "A submission for {key} is already recorded at {submitted_on}"
            ),
            Self::NothingToUpdate => write!(f, "No fields to update"),
            Self::BroadcastAborted {
                payment_id,
                member_id,
                rolled_back,
                cause,
            } => {
                match member_id {
                    Some(member_id) => write!(
                        f,
                        "Broadcast of payment {payment_id} failed at member {member_id}: {cause}"
                    )?,
                    None => write!(f, "Broadcast of payment {payment_id} failed: {cause}")?,
                }
                if *rolled_back {
                    write!(f, " (payment withdrawn)")
                } else {
                    write!(f, " (payment could not be withdrawn)")
                }
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
