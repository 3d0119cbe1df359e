// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use serde::Serialize;
use thiserror::Error;

use nafuda::{CoreError, StoreError};
use nafuda_domain::DomainError;
use nafuda_persistence::PersistenceError;

/// The closed set of failure categories a client can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    MissingField,
    InvalidField,
    InvalidMember,
    InvalidPayment,
    InvalidDueScope,
    NoSuchAssignment,
    DuplicateAssignment,
    UpstreamFailure,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Unauthenticated",
            Self::Forbidden => "Forbidden",
            Self::MissingField => "MissingField",
            Self::InvalidField => "InvalidField",
            Self::InvalidMember => "InvalidMember",
            Self::InvalidPayment => "InvalidPayment",
            Self::InvalidDueScope => "InvalidDueScope",
            Self::NoSuchAssignment => "NoSuchAssignment",
            Self::DuplicateAssignment => "DuplicateAssignment",
            Self::UpstreamFailure => "UpstreamFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain and core errors and represent the API
/// contract. The `Display` output is the client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No usable identity claims were supplied.
    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    /// The caller is not an administrator.
    #[error("Forbidden: '{action}' requires an admin group")]
    Forbidden { action: String },

    /// A required field is absent or empty.
    #[error("{field} is missing from your request, please include it.")]
    MissingField { field: String },

    /// A field is present but cannot be parsed.
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// The member is not on the roster or the registration is malformed.
    #[error("{message}")]
    InvalidMember { message: String },

    /// The payment does not exist or its amounts violate a rule.
    #[error("{message}")]
    InvalidPayment { message: String },

    /// A broadcast set neither or both of the due flags.
    #[error("{message}")]
    InvalidDueScope { message: String },

    /// No outstanding assignment exists for the pair.
    #[error("{message}")]
    NoSuchAssignment { message: String },

    /// The pair is already assigned.
    #[error("{message}")]
    DuplicateAssignment { message: String },

    /// The backing store failed.
    #[error("{message}")]
    UpstreamFailure { message: String },
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InvalidField { .. } => ErrorKind::InvalidField,
            Self::InvalidMember { .. } => ErrorKind::InvalidMember,
            Self::InvalidPayment { .. } => ErrorKind::InvalidPayment,
            Self::InvalidDueScope { .. } => ErrorKind::InvalidDueScope,
            Self::NoSuchAssignment { .. } => ErrorKind::NoSuchAssignment,
            Self::DuplicateAssignment { .. } => ErrorKind::DuplicateAssignment,
            Self::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
        }
    }

    /// Builds a `MissingField` error.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    /// Builds an `InvalidField` error.
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidPaymentValue { .. }
        | DomainError::InvalidOverduePenalty { .. }
        | DomainError::InvalidTitle(_) => ApiError::InvalidPayment { message },
        DomainError::InvalidDueScope { .. } => ApiError::InvalidDueScope { message },
        DomainError::InvalidMemberField { .. } | DomainError::InvalidMemberStatus(_) => {
            ApiError::InvalidMember { message }
        }
        DomainError::InvalidAssignmentStatus(_) => ApiError::invalid("status", message),
        DomainError::InvalidMemberFilter(_) => ApiError::invalid("filter", message),
        DomainError::InvalidAmount { .. } | DomainError::FractionalCents { .. } => {
            ApiError::invalid("amount", message)
        }
        DomainError::InvalidTimestamp { .. } => ApiError::invalid("timestamp", message),
        DomainError::InvalidDate { .. } => ApiError::invalid("date", message),
    }
}

/// Translates a store error into an API error.
#[must_use]
pub fn translate_store_error(err: &StoreError) -> ApiError {
    ApiError::UpstreamFailure {
        message: format!("Storage failure: {err}"),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::MemberNotFound(member_id) => ApiError::InvalidMember {
            message: format!("Invalid member ID: {member_id}"),
        },
        CoreError::PaymentNotFound(payment_id) => ApiError::InvalidPayment {
            message: format!("Invalid payment ID: {payment_id}"),
        },
        CoreError::AssignmentNotFound(key) => ApiError::NoSuchAssignment {
            message: format!("No outstanding assignment for {key}"),
        },
        CoreError::DuplicateAssignment(key) => ApiError::DuplicateAssignment {
            message: format!("Payment is already assigned for {key}"),
        },
        CoreError::DuplicateSubmission { key, submitted_on } => ApiError::invalid(
            "submitted_on",
            format!("a submission for {key} is already recorded at {submitted_on}"),
        ),
        CoreError::NothingToUpdate => ApiError::missing("At least one updatable field"),
        CoreError::BroadcastAborted {
            payment_id,
            member_id,
            rolled_back,
            cause,
        } => {
            let inner: ApiError = translate_core_error(*cause);
            let location: String = member_id.map_or_else(
                || String::from("while resolving recipients"),
                |m| format!("at member {m}"),
            );
            let outcome: &str = if rolled_back {
                "payment withdrawn"
            } else {
                "payment could not be withdrawn"
            };
            let message: String =
                format!("Broadcast of payment {payment_id} failed {location} ({outcome}): {inner}");
            with_message(inner, message)
        }
        CoreError::Store(store_err) => translate_store_error(&store_err),
    }
}

/// Translates a persistence error raised outside the lifecycle operations.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::InvalidInput(message) => ApiError::InvalidMember { message },
        other => ApiError::UpstreamFailure {
            message: format!("Storage failure: {other}"),
        },
    }
}

/// Keeps the kind of `err` but replaces its client-facing message. Kinds
/// whose message is derived from a field or action are left unchanged.
fn with_message(err: ApiError, message: String) -> ApiError {
    match err {
        ApiError::InvalidField { field, .. } => ApiError::InvalidField { field, message },
        ApiError::InvalidMember { .. } => ApiError::InvalidMember { message },
        ApiError::InvalidPayment { .. } => ApiError::InvalidPayment { message },
        ApiError::InvalidDueScope { .. } => ApiError::InvalidDueScope { message },
        ApiError::NoSuchAssignment { .. } => ApiError::NoSuchAssignment { message },
        ApiError::DuplicateAssignment { .. } => ApiError::DuplicateAssignment { message },
        ApiError::UpstreamFailure { .. } => ApiError::UpstreamFailure { message },
        unchanged @ (ApiError::Unauthenticated { .. }
        | ApiError::Forbidden { .. }
        | ApiError::MissingField { .. }) => unchanged,
    }
}
