// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Money;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Payment value is below the one-dollar minimum.
    InvalidPaymentValue {
        /// The rejected value.
        value: Money,
    },
    /// Overdue penalty is negative.
    InvalidOverduePenalty {
        /// The rejected penalty.
        value: Money,
    },
    /// A payment must be exactly one of federation due or dojo due.
    InvalidDueScope {
        /// Whether the federation flag was set.
        federation_due: bool,
        /// Whether the dojo flag was set.
        dojo_due: bool,
    },
    /// Payment title is blank.
    InvalidTitle(String),
    /// Assignment status is not one of the known values.
    InvalidAssignmentStatus(String),
    /// Member status is not one of the known values.
    InvalidMemberStatus(String),
    /// Recipient filter expression could not be parsed.
    InvalidMemberFilter(String),
    /// A required member attribute is blank or malformed.
    InvalidMemberField {
        /// The attribute name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// A monetary amount could not be parsed.
    InvalidAmount {
        /// The raw input.
        input: String,
    },
    /// A monetary amount carries digits past the cents place.
    FractionalCents {
        /// The raw input.
        input: String,
    },
    /// A timestamp could not be parsed.
    InvalidTimestamp {
        /// The raw input.
        input: String,
        /// The parser's complaint.
        error: String,
    },
    /// A calendar date could not be parsed.
    InvalidDate {
        /// The raw input.
        input: String,
        /// The parser's complaint.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPaymentValue { value } => {
                write!(f, "Payment value must be at least $1.00 (got ${value})")
            }
            Self::InvalidOverduePenalty { value } => {
                write!(f, "Overdue penalty must be at least $0.00 (got ${value})")
            }
            Self::InvalidDueScope {
                federation_due: true,
                dojo_due: true,
            } => write!(f, "Payment cannot be both federation due and dojo due"),
            Self::InvalidDueScope { .. } => {
                write!(f, "Payment must be either federation due or dojo due")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid payment title: {msg}"),
            Self::InvalidAssignmentStatus(status) => {
                write!(
                    f,
                    "Invalid assignment status '{status}': expected 'due' or 'overdue'"
                )
            }
            Self::InvalidMemberStatus(status) => {
                write!(
                    f,
                    "Invalid member status '{status}': expected active, exempt, guest or inactive"
                )
            }
            Self::InvalidMemberFilter(expr) => {
                write!(f, "Invalid recipient filter '{expr}'")
            }
            Self::InvalidMemberField { field, reason } => {
                write!(f, "Invalid member {field}: {reason}")
            }
            Self::InvalidAmount { input } => write!(f, "Invalid amount '{input}'"),
            Self::FractionalCents { input } => {
                write!(f, "Invalid amount '{input}': amounts stop at whole cents")
            }
            Self::InvalidTimestamp { input, error } => {
                write!(f, "Invalid timestamp '{input}': {error}")
            }
            Self::InvalidDate { input, error } => write!(f, "Invalid date '{input}': {error}"),
        }
    }
}

impl std::error::Error for DomainError {}
