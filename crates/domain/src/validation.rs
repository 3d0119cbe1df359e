// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::member::MemberDraft;
use crate::payment::{PaymentChanges, PaymentDraft};
use crate::types::Money;

/// Validates that a payment value is at least `$1.00`.
///
/// # Errors
///
/// Returns `DomainError::InvalidPaymentValue` if the value is too small.
pub fn validate_payment_value(value: Money) -> Result<(), DomainError> {
    if value < Money::MINIMUM_PAYMENT {
        return Err(DomainError::InvalidPaymentValue { value });
    }
    Ok(())
}

/// Validates that an overdue penalty is not negative.
///
/// # Errors
///
/// Returns `DomainError::InvalidOverduePenalty` if the penalty is below zero.
pub fn validate_overdue_penalty(value: Money) -> Result<(), DomainError> {
    if value.is_negative() {
        return Err(DomainError::InvalidOverduePenalty { value });
    }
    Ok(())
}

/// Validates that a payment title is not blank.
///
/// # Errors
///
/// Returns `DomainError::InvalidTitle` if the title is empty after trimming.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "title must not be blank",
        )));
    }
    Ok(())
}

/// Validates a new payment definition before an id is allocated for it.
///
/// # Errors
///
/// Returns the first rule the draft violates.
pub fn validate_payment_draft(draft: &PaymentDraft) -> Result<(), DomainError> {
    validate_title(&draft.title)?;
    validate_payment_value(draft.payment_value)?;
    if let Some(penalty) = draft.overdue_penalty {
        validate_overdue_penalty(penalty)?;
    }
    Ok(())
}

/// Validates the fields present in a partial payment update.
///
/// # Errors
///
/// Returns the first rule a present field violates.
pub fn validate_payment_changes(changes: &PaymentChanges) -> Result<(), DomainError> {
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }
    if let Some(value) = changes.payment_value {
        validate_payment_value(value)?;
    }
    if let Some(penalty) = changes.overdue_penalty {
        validate_overdue_penalty(penalty)?;
    }
    Ok(())
}

/// Validates a member registration.
///
/// # Errors
///
/// Returns an error if a name is blank or the email has no `@`.
pub fn validate_member_draft(draft: &MemberDraft) -> Result<(), DomainError> {
    if draft.first_name.trim().is_empty() {
        return Err(DomainError::InvalidMemberField {
            field: "first_name",
            reason: String::from("must not be blank"),
        });
    }
    if draft.last_name.trim().is_empty() {
        return Err(DomainError::InvalidMemberField {
            field: "last_name",
            reason: String::from("must not be blank"),
        });
    }
    if !draft.email.contains('@') {
        return Err(DomainError::InvalidMemberField {
            field: "email",
            reason: format!("'{}' is not an email address", draft.email),
        });
    }
    Ok(())
}
