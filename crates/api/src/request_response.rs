// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flat request field maps, response data transfer objects and the
//! response envelope.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use time::Date;

use nafuda::{BroadcastOutcome, RemovedPayment};
use nafuda_domain::{
    AssignmentEntry, AssignmentKey, AssignmentStatus, EventId, Member, MemberId, MemberStatus,
    Money, PaymentDefinition, PaymentId, SubmissionEntry, Timestamp, format_date, parse_date,
};
use nafuda_persistence::MemberRegistration;

use crate::error::{ApiError, ErrorKind};

/// A flat map of request fields, from a JSON body or query parameters.
///
/// A field counts as absent when it is missing, `null`, `false` or a blank
/// string. Integers and amounts are accepted as JSON numbers or numeric
/// strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Map<String, Value>,
}

impl FieldMap {
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps a JSON request body. An empty body is an empty map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidField` if the body is not a JSON object.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(ApiError::invalid("body", "request body must be a JSON object")),
        }
    }

    /// Wraps decoded query parameters; every value is a string.
    #[must_use]
    pub fn from_query(params: HashMap<String, String>) -> Self {
        Self {
            fields: params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }

    fn value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| match v {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
    }

    #[must_use]
    pub fn is_present(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    /// # Errors
    ///
    /// Returns `MissingField` if absent, `InvalidField` if not a string.
    pub fn required_string(&self, field: &str) -> Result<String, ApiError> {
        self.optional_string(field)?
            .ok_or_else(|| ApiError::missing(field))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a string.
    pub fn optional_string(&self, field: &str) -> Result<Option<String>, ApiError> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(_) => Err(ApiError::invalid(field, "expected a string")),
        }
    }

    /// # Errors
    ///
    /// Returns `MissingField` if absent, `InvalidField` if not an integer.
    pub fn required_i64(&self, field: &str) -> Result<i64, ApiError> {
        self.optional_i64(field)?
            .ok_or_else(|| ApiError::missing(field))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not an integer.
    pub fn optional_i64(&self, field: &str) -> Result<Option<i64>, ApiError> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| ApiError::invalid(field, format!("'{n}' is not an integer"))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ApiError::invalid(field, format!("'{s}' is not an integer"))),
            Some(_) => Err(ApiError::invalid(field, "expected an integer")),
        }
    }

    /// # Errors
    ///
    /// Returns `MissingField` if absent, `InvalidField` if not an integer.
    pub fn required_member_id(&self, field: &str) -> Result<MemberId, ApiError> {
        self.required_i64(field).map(MemberId::new)
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not an integer.
    pub fn optional_member_id(&self, field: &str) -> Result<Option<MemberId>, ApiError> {
        Ok(self.optional_i64(field)?.map(MemberId::new))
    }

    /// # Errors
    ///
    /// Returns `MissingField` if absent, `InvalidField` if not an integer.
    pub fn required_payment_id(&self, field: &str) -> Result<PaymentId, ApiError> {
        self.required_i64(field).map(PaymentId::new)
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not an integer.
    pub fn optional_payment_id(&self, field: &str) -> Result<Option<PaymentId>, ApiError> {
        Ok(self.optional_i64(field)?.map(PaymentId::new))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not an integer.
    pub fn optional_event_id(&self, field: &str) -> Result<Option<EventId>, ApiError> {
        Ok(self.optional_i64(field)?.map(EventId::new))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a decimal amount.
    pub fn optional_money(&self, field: &str) -> Result<Option<Money>, ApiError> {
        let raw: String = match self.value(field) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(ApiError::invalid(field, "expected an amount")),
        };
        Money::from_str(&raw)
            .map(Some)
            .map_err(|e| ApiError::invalid(field, e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a timestamp.
    pub fn optional_timestamp(&self, field: &str) -> Result<Option<Timestamp>, ApiError> {
        self.parse_text(field, |s| Timestamp::from_str(s).map_err(|e| e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `MissingField` if absent, `InvalidField` if not a date.
    pub fn required_date(&self, field: &str) -> Result<Date, ApiError> {
        self.optional_date(field)?
            .ok_or_else(|| ApiError::missing(field))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a date.
    pub fn optional_date(&self, field: &str) -> Result<Option<Date>, ApiError> {
        self.parse_text(field, |s| parse_date(s).map_err(|e| e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not `due` or `overdue`.
    pub fn optional_status(&self, field: &str) -> Result<Option<AssignmentStatus>, ApiError> {
        self.parse_text(field, |s| {
            AssignmentStatus::from_str(s).map_err(|e| e.to_string())
        })
    }

    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a member status.
    pub fn optional_member_status(&self, field: &str) -> Result<Option<MemberStatus>, ApiError> {
        self.parse_text(field, |s| MemberStatus::from_str(s).map_err(|e| e.to_string()))
    }

    /// Reads a flag; absent means `false`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a boolean.
    pub fn flag(&self, field: &str) -> Result<bool, ApiError> {
        Ok(self.optional_bool(field)?.unwrap_or(false))
    }

    /// Accepts JSON booleans, `0`/`1` and the strings `true`/`false`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if present but not a boolean.
    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, ApiError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(ApiError::invalid(field, format!("'{n}' is not a boolean"))),
            },
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(ApiError::invalid(field, format!("'{s}' is not a boolean"))),
            },
            Some(_) => Err(ApiError::invalid(field, "expected a boolean")),
        }
    }

    fn parse_text<T>(
        &self,
        field: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<Option<T>, ApiError> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) => parse(s.trim())
                .map(Some)
                .map_err(|message| ApiError::invalid(field, message)),
            Some(_) => Err(ApiError::invalid(field, "expected a string")),
        }
    }
}

/// Uniform response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error { kind: ErrorKind, message: String },
}

impl<T> Envelope<T> {
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }
}

impl Envelope<()> {
    #[must_use]
    pub fn error(err: &ApiError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A payment definition as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub title: String,
    pub created_at: Timestamp,
    pub due_date: String,
    pub payment_value: Money,
    pub overdue_penalty: Money,
    pub event_id: Option<EventId>,
}

impl From<PaymentDefinition> for PaymentResponse {
    fn from(payment: PaymentDefinition) -> Self {
        Self {
            payment_id: payment.payment_id,
            title: payment.title,
            created_at: payment.created_at,
            due_date: format_date(payment.due_date),
            payment_value: payment.payment_value,
            overdue_penalty: payment.overdue_penalty,
            event_id: payment.event_id,
        }
    }
}

/// An outstanding assignment as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentResponse {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
    pub status: AssignmentStatus,
    pub assigned_on: Timestamp,
}

impl From<AssignmentEntry> for AssignmentResponse {
    fn from(entry: AssignmentEntry) -> Self {
        Self {
            member_id: entry.member_id,
            payment_id: entry.payment_id,
            status: entry.status,
            assigned_on: entry.assigned_on,
        }
    }
}

/// Result of an unassign; `removed` is `false` when nothing was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignResponse {
    pub removed: bool,
    pub assignment: Option<AssignmentResponse>,
}

/// A recorded submission as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResponse {
    pub payment_id: PaymentId,
    pub member_id: MemberId,
    pub assigned_on: Timestamp,
    pub submitted_on: Timestamp,
    pub overdue: bool,
    pub total_paid: Money,
}

impl From<SubmissionEntry> for SubmissionResponse {
    fn from(entry: SubmissionEntry) -> Self {
        Self {
            payment_id: entry.payment_id,
            member_id: entry.member_id,
            assigned_on: entry.assigned_on,
            submitted_on: entry.submitted_on,
            overdue: entry.overdue,
            total_paid: entry.total_paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveSubmissionsResponse {
    pub removed_count: usize,
    pub removed: Vec<SubmissionResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastResponse {
    pub message: String,
    pub payment: PaymentResponse,
    pub assigned_member_count: usize,
}

impl From<BroadcastOutcome> for BroadcastResponse {
    fn from(outcome: BroadcastOutcome) -> Self {
        Self {
            message: String::from("Payment created and assigned successfully."),
            payment: outcome.payment.into(),
            assigned_member_count: outcome.assigned_member_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovePaymentResponse {
    pub payment: PaymentResponse,
    pub cleared_assignments: usize,
}

impl From<RemovedPayment> for RemovePaymentResponse {
    fn from(removed: RemovedPayment) -> Self {
        Self {
            payment: removed.payment.into(),
            cleared_assignments: removed.cleared_assignments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentKeyResponse {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
}

impl From<AssignmentKey> for AssignmentKeyResponse {
    fn from(key: AssignmentKey) -> Self {
        Self {
            member_id: key.member_id,
            payment_id: key.payment_id,
        }
    }
}

/// Result of an overdue sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepResponse {
    pub as_of: Timestamp,
    pub marked_count: usize,
    pub marked: Vec<AssignmentKeyResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterMemberResponse {
    pub member_id: MemberId,
    pub duplicate: bool,
}

impl From<MemberRegistration> for RegisterMemberResponse {
    fn from(registration: MemberRegistration) -> Self {
        Self {
            member_id: registration.member_id,
            duplicate: registration.duplicate,
        }
    }
}

/// Roster lookup results. `Member` already serializes in client form.
pub type MembersResponse = Vec<Member>;
