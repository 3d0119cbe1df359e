// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Numeric identifier of a roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric identifier of a payment definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an event (tournament, shinsa, seminar) a payment may be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named monotonic counters used to allocate identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdCounter {
    /// Member identifiers.
    Member,
    /// Payment definition identifiers.
    Payment,
    /// Event identifiers.
    Event,
}

impl IdCounter {
    /// The key under which this counter is stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Payment => "payment",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for IdCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dollar amount held to two fractional digits.
///
/// Amounts finer than a cent are rejected rather than rounded, so the
/// payment rules always see the value the caller supplied. Every amount is
/// stored at scale two, so two values that print the same compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(#[serde(serialize_with = "rust_decimal::serde::str::serialize")] Decimal);

impl Money {
    /// `$0.00`
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Smallest value a payment definition may carry: `$1.00`.
    pub const MINIMUM_PAYMENT: Self = Self(Decimal::from_parts(100, 0, 0, false, 2));

    /// Creates an amount from a decimal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FractionalCents` if the value has a non-zero
    /// digit past the cents place.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        let mut exact: Decimal = value.normalize();
        if exact.scale() > 2 {
            return Err(DomainError::FractionalCents {
                input: value.to_string(),
            });
        }
        exact.rescale(2);
        Ok(Self(exact))
    }

    /// Creates an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds two amounts, clamping at the representable range.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        let mut sum: Decimal = self.0.saturating_add(other.0);
        sum.rescale(2);
        Self(sum)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim().trim_start_matches('$');
        let value: Decimal = Decimal::from_str(trimmed).map_err(|_| DomainError::InvalidAmount {
            input: s.to_string(),
        })?;
        Self::new(value).map_err(|_| DomainError::FractionalCents {
            input: s.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: Decimal = rust_decimal::serde::str::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Lifecycle status of an outstanding assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// Assigned and not yet past its due date.
    #[default]
    Due,
    /// Swept past its due date; the overdue penalty applies on submission.
    Overdue,
}

impl AssignmentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Due => "due",
            Self::Overdue => "overdue",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" => Ok(Self::Due),
            "overdue" => Ok(Self::Overdue),
            _ => Err(DomainError::InvalidAssignmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
