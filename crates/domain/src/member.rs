// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster members as seen by the payment ledger.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::types::MemberId;

/// Membership standing of a roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Currently training and paying dues.
    #[default]
    Active,
    /// Registered but exempt from dojo dues.
    Exempt,
    /// Visiting practitioner, never billed.
    Guest,
    /// Lapsed or on leave.
    Inactive,
}

impl MemberStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Exempt => "exempt",
            Self::Guest => "guest",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "exempt" => Ok(Self::Exempt),
            "guest" => Ok(Self::Guest),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidMemberStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rank_type: String,
    pub rank_number: String,
    pub zekken_text: String,
    pub status: MemberStatus,
}

/// A member registration that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rank_type: String,
    pub rank_number: String,
    pub zekken_text: String,
    pub status: MemberStatus,
}

impl MemberDraft {
    /// The duplicate-detection key for this registration.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        duplicate_fingerprint(
            &self.first_name,
            &self.last_name,
            &self.rank_type,
            &self.rank_number,
            &self.zekken_text,
            &self.email,
        )
    }

    #[must_use]
    pub fn into_member(self, member_id: MemberId) -> Member {
        Member {
            member_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            rank_type: self.rank_type,
            rank_number: self.rank_number,
            zekken_text: self.zekken_text,
            status: self.status,
        }
    }
}

/// Builds the key used to detect a member being registered twice.
///
/// Names, rank type and email compare case-insensitively; rank number and
/// zekken text compare exactly. Surrounding whitespace never matters.
#[must_use]
pub fn duplicate_fingerprint(
    first_name: &str,
    last_name: &str,
    rank_type: &str,
    rank_number: &str,
    zekken_text: &str,
    email: &str,
) -> String {
    [
        first_name.trim().to_lowercase(),
        last_name.trim().to_lowercase(),
        rank_type.trim().to_lowercase(),
        rank_number.trim().to_string(),
        zekken_text.trim().to_string(),
        email.trim().to_lowercase(),
    ]
    .join("#")
}

/// Roster selection used to resolve broadcast recipients.
///
/// All set conditions must hold for a member to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberFilter {
    /// Select only `active` members.
    pub active_only: bool,
    /// Drop `guest` members.
    pub exclude_guests: bool,
    /// Select only `exempt` members.
    pub exempt_only: bool,
}

impl MemberFilter {
    /// Every member, regardless of status.
    pub const ALL: Self = Self {
        active_only: false,
        exclude_guests: false,
        exempt_only: false,
    };

    #[must_use]
    pub const fn matches(&self, status: MemberStatus) -> bool {
        if self.active_only && !matches!(status, MemberStatus::Active) {
            return false;
        }
        if self.exclude_guests && matches!(status, MemberStatus::Guest) {
            return false;
        }
        if self.exempt_only && !matches!(status, MemberStatus::Exempt) {
            return false;
        }
        true
    }
}

impl FromStr for MemberFilter {
    type Err = DomainError;

    /// Parses a comma-separated list of `all`, `active`, `no-guests` and `exempt`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filter: Self = Self::ALL;
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "all" => {}
                "active" => filter.active_only = true,
                "no-guests" => filter.exclude_guests = true,
                "exempt" => filter.exempt_only = true,
                _ => return Err(DomainError::InvalidMemberFilter(s.to_string())),
            }
        }
        Ok(filter)
    }
}

impl std::fmt::Display for MemberFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens: Vec<&str> = Vec::new();
        if self.active_only {
            tokens.push("active");
        }
        if self.exclude_guests {
            tokens.push("no-guests");
        }
        if self.exempt_only {
            tokens.push("exempt");
        }
        if tokens.is_empty() {
            tokens.push("all");
        }
        write!(f, "{}", tokens.join(","))
    }
}
