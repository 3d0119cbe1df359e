// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which part of the roster a broadcast payment is owed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueScope {
    /// Federation dues: owed by every federation-registered member.
    Federation,
    /// Dojo dues: owed by members currently training at the dojo.
    Dojo,
}

impl DueScope {
    /// Resolves the pair of request flags into a scope.
    ///
    /// Exactly one flag must be set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDueScope` if both or neither flag is set.
    pub const fn from_flags(federation_due: bool, dojo_due: bool) -> Result<Self, DomainError> {
        match (federation_due, dojo_due) {
            (true, false) => Ok(Self::Federation),
            (false, true) => Ok(Self::Dojo),
            _ => Err(DomainError::InvalidDueScope {
                federation_due,
                dojo_due,
            }),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Federation => "federation",
            Self::Dojo => "dojo",
        }
    }
}

impl std::fmt::Display for DueScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
