// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nafuda_domain::{DueScope, MemberFilter};

/// Decides which members owe a broadcast payment.
pub trait RecipientPolicy: Send + Sync {
    fn filter_for(&self, scope: DueScope) -> MemberFilter;
}

/// A fixed roster filter per due scope.
///
/// The default bills dojo dues to active members only and federation dues
/// to every member who is not a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedRecipients {
    pub federation: MemberFilter,
    pub dojo: MemberFilter,
}

impl Default for ScopedRecipients {
    fn default() -> Self {
        Self {
            federation: MemberFilter {
                active_only: false,
                exclude_guests: true,
                exempt_only: false,
            },
            dojo: MemberFilter {
                active_only: true,
                exclude_guests: true,
                exempt_only: false,
            },
        }
    }
}

impl RecipientPolicy for ScopedRecipients {
    fn filter_for(&self, scope: DueScope) -> MemberFilter {
        match scope {
            DueScope::Federation => self.federation,
            DueScope::Dojo => self.dojo,
        }
    }
}
