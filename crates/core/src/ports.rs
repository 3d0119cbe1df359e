// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage collaborators of the payment lifecycle.
//!
//! The lifecycle never touches a database directly. Each ledger is a trait;
//! compound effects that span ledgers live on [`PaymentStore`] with a default
//! implementation composed from the single-ledger primitives. Stores that
//! have real transactions override those defaults with one atomic unit.

use std::collections::HashMap;

use time::Date;
use tracing::{debug, warn};

use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentFilter, AssignmentKey, AssignmentStatus,
    IdCounter, Member, MemberFilter, MemberId, PaymentDefinition, PaymentFilter, PaymentId,
    SubmissionEntry, SubmissionFilter,
};

/// Number of times the assignment delete is attempted after a submission
/// has been recorded.
pub const MOVE_DELETE_ATTEMPTS: u32 = 3;

/// Errors reported by storage collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    Conflict(String),
    /// The backing store failed.
    Backend(String),
    /// A submission was recorded but its assignment could not be removed.
    PartialMove {
        /// The obligation that now appears in both ledgers.
        key: AssignmentKey,
        /// The last delete failure.
        reason: String,
    },
    /// A submission insert reported success but could not be read back.
    /// The row may exist, so the submission must not be repeated.
    UnverifiedSubmission {
        /// The obligation whose submission may have been recorded.
        key: AssignmentKey,
        /// Why the read-back failed.
        reason: String,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(msg) => write!(f, "Conflicting write: {msg}"),
            Self::Backend(msg) => write!(f, "Store failure: {msg}"),
            Self::PartialMove { key, reason } => write!(
                f,
                "Submission recorded for {key} but the assignment could not be removed: {reason}"
            ),
            Self::UnverifiedSubmission { key, reason } => write!(
                f,
                "Submission for {key} may have been recorded but could not be verified; do not resubmit: {reason}"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read access to the member roster.
pub trait MemberDirectory {
    /// # Errors
    ///
    /// Returns an error if the roster cannot be read.
    fn member_exists(&mut self, member_id: MemberId) -> Result<bool, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the roster cannot be read.
    fn member(&mut self, member_id: MemberId) -> Result<Option<Member>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the roster cannot be read.
    fn members_by_email(&mut self, email: &str) -> Result<Vec<Member>, StoreError>;

    /// Ids of every member selected by `filter`, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be read.
    fn member_ids(&mut self, filter: &MemberFilter) -> Result<Vec<MemberId>, StoreError>;
}

/// Atomic named counters.
pub trait IdAllocator {
    /// Increments `counter` and returns the new value. Never returns the same
    /// value twice for one counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be advanced.
    fn next_id(&mut self, counter: IdCounter) -> Result<i64, StoreError>;
}

/// The catalog of payment definitions.
pub trait PaymentCatalog {
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the id is taken.
    fn insert_payment(&mut self, payment: &PaymentDefinition) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn payment(&mut self, payment_id: PaymentId) -> Result<Option<PaymentDefinition>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn payments(&mut self, filter: &PaymentFilter) -> Result<Vec<PaymentDefinition>, StoreError>;

    /// Overwrites every attribute of an existing definition.
    /// Returns `false` if no definition has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn replace_payment(&mut self, payment: &PaymentDefinition) -> Result<bool, StoreError>;

    /// Returns `false` if no definition has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<bool, StoreError>;
}

/// Outstanding (member, payment) obligations.
pub trait AssignmentLedger {
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the pair is already assigned.
    fn insert_assignment(&mut self, entry: &AssignmentEntry) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn assignment(&mut self, key: AssignmentKey) -> Result<Option<AssignmentEntry>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn assignments(&mut self, filter: &AssignmentFilter)
    -> Result<Vec<AssignmentEntry>, StoreError>;

    /// Applies the present fields of `changes` and returns the updated row,
    /// or `None` if no row has that key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn update_assignment(
        &mut self,
        key: AssignmentKey,
        changes: &AssignmentChanges,
    ) -> Result<Option<AssignmentEntry>, StoreError>;

    /// Deletes by key and returns the removed row. Deleting a missing key
    /// succeeds with `None`, so repeating a delete is always safe.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_assignment(&mut self, key: AssignmentKey)
    -> Result<Option<AssignmentEntry>, StoreError>;
}

/// Completed payments.
pub trait SubmissionLedger {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_submission(&mut self, entry: &SubmissionEntry) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn submissions(&mut self, filter: &SubmissionFilter)
    -> Result<Vec<SubmissionEntry>, StoreError>;

    /// Deletes every row matching `filter` and returns them. An empty filter
    /// clears the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_submissions(
        &mut self,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionEntry>, StoreError>;
}

/// The three payment ledgers plus the effects that span them.
pub trait PaymentStore: PaymentCatalog + AssignmentLedger + SubmissionLedger {
    /// Moves an assignment into the submission ledger.
    ///
    /// The submission is inserted and read back before the assignment is
    /// removed, so a failure never loses the obligation. The insert is never
    /// repeated; the delete is repeated up to [`MOVE_DELETE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns the insert failure with the assignment untouched,
    /// `StoreError::UnverifiedSubmission` if the inserted row cannot be read
    /// back, or `StoreError::PartialMove` if every delete attempt failed.
    fn move_to_submitted(&mut self, submission: &SubmissionEntry) -> Result<(), StoreError> {
        let key: AssignmentKey = submission.key();

        self.insert_submission(submission)?;

        let recorded: Vec<SubmissionEntry> = self
            .submissions(&SubmissionFilter {
                member_id: Some(submission.member_id),
                payment_id: Some(submission.payment_id),
                submitted_on: Some(submission.submitted_on),
                ..SubmissionFilter::default()
            })
            .map_err(|e| StoreError::UnverifiedSubmission {
                key,
                reason: e.to_string(),
            })?;
        if recorded.is_empty() {
            return Err(StoreError::UnverifiedSubmission {
                key,
                reason: String::from("no row found after insert"),
            });
        }

        let mut last_error: Option<StoreError> = None;
        for attempt in 1..=MOVE_DELETE_ATTEMPTS {
            match self.delete_assignment(key) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    warn!(%key, attempt, error = %e, "Failed to remove submitted assignment");
                    last_error = Some(e);
                }
            }
        }

        Err(StoreError::PartialMove {
            key,
            reason: last_error.map_or_else(String::new, |e| e.to_string()),
        })
    }

    /// Marks every `due` assignment whose payment was due before `today` as
    /// `overdue` and returns the keys that changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a read or write fails. Rows updated before the
    /// failure stay updated; running the sweep again finishes the job.
    fn mark_overdue(&mut self, today: Date) -> Result<Vec<AssignmentKey>, StoreError> {
        let candidates: Vec<AssignmentEntry> = self.assignments(&AssignmentFilter {
            status: Some(AssignmentStatus::Due),
            ..AssignmentFilter::default()
        })?;

        let mut past_due: HashMap<PaymentId, bool> = HashMap::new();
        let mut marked: Vec<AssignmentKey> = Vec::new();
        let changes: AssignmentChanges = AssignmentChanges {
            assigned_on: None,
            status: Some(AssignmentStatus::Overdue),
        };

        for entry in candidates {
            let late: bool = match past_due.get(&entry.payment_id) {
                Some(cached) => *cached,
                None => {
                    let loaded: bool = self
                        .payment(entry.payment_id)?
                        .is_some_and(|p| p.is_past_due(today));
                    past_due.insert(entry.payment_id, loaded);
                    loaded
                }
            };

            if late && self.update_assignment(entry.key(), &changes)?.is_some() {
                debug!(key = %entry.key(), "Marked assignment overdue");
                marked.push(entry.key());
            }
        }

        Ok(marked)
    }

    /// Removes a payment definition together with its outstanding
    /// assignments. Returns the definition and the number of assignments
    /// cleared, or `None` if the payment does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a read or delete fails.
    fn remove_payment_cascade(
        &mut self,
        payment_id: PaymentId,
    ) -> Result<Option<(PaymentDefinition, usize)>, StoreError> {
        let Some(payment) = self.payment(payment_id)? else {
            return Ok(None);
        };

        let outstanding: Vec<AssignmentEntry> = self.assignments(&AssignmentFilter {
            payment_id: Some(payment_id),
            ..AssignmentFilter::default()
        })?;
        let mut cleared: usize = 0;
        for entry in &outstanding {
            if self.delete_assignment(entry.key())?.is_some() {
                cleared += 1;
            }
        }

        self.delete_payment(payment_id)?;
        Ok(Some((payment, cleared)))
    }
}

/// Everything the lifecycle operations need from storage.
pub trait LedgerBackend: PaymentStore + MemberDirectory + IdAllocator {}

impl<T: PaymentStore + MemberDirectory + IdAllocator + ?Sized> LedgerBackend for T {}
