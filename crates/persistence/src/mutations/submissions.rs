// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use nafuda_domain::{SubmissionEntry, SubmissionFilter};

use crate::data_models::{SubmissionRow, rows_into_domain};
use crate::diesel_schema::{assigned_payments, submitted_payments};
use crate::error::PersistenceError;
use crate::queries::submissions::filtered_submissions;

/// Records a submission.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the same pair was already
/// submitted at the same instant.
pub fn insert_submission(
    conn: &mut SqliteConnection,
    entry: &SubmissionEntry,
) -> Result<(), PersistenceError> {
    diesel::insert_into(submitted_payments::table)
        .values(&SubmissionRow::from_domain(entry))
        .execute(conn)?;

    debug!(key = %entry.key(), total_paid = %entry.total_paid, "Inserted submission");
    Ok(())
}

/// Deletes every submission matching `filter` and returns the removed rows.
///
/// # Errors
///
/// Returns an error if the read or any delete fails; nothing is removed in
/// that case.
pub fn delete_submissions(
    conn: &mut SqliteConnection,
    filter: &SubmissionFilter,
) -> Result<Vec<SubmissionEntry>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: Vec<SubmissionRow> = filtered_submissions(filter)
            .select(SubmissionRow::as_select())
            .load(conn)?;

        for row in &rows {
            diesel::delete(submitted_payments::table.find((
                row.member_id,
                row.payment_id,
                row.submitted_on.clone(),
            )))
            .execute(conn)?;
        }

        info!(removed = rows.len(), "Deleted submissions");
        rows_into_domain(rows, SubmissionRow::into_domain)
    })
}

/// Records a submission and removes its assignment in one transaction.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the assignment vanished before
/// the move, or the failing statement's error. Either way both ledgers are
/// left as they were.
pub fn move_to_submitted(
    conn: &mut SqliteConnection,
    entry: &SubmissionEntry,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(submitted_payments::table)
            .values(&SubmissionRow::from_domain(entry))
            .execute(conn)?;

        let removed: usize = diesel::delete(
            assigned_payments::table
                .find((entry.member_id.value(), entry.payment_id.value())),
        )
        .execute(conn)?;

        if removed == 0 {
            return Err(PersistenceError::NotFound(format!(
                "No outstanding assignment for {}",
                entry.key()
            )));
        }

        debug!(key = %entry.key(), "Moved assignment to submissions");
        Ok(())
    })
}
