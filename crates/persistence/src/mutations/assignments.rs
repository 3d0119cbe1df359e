// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::Date;
use tracing::{debug, info};

use nafuda_domain::{
    AssignmentChanges, AssignmentEntry, AssignmentKey, AssignmentStatus, MemberId, PaymentId,
    format_date,
};

use crate::data_models::AssignmentRow;
use crate::diesel_schema::{assigned_payments, payments};
use crate::error::PersistenceError;
use crate::queries::assignments::get_assignment;

/// Present fields of an assignment update.
#[derive(AsChangeset)]
#[diesel(table_name = assigned_payments)]
struct AssignmentChangeset {
    status: Option<String>,
    assigned_on: Option<String>,
}

impl From<&AssignmentChanges> for AssignmentChangeset {
    fn from(changes: &AssignmentChanges) -> Self {
        Self {
            status: changes.status.map(|s| s.as_str().to_string()),
            assigned_on: changes.assigned_on.map(|a| a.to_string()),
        }
    }
}

/// Inserts an assignment.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the pair is already
/// assigned, or `PersistenceError::ForeignKeyViolation` if the member or
/// payment does not exist.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    entry: &AssignmentEntry,
) -> Result<(), PersistenceError> {
    diesel::insert_into(assigned_payments::table)
        .values(&AssignmentRow::from_domain(entry))
        .execute(conn)?;

    debug!(key = %entry.key(), "Inserted assignment");
    Ok(())
}

/// Applies the present fields of `changes` and returns the updated row, or
/// `None` if nothing is assigned under `key`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_assignment(
    conn: &mut SqliteConnection,
    key: AssignmentKey,
    changes: &AssignmentChanges,
) -> Result<Option<AssignmentEntry>, PersistenceError> {
    if changes.is_empty() {
        return get_assignment(conn, key);
    }

    let row: Option<AssignmentRow> = diesel::update(
        assigned_payments::table.find((key.member_id.value(), key.payment_id.value())),
    )
    .set(&AssignmentChangeset::from(changes))
    .returning(AssignmentRow::as_returning())
    .get_result(conn)
    .optional()
    .map_err(|e| PersistenceError::QueryFailed(format!("update_assignment: {e}")))?;

    row.map(AssignmentRow::into_domain).transpose()
}

/// Deletes the assignment under `key` and returns it, or `None` if nothing
/// was assigned.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_assignment(
    conn: &mut SqliteConnection,
    key: AssignmentKey,
) -> Result<Option<AssignmentEntry>, PersistenceError> {
    let row: Option<AssignmentRow> = diesel::delete(
        assigned_payments::table.find((key.member_id.value(), key.payment_id.value())),
    )
    .returning(AssignmentRow::as_returning())
    .get_result(conn)
    .optional()
    .map_err(|e| PersistenceError::QueryFailed(format!("delete_assignment: {e}")))?;

    row.map(AssignmentRow::into_domain).transpose()
}

/// Flips every `due` assignment whose payment's due date is strictly
/// before `today` to `overdue` in a single statement.
///
/// Returns the keys that changed, ordered by payment then member.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_overdue(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<Vec<AssignmentKey>, PersistenceError> {
    // Dates are stored as `YYYY-MM-DD`, which orders the same as the date.
    let past_due = payments::table
        .filter(payments::due_date.lt(format_date(today)))
        .select(payments::payment_id);

    let mut changed: Vec<(i64, i64)> = diesel::update(
        assigned_payments::table
            .filter(assigned_payments::status.eq(AssignmentStatus::Due.as_str()))
            .filter(assigned_payments::payment_id.eq_any(past_due)),
    )
    .set(assigned_payments::status.eq(AssignmentStatus::Overdue.as_str()))
    .returning((assigned_payments::member_id, assigned_payments::payment_id))
    .get_results(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("mark_overdue: {e}")))?;

    changed.sort_unstable_by_key(|(member_id, payment_id)| (*payment_id, *member_id));

    info!(as_of = %today, marked = changed.len(), "Marked past-due assignments overdue");
    Ok(changed
        .into_iter()
        .map(|(member_id, payment_id)| {
            AssignmentKey::new(MemberId::new(member_id), PaymentId::new(payment_id))
        })
        .collect())
}
