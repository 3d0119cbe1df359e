// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outstanding assignment queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;

use nafuda_domain::{AssignmentEntry, AssignmentFilter, AssignmentKey};

use crate::data_models::{AssignmentRow, rows_into_domain};
use crate::diesel_schema::assigned_payments;
use crate::error::PersistenceError;

/// Retrieves the assignment for a (member, payment) pair.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    key: AssignmentKey,
) -> Result<Option<AssignmentEntry>, PersistenceError> {
    let row: Option<AssignmentRow> = assigned_payments::table
        .find((key.member_id.value(), key.payment_id.value()))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_assignment: {e}")))?;

    row.map(AssignmentRow::into_domain).transpose()
}

/// Lists assignments matching every set field of `filter`, ordered by
/// payment then member.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_assignments(
    conn: &mut SqliteConnection,
    filter: &AssignmentFilter,
) -> Result<Vec<AssignmentEntry>, PersistenceError> {
    let mut query: assigned_payments::BoxedQuery<'_, Sqlite> =
        assigned_payments::table.into_boxed();

    if let Some(member_id) = filter.member_id {
        query = query.filter(assigned_payments::member_id.eq(member_id.value()));
    }
    if let Some(payment_id) = filter.payment_id {
        query = query.filter(assigned_payments::payment_id.eq(payment_id.value()));
    }
    if let Some(status) = filter.status {
        query = query.filter(assigned_payments::status.eq(status.as_str()));
    }
    if let Some(assigned_on) = filter.assigned_on {
        query = query.filter(assigned_payments::assigned_on.eq(assigned_on.to_string()));
    }

    let rows: Vec<AssignmentRow> = query
        .select(AssignmentRow::as_select())
        .order((
            assigned_payments::payment_id.asc(),
            assigned_payments::member_id.asc(),
        ))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_assignments: {e}")))?;

    rows_into_domain(rows, AssignmentRow::into_domain)
}
