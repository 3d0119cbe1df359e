// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission ledger queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;

use nafuda_domain::{SubmissionEntry, SubmissionFilter};

use crate::data_models::{SubmissionRow, rows_into_domain};
use crate::diesel_schema::submitted_payments;
use crate::error::PersistenceError;

/// Lists submissions matching every set field of `filter`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_submissions(
    conn: &mut SqliteConnection,
    filter: &SubmissionFilter,
) -> Result<Vec<SubmissionEntry>, PersistenceError> {
    let rows: Vec<SubmissionRow> = filtered_submissions(filter)
        .select(SubmissionRow::as_select())
        .order((
            submitted_payments::submitted_on.asc(),
            submitted_payments::member_id.asc(),
            submitted_payments::payment_id.asc(),
        ))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_submissions: {e}")))?;

    rows_into_domain(rows, SubmissionRow::into_domain)
}

/// Boxed submission query with one predicate per set filter field.
pub fn filtered_submissions(
    filter: &SubmissionFilter,
) -> submitted_payments::BoxedQuery<'static, Sqlite> {
    let mut query = submitted_payments::table.into_boxed();

    if let Some(member_id) = filter.member_id {
        query = query.filter(submitted_payments::member_id.eq(member_id.value()));
    }
    if let Some(payment_id) = filter.payment_id {
        query = query.filter(submitted_payments::payment_id.eq(payment_id.value()));
    }
    if let Some(assigned_on) = filter.assigned_on {
        query = query.filter(submitted_payments::assigned_on.eq(assigned_on.to_string()));
    }
    if let Some(submitted_on) = filter.submitted_on {
        query = query.filter(submitted_payments::submitted_on.eq(submitted_on.to_string()));
    }
    if let Some(overdue) = filter.overdue {
        query = query.filter(submitted_payments::overdue.eq(i32::from(overdue)));
    }
    if let Some(total_paid) = filter.total_paid {
        query = query.filter(submitted_payments::total_paid.eq(total_paid.to_string()));
    }

    query
}
