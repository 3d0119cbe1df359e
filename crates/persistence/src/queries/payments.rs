// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment catalog queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;

use nafuda_domain::{EventId, PaymentDefinition, PaymentFilter, PaymentId, format_date};

use crate::data_models::{PaymentRow, rows_into_domain};
use crate::diesel_schema::payments;
use crate::error::PersistenceError;

/// Retrieves a payment definition by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
/// Returns `Ok(None)` if the payment is not in the catalog.
pub fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
) -> Result<Option<PaymentDefinition>, PersistenceError> {
    let row: Option<PaymentRow> = payments::table
        .find(payment_id.value())
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_payment: {e}")))?;

    row.map(PaymentRow::into_domain).transpose()
}

/// Lists payment definitions matching every set field of `filter`,
/// ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_payments(
    conn: &mut SqliteConnection,
    filter: &PaymentFilter,
) -> Result<Vec<PaymentDefinition>, PersistenceError> {
    let mut query: payments::BoxedQuery<'_, Sqlite> = payments::table.into_boxed();

    if let Some(id) = filter.payment_id {
        query = query.filter(payments::payment_id.eq(id.value()));
    }
    if let Some(title) = &filter.title {
        query = query.filter(payments::title.eq(title.clone()));
    }
    if let Some(created_at) = filter.created_at {
        query = query.filter(payments::created_at.eq(created_at.to_string()));
    }
    if let Some(due_date) = filter.due_date {
        query = query.filter(payments::due_date.eq(format_date(due_date)));
    }
    if let Some(value) = filter.payment_value {
        query = query.filter(payments::payment_value.eq(value.to_string()));
    }
    if let Some(penalty) = filter.overdue_penalty {
        query = query.filter(payments::overdue_penalty.eq(penalty.to_string()));
    }
    if let Some(event_id) = filter.event_id.map(EventId::value) {
        query = query.filter(payments::event_id.eq(event_id));
    }

    let rows: Vec<PaymentRow> = query
        .select(PaymentRow::as_select())
        .order(payments::payment_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_payments: {e}")))?;

    rows_into_domain(rows, PaymentRow::into_domain)
}
