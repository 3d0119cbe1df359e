// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use nafuda_domain::{PaymentDefinition, PaymentId};

use crate::data_models::PaymentRow;
use crate::diesel_schema::{assigned_payments, payments};
use crate::error::PersistenceError;
use crate::queries::payments::get_payment;

/// Inserts a payment definition under its own id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the id is taken.
pub fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &PaymentDefinition,
) -> Result<(), PersistenceError> {
    diesel::insert_into(payments::table)
        .values(&PaymentRow::from_domain(payment))
        .execute(conn)?;

    debug!(payment_id = %payment.payment_id, "Inserted payment");
    Ok(())
}

/// Overwrites every attribute of a stored definition.
/// Returns `false` if no definition has that id.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn replace_payment(
    conn: &mut SqliteConnection,
    payment: &PaymentDefinition,
) -> Result<bool, PersistenceError> {
    let row: PaymentRow = PaymentRow::from_domain(payment);

    let updated: usize = diesel::update(payments::table.find(row.payment_id))
        .set((
            payments::title.eq(&row.title),
            payments::created_at.eq(&row.created_at),
            payments::due_date.eq(&row.due_date),
            payments::payment_value.eq(&row.payment_value),
            payments::overdue_penalty.eq(&row.overdue_penalty),
            payments::event_id.eq(row.event_id),
        ))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("replace_payment: {e}")))?;

    Ok(updated > 0)
}

/// Deletes a payment definition. Returns `false` if no definition has that id.
///
/// Outstanding assignments of the payment go with it through the foreign
/// key cascade.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_payment(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(payments::table.find(payment_id.value()))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("delete_payment: {e}")))?;
    Ok(deleted > 0)
}

/// Removes a payment definition together with its outstanding assignments
/// in one transaction. Submissions are untouched.
///
/// Returns the removed definition and the number of assignments cleared,
/// or `None` if the payment does not exist.
///
/// # Errors
///
/// Returns an error if any statement fails; nothing is removed in that case.
pub fn remove_payment_cascade(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
) -> Result<Option<(PaymentDefinition, usize)>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let Some(payment) = get_payment(conn, payment_id)? else {
            return Ok(None);
        };

        let cleared: usize = diesel::delete(
            assigned_payments::table
                .filter(assigned_payments::payment_id.eq(payment_id.value())),
        )
        .execute(conn)?;

        diesel::delete(payments::table.find(payment_id.value())).execute(conn)?;

        info!(%payment_id, cleared, "Removed payment and its assignments");
        Ok(Some((payment, cleared)))
    })
}
