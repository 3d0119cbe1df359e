// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use nafuda_domain::IdCounter;

use crate::diesel_schema::id_counters;
use crate::error::PersistenceError;

/// Advances `counter` and returns its new value.
///
/// A counter that has never been used starts at 1. The increment is a
/// single upsert statement, so two callers can never observe the same value.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn next_counter_value(
    conn: &mut SqliteConnection,
    counter: IdCounter,
) -> Result<i64, PersistenceError> {
    let value: i64 = diesel::insert_into(id_counters::table)
        .values((
            id_counters::counter_name.eq(counter.as_str()),
            id_counters::current_value.eq(1_i64),
        ))
        .on_conflict(id_counters::counter_name)
        .do_update()
        .set(id_counters::current_value.eq(id_counters::current_value + 1_i64))
        .returning(id_counters::current_value)
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("next_counter_value: {e}")))?;

    debug!(%counter, value, "Allocated id");
    Ok(value)
}
