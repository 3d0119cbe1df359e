// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use nafuda_domain::IdCounter;

use crate::diesel_schema::id_counters;
use crate::error::PersistenceError;

/// Returns the last value handed out by `counter`, or `None` if the counter
/// has never been advanced.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn current_counter_value(
    conn: &mut SqliteConnection,
    counter: IdCounter,
) -> Result<Option<i64>, PersistenceError> {
    id_counters::table
        .find(counter.as_str())
        .select(id_counters::current_value)
        .first::<i64>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("current_counter_value: {e}")))
}
