// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use nafuda_domain::{IdCounter, MemberDraft, MemberId};

use crate::data_models::{MemberRegistration, MemberRow};
use crate::diesel_schema::members;
use crate::error::PersistenceError;
use crate::mutations::counters::next_counter_value;
use crate::queries::members::find_member_by_fingerprint;

/// Registers a member on the roster.
///
/// A registration whose fingerprint matches an existing member is not
/// inserted again; the existing id is returned with `duplicate` set.
/// No id is consumed for a duplicate.
///
/// # Errors
///
/// Returns an error if the lookup, the id allocation or the insert fails.
pub fn register_member(
    conn: &mut SqliteConnection,
    draft: &MemberDraft,
) -> Result<MemberRegistration, PersistenceError> {
    let fingerprint: String = draft.fingerprint();

    conn.transaction::<_, PersistenceError, _>(|conn| {
        if let Some(existing) = find_member_by_fingerprint(conn, &fingerprint)? {
            info!(member_id = %existing, "Registration matches an existing member");
            return Ok(MemberRegistration {
                member_id: existing,
                duplicate: true,
            });
        }

        let member_id: MemberId = MemberId::new(next_counter_value(conn, IdCounter::Member)?);
        diesel::insert_into(members::table)
            .values(&MemberRow::from_draft(member_id, draft))
            .execute(conn)?;

        info!(%member_id, status = %draft.status, "Registered member");
        Ok(MemberRegistration {
            member_id,
            duplicate: false,
        })
    })
}
