// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;
use tracing::debug;

use nafuda_domain::{Member, MemberFilter, MemberId, MemberStatus};

use crate::data_models::{MemberRow, rows_into_domain};
use crate::diesel_schema::members;
use crate::error::PersistenceError;

/// Retrieves a member by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
/// Returns `Ok(None)` if the member is not on the roster.
pub fn get_member(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> Result<Option<Member>, PersistenceError> {
    let row: Option<MemberRow> = members::table
        .find(member_id.value())
        .select(MemberRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_member: {e}")))?;

    row.map(MemberRow::into_domain).transpose()
}

/// Checks whether a member id is on the roster.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn member_exists(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> Result<bool, PersistenceError> {
    let count: i64 = members::table
        .filter(members::member_id.eq(member_id.value()))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("member_exists: {e}")))?;
    Ok(count > 0)
}

/// Retrieves every member registered under `email`, ignoring case.
///
/// Emails are stored lowercased at registration.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn get_members_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Vec<Member>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();
    debug!("Looking up members by email: {}", normalized);

    let rows: Vec<MemberRow> = members::table
        .filter(members::email.eq(&normalized))
        .select(MemberRow::as_select())
        .order(members::member_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_members_by_email: {e}")))?;

    rows_into_domain(rows, MemberRow::into_domain)
}

/// Retrieves the member holding a duplicate-detection fingerprint.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_member_by_fingerprint(
    conn: &mut SqliteConnection,
    fingerprint: &str,
) -> Result<Option<MemberId>, PersistenceError> {
    members::table
        .filter(members::fingerprint.eq(fingerprint))
        .select(members::member_id)
        .first::<i64>(conn)
        .optional()
        .map(|id| id.map(MemberId::new))
        .map_err(|e| PersistenceError::QueryFailed(format!("find_member_by_fingerprint: {e}")))
}

/// Lists members selected by `filter`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_members(
    conn: &mut SqliteConnection,
    filter: &MemberFilter,
) -> Result<Vec<Member>, PersistenceError> {
    let rows: Vec<MemberRow> = filtered_members(filter)
        .select(MemberRow::as_select())
        .order(members::member_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_members: {e}")))?;

    rows_into_domain(rows, MemberRow::into_domain)
}

/// Ids of the members selected by `filter`, ascending.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_member_ids(
    conn: &mut SqliteConnection,
    filter: &MemberFilter,
) -> Result<Vec<MemberId>, PersistenceError> {
    let ids: Vec<i64> = filtered_members(filter)
        .select(members::member_id)
        .order(members::member_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_member_ids: {e}")))?;

    Ok(ids.into_iter().map(MemberId::new).collect())
}

fn filtered_members(filter: &MemberFilter) -> members::BoxedQuery<'static, Sqlite> {
    let mut query = members::table.into_boxed();

    if filter.active_only {
        query = query.filter(members::status.eq(MemberStatus::Active.as_str()));
    }
    if filter.exclude_guests {
        query = query.filter(members::status.ne(MemberStatus::Guest.as_str()));
    }
    if filter.exempt_only {
        query = query.filter(members::status.eq(MemberStatus::Exempt.as_str()));
    }

    query
}
