// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Nafuda payment ledger.
//!
//! This crate stores the member roster, the id counters, the payment catalog
//! and the assignment and submission ledgers in `SQLite` through Diesel.
//! [`Persistence`] implements every storage collaborator the lifecycle
//! operations in `nafuda` need.
//!
//! ## Storage Format
//!
//! - Timestamps are `TEXT` in `YYYY-MM-DD HH:MM:SS` (UTC)
//! - Dates are `TEXT` in `YYYY-MM-DD`
//! - Amounts are `TEXT` with two decimal places
//!
//! ## Testing Philosophy
//!
//! - Every test gets its own shared in-memory database
//! - Migrations run on every connection, so tests see the production schema
//! - Foreign key enforcement is verified at startup and never assumed

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use nafuda_domain::{IdCounter, Member, MemberDraft, MemberFilter, validate_member_draft};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod ledger_store;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::MemberRegistration;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the payment ledger.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_ledger_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        let journal_mode: String = backend::sqlite::enable_wal_mode(&mut conn)?;
        info!(journal_mode = %journal_mode, "Opened ledger database");

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is still enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or the check fails.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Registers a member, detecting duplicate registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is invalid or the write fails.
    pub fn register_member(
        &mut self,
        draft: &MemberDraft,
    ) -> Result<MemberRegistration, PersistenceError> {
        validate_member_draft(draft)
            .map_err(|e| PersistenceError::InvalidInput(e.to_string()))?;
        mutations::members::register_member(&mut self.conn, draft)
    }

    /// Lists roster members selected by `filter`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_members(&mut self, filter: &MemberFilter) -> Result<Vec<Member>, PersistenceError> {
        queries::members::list_members(&mut self.conn, filter)
    }

    /// Returns the last value handed out by `counter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn current_counter_value(
        &mut self,
        counter: IdCounter,
    ) -> Result<Option<i64>, PersistenceError> {
        queries::counters::current_counter_value(&mut self.conn, counter)
    }
}
