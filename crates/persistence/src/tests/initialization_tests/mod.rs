// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also exercises connection setup, migrations
//! and foreign key enforcement through `Persistence::new_in_memory()`.

use nafuda::MemberDirectory;
use nafuda_domain::{MemberFilter, MemberStatus};

use crate::Persistence;
use crate::tests::register;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> =
        Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    register(&mut db1, "Aiko", MemberStatus::Active);

    assert_eq!(db1.member_ids(&MemberFilter::ALL).unwrap().len(), 1);
    assert!(db2.member_ids(&MemberFilter::ALL).unwrap().is_empty());
}

#[test]
fn test_file_database_survives_reopen() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "nafuda_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        register(&mut persistence, "Kenji", MemberStatus::Active);
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let members = reopened.list_members(&MemberFilter::ALL).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].first_name, "Kenji");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
