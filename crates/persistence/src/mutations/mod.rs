// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations over the roster, the catalog and the ledgers.
//!
//! ## Module Organization
//!
//! - `counters`: Atomic id allocation
//! - `members`: Roster registration with duplicate detection
//! - `payments`: Catalog writes and the cascading payment removal
//! - `assignments`: Assignment writes and the overdue sweep
//! - `submissions`: Submission writes and the assignment-to-submission move
//!
//! Effects that touch more than one table run inside a single transaction.

pub mod assignments;
pub mod counters;
pub mod members;
pub mod payments;
pub mod submissions;
