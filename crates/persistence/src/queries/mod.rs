// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries over the roster, the catalog and the payment ledgers.
//!
//! ## Module Organization
//!
//! - `members`: Roster lookups and recipient selection
//! - `payments`: Payment catalog lookups
//! - `assignments`: Outstanding assignment lookups
//! - `submissions`: Submission ledger lookups
//! - `counters`: Id counter inspection
//!
//! Every attribute filter is built as a boxed Diesel query so that unset
//! filter fields add no predicate at all.

pub mod assignments;
pub mod counters;
pub mod members;
pub mod payments;
pub mod submissions;
