// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment lifecycle core.
//!
//! The operations here move payment obligations between the payment
//! catalog, the assignment ledger and the submission ledger. They talk to
//! storage only through the traits in [`ports`], so the same rules run
//! against SQLite in production and against in-memory stores in tests.

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

mod clock;
mod error;
mod lifecycle;
pub mod ports;
mod recipients;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CoreError;
pub use lifecycle::{
    AssignRequest, BroadcastOutcome, BroadcastRequest, RemovedPayment, SubmitRequest,
    assign_payment, broadcast_payment, create_payment, remove_payment, remove_submissions,
    submit_payment, sweep_overdue, unassign_payment, update_assignment, update_payment,
};
pub use ports::{
    AssignmentLedger, IdAllocator, LedgerBackend, MemberDirectory, PaymentCatalog, PaymentStore,
    StoreError, SubmissionLedger,
};
pub use recipients::{RecipientPolicy, ScopedRecipients};
