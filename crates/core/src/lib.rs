// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Pure campaign business rules.
//!
//! Every function in this crate is a decision over in-memory domain values:
//! no I/O, no clock reads, no side effects. The persistence layer loads the
//! relevant rows, calls these rules inside its transaction, and applies the
//! returned plan. Time-sensitive rules take the reference instant as an
//! explicit argument.

mod eligibility;
mod error;
mod lifecycle;
mod reconcile;
mod renewal;
mod uninstall;

#[cfg(test)]
mod tests;

pub use eligibility::{AttachContext, check_attach, check_detach};
pub use error::CoreError;
pub use lifecycle::{
    campaign_expired, check_campaign_dates, check_delete, check_transition, ensure_no_overlap,
};
pub use reconcile::{
    ReconcilePlan, SettlementUpdate, check_transaction_amount, plan_reconciliation, settle,
};
pub use renewal::{
    CandidateSplit, SkippedCandidate, SuccessorPlan, check_renewal_source, filter_candidates,
    plan_successor, scheduled_assignment_end,
};
pub use uninstall::{check_uninstallation, uninstallation_open};
