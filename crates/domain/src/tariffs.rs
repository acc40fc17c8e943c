// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tariff constants and pure settlement math.
//!
//! Two distinct scales exist and must not be conflated: the per-assignment
//! base payment (5000/3000) and the per-material-condition penalty
//! (2000/1000). Both depend only on the commissioning client's type.

use crate::types::{ClientType, MaterialCondition};

/// Default material-condition penalty for external clients.
const PENALTY_EXTERNAL: i64 = 2000;
/// Default material-condition penalty for internal campaigns.
const PENALTY_INTERNAL: i64 = 1000;
/// Base assignment payment for external clients.
const BASE_EXTERNAL: i64 = 5000;
/// Base assignment payment for internal campaigns.
const BASE_INTERNAL: i64 = 3000;

/// Fixed fee issued when a provider confirms de-installation.
pub const DEINSTALLATION_FEE: i64 = 2000;

/// Returns the default penalty for a BAD material condition.
#[must_use]
pub const fn default_penalty(client_type: ClientType) -> i64 {
    match client_type {
        ClientType::External => PENALTY_EXTERNAL,
        ClientType::Internal => PENALTY_INTERNAL,
    }
}

/// Returns the base payment amount for one assignment.
#[must_use]
pub const fn base_payment(client_type: ClientType) -> i64 {
    match client_type {
        ClientType::External => BASE_EXTERNAL,
        ClientType::Internal => BASE_INTERNAL,
    }
}

/// Derives the final payable amount from a base and a sanction total.
///
/// Sanctions can never push a payment below zero.
#[must_use]
pub const fn final_amount(base: i64, sanction: i64) -> i64 {
    let remainder = base - sanction;
    if remainder > 0 { remainder } else { 0 }
}

/// Sums the applied penalties over a pair's material conditions.
///
/// Only records with `penalty_applied = true` count toward the total.
#[must_use]
pub fn applied_sanction_total(conditions: &[MaterialCondition]) -> i64 {
    conditions
        .iter()
        .filter(|c| c.penalty_applied)
        .map(|c| c.penalty_amount)
        .sum()
}
