// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment reconciliation and settlement math.
//!
//! Reconciliation re-derives a pair's BASE payment from its material
//! conditions; settlement re-derives a payment's status from its
//! transaction total. Both produce a plan the persistence layer applies.

use crate::error::CoreError;
use camptrack_domain::{
    ClientType, DomainError, MaterialCondition, Payment, PaymentStatus, applied_sanction_total,
    base_payment, final_amount,
};

/// The reconciled figures for a pair's BASE payment.
///
/// When `payment_id` is `None` no BASE payment exists yet and one must be
/// created with these amounts; otherwise the existing payment's sanction
/// and final amounts are updated. The base never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Existing BASE payment to update, if any.
    pub payment_id: Option<i64>,
    pub base: i64,
    pub sanction: i64,
    pub final_amount: i64,
}

/// Recomputes a pair's BASE payment figures.
///
/// The sanction total counts every material condition with
/// `penalty_applied = true`; the final amount is clamped at zero.
#[must_use]
pub fn plan_reconciliation(
    client_type: ClientType,
    conditions: &[MaterialCondition],
    existing: Option<&Payment>,
) -> ReconcilePlan {
    let base: i64 = existing.map_or_else(|| base_payment(client_type), |p| p.base_amount);
    let sanction: i64 = applied_sanction_total(conditions);
    ReconcilePlan {
        payment_id: existing.map(|p| p.payment_id),
        base,
        sanction,
        final_amount: final_amount(base, sanction),
    }
}

/// The status update produced by recording a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementUpdate {
    pub status: PaymentStatus,
    /// Legacy boolean mirror of `status`.
    pub is_paid: bool,
    /// `true` exactly when this settlement first reaches PAYE, so the
    /// caller stamps `paid_at` once and never overwrites it.
    pub newly_paid: bool,
}

/// Rejects non-positive transaction amounts.
///
/// # Errors
///
/// Returns `NonPositiveAmount` for zero or negative amounts.
pub fn check_transaction_amount(amount: i64) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(DomainError::NonPositiveAmount { amount }.into());
    }
    Ok(())
}

/// Derives a payment's settlement state from its new transaction total.
#[must_use]
pub fn settle(payment: &Payment, total_paid: i64) -> SettlementUpdate {
    let status: PaymentStatus = PaymentStatus::from_totals(total_paid, payment.final_amount);
    SettlementUpdate {
        status,
        is_paid: status.is_paid(),
        newly_paid: status.is_paid() && payment.paid_at.is_none(),
    }
}
