// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment mutations: reconciliation of BASE payments and recording of
//! settlement transactions.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::info;

use crate::diesel_schema::{payment_transactions, payments};
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use camptrack::{ReconcilePlan, SettlementUpdate, check_transaction_amount, plan_reconciliation, settle};
use camptrack_domain::{
    Campaign, ClientType, MaterialCondition, Payment, PaymentStatus, PaymentType,
    format_timestamp,
};

/// Recomputes a pair's BASE payment from its material conditions,
/// creating the payment lazily if none exists.
///
/// The stored base amount never changes once the payment exists; only
/// sanction and final move. The settlement status is re-derived from the
/// recorded transaction total so a changed final amount cannot leave the
/// status stale.
///
/// # Errors
///
/// Returns `CampaignNotFound`/`ProviderNotFound`, or a database error.
pub fn reconcile_payment(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<Payment, PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    queries::providers::get_provider(conn, provider_id)?;
    let client_type: ClientType = queries::campaigns::client_type_for_campaign(conn, &campaign)?;
    let conditions: Vec<MaterialCondition> =
        queries::conditions::list_for_pair(conn, campaign_id, provider_id)?;
    let existing: Option<Payment> =
        queries::payments::find_payment(conn, campaign_id, provider_id, PaymentType::Base)?;

    let plan: ReconcilePlan = plan_reconciliation(client_type, &conditions, existing.as_ref());
    info!(
        campaign_id,
        provider_id,
        base = plan.base,
        sanction = plan.sanction,
        final_amount = plan.final_amount,
        "Reconciling BASE payment"
    );

    let payment_id: i64 = match plan.payment_id {
        Some(id) => {
            diesel::update(payments::table)
                .filter(payments::payment_id.eq(id))
                .set((
                    payments::sanction_amount.eq(plan.sanction),
                    payments::final_amount.eq(plan.final_amount),
                ))
                .execute(conn)?;
            id
        }
        None => {
            diesel::insert_into(payments::table)
                .values((
                    payments::campaign_id.eq(campaign_id),
                    payments::provider_id.eq(provider_id),
                    payments::payment_type.eq(PaymentType::Base.as_str()),
                    payments::base_amount.eq(plan.base),
                    payments::sanction_amount.eq(plan.sanction),
                    payments::final_amount.eq(plan.final_amount),
                    payments::status.eq(PaymentStatus::Pending.as_str()),
                    payments::is_paid.eq(0),
                    payments::created_at.eq(format_timestamp(now)?),
                ))
                .execute(conn)?;
            get_last_insert_rowid(conn)?
        }
    };

    refresh_settlement(conn, payment_id, now)
}

/// Records a settlement transaction and re-derives the payment status.
///
/// # Errors
///
/// Returns `PaymentNotFound`, `NonPositiveAmount`, or a database error.
pub fn record_transaction(
    conn: &mut SqliteConnection,
    payment_id: i64,
    amount: i64,
    method: &str,
    reference: Option<&str>,
    note: Option<&str>,
    recorded_by: &str,
    now: OffsetDateTime,
) -> Result<Payment, PersistenceError> {
    queries::payments::get_payment(conn, payment_id)?;
    check_transaction_amount(amount)?;

    diesel::insert_into(payment_transactions::table)
        .values((
            payment_transactions::payment_id.eq(payment_id),
            payment_transactions::amount.eq(amount),
            payment_transactions::method.eq(method),
            payment_transactions::reference.eq(reference),
            payment_transactions::note.eq(note),
            payment_transactions::recorded_by.eq(recorded_by),
            payment_transactions::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    info!(payment_id, amount, method, "Transaction recorded");
    refresh_settlement(conn, payment_id, now)
}

/// Creates the fixed DEINSTALLATION fee payment for a pair.
///
/// # Errors
///
/// Returns a database error, including the unique-index violation when
/// the fee already exists.
pub fn create_deinstallation_fee(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    amount: i64,
    now: OffsetDateTime,
) -> Result<Payment, PersistenceError> {
    diesel::insert_into(payments::table)
        .values((
            payments::campaign_id.eq(campaign_id),
            payments::provider_id.eq(provider_id),
            payments::payment_type.eq(PaymentType::Deinstallation.as_str()),
            payments::base_amount.eq(amount),
            payments::sanction_amount.eq(0),
            payments::final_amount.eq(amount),
            payments::status.eq(PaymentStatus::Pending.as_str()),
            payments::is_paid.eq(0),
            payments::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;
    let payment_id: i64 = get_last_insert_rowid(conn)?;
    info!(campaign_id, provider_id, payment_id, "De-installation fee issued");
    queries::payments::get_payment(conn, payment_id)
}

/// Re-derives one payment's settlement status from its transaction total
/// and persists it, stamping `paid_at` the first time PAYE is reached.
fn refresh_settlement(
    conn: &mut SqliteConnection,
    payment_id: i64,
    now: OffsetDateTime,
) -> Result<Payment, PersistenceError> {
    let payment: Payment = queries::payments::get_payment(conn, payment_id)?;
    let total_paid: i64 = queries::payments::transaction_total(conn, payment_id)?;
    let update: SettlementUpdate = settle(&payment, total_paid);

    if update.newly_paid {
        diesel::update(payments::table)
            .filter(payments::payment_id.eq(payment_id))
            .set((
                payments::status.eq(update.status.as_str()),
                payments::is_paid.eq(i32::from(update.is_paid)),
                payments::paid_at.eq(Some(format_timestamp(now)?)),
            ))
            .execute(conn)?;
    } else {
        diesel::update(payments::table)
            .filter(payments::payment_id.eq(payment_id))
            .set((
                payments::status.eq(update.status.as_str()),
                payments::is_paid.eq(i32::from(update.is_paid)),
            ))
            .execute(conn)?;
    }

    queries::payments::get_payment(conn, payment_id)
}
