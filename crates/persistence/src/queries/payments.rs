// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment and transaction queries.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;

use crate::data_models::{PaymentRow, PaymentTransactionRow};
use crate::diesel_schema::{payment_transactions, payments};
use crate::error::PersistenceError;
use camptrack_domain::{Payment, PaymentTransaction, PaymentType};

/// Finds the pair's payment of one type, if it exists.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_payment(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    payment_type: PaymentType,
) -> Result<Option<Payment>, PersistenceError> {
    let row: Option<PaymentRow> = payments::table
        .filter(payments::campaign_id.eq(campaign_id))
        .filter(payments::provider_id.eq(provider_id))
        .filter(payments::payment_type.eq(payment_type.as_str()))
        .first(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Loads one payment by ID.
///
/// # Errors
///
/// Returns `PaymentNotFound` if no row exists.
pub fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Payment, PersistenceError> {
    let row: PaymentRow = payments::table
        .filter(payments::payment_id.eq(payment_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::PaymentNotFound(payment_id))?;
    row.try_into()
}

/// Lists every payment for a (campaign, provider) pair.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_for_pair(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Vec<Payment>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::campaign_id.eq(campaign_id))
        .filter(payments::provider_id.eq(provider_id))
        .order(payments::payment_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists every payment for a campaign.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_for_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Vec<Payment>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::campaign_id.eq(campaign_id))
        .order(payments::payment_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Sums the transactions recorded against a payment.
///
/// `SUM` has no DSL-friendly integer form here, so the aggregate goes
/// through raw SQL the way `last_insert_rowid()` does. `COALESCE` folds
/// the no-transactions case to zero.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn transaction_total(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<i64, PersistenceError> {
    let total: i64 = payment_transactions::table
        .filter(payment_transactions::payment_id.eq(payment_id))
        .select(sql::<BigInt>("COALESCE(SUM(amount), 0)"))
        .first(conn)?;
    Ok(total)
}

/// Counts the transactions recorded against any of the pair's payments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn transaction_count_for_pair(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(payment_transactions::table
        .inner_join(payments::table)
        .filter(payments::campaign_id.eq(campaign_id))
        .filter(payments::provider_id.eq(provider_id))
        .count()
        .get_result(conn)?)
}

/// Lists a payment's transactions in recording order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_transactions(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Vec<PaymentTransaction>, PersistenceError> {
    let rows: Vec<PaymentTransactionRow> = payment_transactions::table
        .filter(payment_transactions::payment_id.eq(payment_id))
        .order(payment_transactions::transaction_id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Into::into).collect())
}
