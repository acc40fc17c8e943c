// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! De-installation confirmation after a campaign ends.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::info;

use crate::diesel_schema::assignments;
use crate::error::PersistenceError;
use crate::mutations::payments::create_deinstallation_fee;
use crate::queries;
use camptrack::check_uninstallation;
use camptrack_domain::{
    Assignment, Campaign, DEINSTALLATION_FEE, Payment, PaymentType, Provider, format_timestamp,
};

/// The result of confirming a de-installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallationOutcome {
    pub assignment: Assignment,
    /// The fixed fee payment issued by the confirmation.
    pub payment: Payment,
}

/// Confirms that a provider removed its campaign material, stamping the
/// de-installation date and issuing the fixed fee.
///
/// # Errors
///
/// Returns `AssignmentNotFound`, the violated confirmation rule, or a
/// database error.
pub fn confirm_uninstallation(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<UninstallationOutcome, PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    let provider: Provider = queries::providers::get_provider(conn, provider_id)?;
    let assignment: Assignment = queries::assignments::get_assignment(conn, campaign_id, provider_id)?;
    let fee_exists: bool =
        queries::payments::find_payment(conn, campaign_id, provider_id, PaymentType::Deinstallation)?
            .is_some();

    check_uninstallation(&campaign, &provider, &assignment, fee_exists, now.date())?;

    diesel::update(assignments::table)
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::provider_id.eq(provider_id))
        .set(assignments::deinstalled_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;

    let payment: Payment =
        create_deinstallation_fee(conn, campaign_id, provider_id, DEINSTALLATION_FEE, now)?;

    info!(campaign_id, provider_id, "De-installation confirmed");
    Ok(UninstallationOutcome {
        assignment: queries::assignments::get_assignment(conn, campaign_id, provider_id)?,
        payment,
    })
}
