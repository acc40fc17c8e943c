// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment mutations: the eligibility-gated attach, the pre-settlement
//! detach, close helpers, and the availability-cache recomputation every
//! mutating path funnels through.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::diesel_schema::{assignments, providers};
use crate::error::PersistenceError;
use crate::queries;
use camptrack::{AttachContext, check_attach, check_detach};
use camptrack_domain::{
    Assignment, AssignmentStatus, Campaign, Payment, Provider, format_timestamp,
};

/// Recomputes a provider's availability flag from the assignment table.
///
/// `available ⇔ no open assignment on a non-terminal campaign`. Returns
/// the recomputed value.
///
/// # Errors
///
/// Returns an error if a query or the update fails.
pub fn recompute_provider_availability(
    conn: &mut SqliteConnection,
    provider_id: i64,
) -> Result<bool, PersistenceError> {
    let committed: bool = queries::assignments::is_committed(conn, provider_id)?;
    diesel::update(providers::table)
        .filter(providers::provider_id.eq(provider_id))
        .set(providers::available.eq(i32::from(!committed)))
        .execute(conn)?;
    Ok(!committed)
}

/// Attaches a provider to a campaign after running the eligibility gate.
///
/// A commitment detected while the availability flag still reads `true`
/// means the cache went stale; the flag is healed before the error is
/// returned so the next read is truthful.
///
/// # Errors
///
/// Returns `CampaignNotFound`/`ProviderNotFound`, the first violated
/// eligibility rule, or a database error.
pub fn attach_provider(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<Assignment, PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    let provider: Provider = queries::providers::get_provider(conn, provider_id)?;
    let pair_assignment_exists: bool =
        queries::assignments::find_assignment(conn, campaign_id, provider_id)?.is_some();
    let open_commitment: Option<Campaign> =
        queries::assignments::open_commitment(conn, provider_id, Some(campaign_id))?;
    let open_assignment_count: i64 =
        queries::assignments::count_open_for_campaign(conn, campaign_id)?;

    if provider.available && open_commitment.is_some() {
        warn!(provider_id, "Stale availability flag detected, healing");
        recompute_provider_availability(conn, provider_id)?;
    }

    check_attach(&AttachContext {
        campaign: &campaign,
        provider: &provider,
        pair_assignment_exists,
        open_commitment: open_commitment.as_ref(),
        open_assignment_count,
    })?;

    diesel::insert_into(assignments::table)
        .values((
            assignments::campaign_id.eq(campaign_id),
            assignments::provider_id.eq(provider_id),
            assignments::status.eq(AssignmentStatus::Active.as_str()),
            assignments::created_at.eq(format_timestamp(now)?),
            assignments::end_date.eq(None::<String>),
        ))
        .execute(conn)?;

    recompute_provider_availability(conn, provider_id)?;
    info!(campaign_id, provider_id, "Provider attached");
    queries::assignments::get_assignment(conn, campaign_id, provider_id)
}

/// Removes a pair's assignment before settlement starts.
///
/// # Errors
///
/// Returns `AssignmentNotFound`, `SettlementStarted` once any payment has
/// moved or a transaction exists, or a database error.
pub fn detach_provider(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<(), PersistenceError> {
    queries::assignments::get_assignment(conn, campaign_id, provider_id)?;
    let pair_payments: Vec<Payment> =
        queries::payments::list_for_pair(conn, campaign_id, provider_id)?;
    let transaction_count: i64 =
        queries::payments::transaction_count_for_pair(conn, campaign_id, provider_id)?;
    check_detach(campaign_id, provider_id, &pair_payments, transaction_count)?;

    diesel::delete(assignments::table)
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::provider_id.eq(provider_id))
        .execute(conn)?;

    recompute_provider_availability(conn, provider_id)?;
    info!(campaign_id, provider_id, "Provider detached");
    Ok(())
}

/// Closes one assignment, stamping its effective end.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn close_assignment(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(assignments::table)
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::provider_id.eq(provider_id))
        .set((
            assignments::status.eq(AssignmentStatus::Closed.as_str()),
            assignments::end_date.eq(Some(format_timestamp(now)?)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Records the installed-poster photo URL on an assignment.
///
/// # Errors
///
/// Returns `AssignmentNotFound`, or a database error.
pub fn set_poster_image(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
    url: &str,
) -> Result<(), PersistenceError> {
    queries::assignments::get_assignment(conn, campaign_id, provider_id)?;
    diesel::update(assignments::table)
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::provider_id.eq(provider_id))
        .set(assignments::poster_image.eq(Some(url)))
        .execute(conn)?;
    Ok(())
}
