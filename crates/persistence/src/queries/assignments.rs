// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment queries, including the commitment re-derivation that the
//! eligibility gate and the availability cache both rely on.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{AssignmentRow, CampaignRow, ProviderRow};
use crate::diesel_schema::{assignments, campaigns, providers};
use crate::error::PersistenceError;
use camptrack_domain::{Assignment, Campaign, Provider};

const OPEN_STATUSES: [&str; 2] = ["ACTIVE", "SCHEDULED_END"];
const NON_TERMINAL_CAMPAIGNS: [&str; 2] = ["PLANNED", "ONGOING"];

/// Finds the pair's assignment if one exists, in any state.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_assignment(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Option<Assignment>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::provider_id.eq(provider_id))
        .first(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Loads the pair's assignment.
///
/// # Errors
///
/// Returns `AssignmentNotFound` if no row exists.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Assignment, PersistenceError> {
    find_assignment(conn, campaign_id, provider_id)?.ok_or(
        PersistenceError::AssignmentNotFound {
            campaign_id,
            provider_id,
        },
    )
}

/// Lists a campaign's assignments.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_for_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::campaign_id.eq(campaign_id))
        .order(assignments::assignment_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Counts a campaign's open assignments, for the capacity check.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_open_for_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::status.eq_any(OPEN_STATUSES))
        .count()
        .get_result(conn)?)
}

/// Counts a campaign's assignments in any state, for the lifecycle guards.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_for_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::campaign_id.eq(campaign_id))
        .count()
        .get_result(conn)?)
}

/// Re-derives a provider's commitment from the assignment table: the first
/// non-terminal campaign (other than `exclude_campaign`) the provider holds
/// an open assignment on.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn open_commitment(
    conn: &mut SqliteConnection,
    provider_id: i64,
    exclude_campaign: Option<i64>,
) -> Result<Option<Campaign>, PersistenceError> {
    let mut query = assignments::table
        .inner_join(campaigns::table)
        .filter(assignments::provider_id.eq(provider_id))
        .filter(assignments::status.eq_any(OPEN_STATUSES))
        .filter(campaigns::status.eq_any(NON_TERMINAL_CAMPAIGNS))
        .into_boxed();
    if let Some(excluded) = exclude_campaign {
        query = query.filter(campaigns::campaign_id.ne(excluded));
    }
    let row: Option<CampaignRow> = query
        .select(campaigns::all_columns)
        .first(conn)
        .optional()?;
    row.map(TryInto::try_into).transpose()
}

/// Lists every open assignment, for the release sweep and the
/// notification scan.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_open(conn: &mut SqliteConnection) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::status.eq_any(OPEN_STATUSES))
        .order(assignments::assignment_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists a campaign's open assignments.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_open_for_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::campaign_id.eq(campaign_id))
        .filter(assignments::status.eq_any(OPEN_STATUSES))
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Lists the providers ever assigned to a campaign, in any state. The
/// renewal candidate set.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn providers_ever_assigned(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Vec<Provider>, PersistenceError> {
    let rows: Vec<ProviderRow> = assignments::table
        .inner_join(providers::table)
        .filter(assignments::campaign_id.eq(campaign_id))
        .select(providers::all_columns)
        .order(providers::provider_id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Returns whether the provider holds any open assignment at all, which is
/// what the availability cache mirrors.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_committed(
    conn: &mut SqliteConnection,
    provider_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(open_commitment(conn, provider_id, None)?.is_some())
}
