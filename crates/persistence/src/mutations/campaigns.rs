// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Campaign lifecycle mutations: creation, date updates, status
//! transitions, deletion, and document registration.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::diesel_schema::{campaign_files, campaigns};
use crate::error::PersistenceError;
use crate::mutations::assignments::recompute_provider_availability;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use camptrack::{check_campaign_dates, check_delete, check_transition, ensure_no_overlap};
use camptrack_domain::{
    Campaign, CampaignKind, CampaignStatus, format_date, format_timestamp,
};

/// Input for creating a campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub client_id: i64,
    pub location_id: i64,
    pub service_id: i64,
    pub manager: String,
    pub supervisor: Option<String>,
    pub target_quantity: i64,
    pub target_provider_count: Option<i64>,
    pub kind: CampaignKind,
    pub start_date: Date,
    pub end_date: Date,
}

/// Creates a campaign in PLANNED status.
///
/// Validates the date range, resolves the client (so a dangling client
/// reference fails as NotFound rather than a bare constraint error), and
/// enforces location exclusivity before inserting.
///
/// # Errors
///
/// Returns the violated rule, or a database error.
pub fn create_campaign(
    conn: &mut SqliteConnection,
    new: &NewCampaign,
    now: OffsetDateTime,
) -> Result<Campaign, PersistenceError> {
    info!("Creating campaign: {}", new.name);
    check_campaign_dates(new.start_date, new.end_date)?;
    queries::campaigns::get_client(conn, new.client_id)?;
    let neighbours: Vec<Campaign> =
        queries::campaigns::list_location_neighbours(conn, new.location_id)?;
    ensure_no_overlap(
        new.location_id,
        new.start_date,
        new.end_date,
        &neighbours,
        None,
    )?;

    let timestamp: String = format_timestamp(now)?;
    diesel::insert_into(campaigns::table)
        .values((
            campaigns::name.eq(&new.name),
            campaigns::description.eq(new.description.as_deref()),
            campaigns::objective.eq(new.objective.as_deref()),
            campaigns::client_id.eq(new.client_id),
            campaigns::location_id.eq(new.location_id),
            campaigns::service_id.eq(new.service_id),
            campaigns::manager.eq(&new.manager),
            campaigns::supervisor.eq(new.supervisor.as_deref()),
            campaigns::target_quantity.eq(new.target_quantity),
            campaigns::target_provider_count.eq(new.target_provider_count),
            campaigns::kind.eq(new.kind.as_str()),
            campaigns::start_date.eq(format_date(new.start_date)?),
            campaigns::end_date.eq(format_date(new.end_date)?),
            campaigns::status.eq(CampaignStatus::Planned.as_str()),
            campaigns::parent_campaign_id.eq(None::<i64>),
            campaigns::created_at.eq(&timestamp),
            campaigns::updated_at.eq(&timestamp),
        ))
        .execute(conn)?;

    let campaign_id: i64 = get_last_insert_rowid(conn)?;
    info!(campaign_id, "Campaign created");
    queries::campaigns::get_campaign(conn, campaign_id)
}

/// Updates a campaign's date range, re-running the same guards as
/// creation (excluding the campaign itself from the overlap check).
///
/// # Errors
///
/// Returns the violated rule, or a database error.
pub fn update_campaign_dates(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    start_date: Date,
    end_date: Date,
    now: OffsetDateTime,
) -> Result<Campaign, PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    check_campaign_dates(start_date, end_date)?;
    let neighbours: Vec<Campaign> =
        queries::campaigns::list_location_neighbours(conn, campaign.location_id)?;
    ensure_no_overlap(
        campaign.location_id,
        start_date,
        end_date,
        &neighbours,
        Some(campaign_id),
    )?;

    diesel::update(campaigns::table)
        .filter(campaigns::campaign_id.eq(campaign_id))
        .set((
            campaigns::start_date.eq(format_date(start_date)?),
            campaigns::end_date.eq(format_date(end_date)?),
            campaigns::updated_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    info!(campaign_id, "Campaign dates updated");
    queries::campaigns::get_campaign(conn, campaign_id)
}

/// Transitions a campaign to a new status.
///
/// # Errors
///
/// Returns the violated transition rule, or a database error.
pub fn transition_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    target: CampaignStatus,
    now: OffsetDateTime,
) -> Result<Campaign, PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    let assignment_count: i64 = queries::assignments::count_for_campaign(conn, campaign_id)?;
    check_transition(&campaign, target, assignment_count)?;

    diesel::update(campaigns::table)
        .filter(campaigns::campaign_id.eq(campaign_id))
        .set((
            campaigns::status.eq(target.as_str()),
            campaigns::updated_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    info!(
        campaign_id,
        from = campaign.status.as_str(),
        to = target.as_str(),
        "Campaign status changed"
    );

    // Entering a terminal state frees the providers still held by open
    // assignments on this campaign.
    if target.is_terminal() {
        let open = queries::assignments::list_open_for_campaign(conn, campaign_id)?;
        for assignment in &open {
            recompute_provider_availability(conn, assignment.provider_id)?;
        }
    }

    queries::campaigns::get_campaign(conn, campaign_id)
}

/// Deletes a campaign. Only allowed while nothing references it.
///
/// # Errors
///
/// Returns the violated deletion guard, or a database error.
pub fn delete_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<(), PersistenceError> {
    let campaign: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    let assignment_count: i64 = queries::assignments::count_for_campaign(conn, campaign_id)?;
    let file_count: i64 = queries::campaigns::count_campaign_files(conn, campaign_id)?;
    check_delete(&campaign, assignment_count, file_count)?;

    diesel::delete(campaigns::table)
        .filter(campaigns::campaign_id.eq(campaign_id))
        .execute(conn)?;
    info!(campaign_id, "Campaign deleted");
    Ok(())
}

/// Registers an already-uploaded document URL against a campaign.
///
/// # Errors
///
/// Returns `CampaignNotFound`, or a database error.
pub fn register_campaign_file(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    label: &str,
    url: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    queries::campaigns::get_campaign(conn, campaign_id)?;
    diesel::insert_into(campaign_files::table)
        .values((
            campaign_files::campaign_id.eq(campaign_id),
            campaign_files::label.eq(label),
            campaign_files::url.eq(url),
            campaign_files::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;
    let file_id: i64 = get_last_insert_rowid(conn)?;
    info!(campaign_id, file_id, "Campaign file registered");
    Ok(file_id)
}
