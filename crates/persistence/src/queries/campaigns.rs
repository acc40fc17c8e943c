// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Campaign, client, and campaign-file queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{CampaignFileRow, CampaignRow, ClientRow};
use crate::diesel_schema::{campaign_files, campaigns, clients};
use crate::error::PersistenceError;
use camptrack_domain::{Campaign, ClientType};

/// Loads one campaign.
///
/// # Errors
///
/// Returns `CampaignNotFound` if no row exists.
pub fn get_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Campaign, PersistenceError> {
    let row: CampaignRow = campaigns::table
        .filter(campaigns::campaign_id.eq(campaign_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::CampaignNotFound(campaign_id))?;
    row.try_into()
}

/// Loads every campaign.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_campaigns(conn: &mut SqliteConnection) -> Result<Vec<Campaign>, PersistenceError> {
    debug!("Listing all campaigns");
    let rows: Vec<CampaignRow> = campaigns::table
        .order(campaigns::campaign_id.asc())
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Loads every campaign at a location, for the overlap check.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_location_neighbours(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<Vec<Campaign>, PersistenceError> {
    let rows: Vec<CampaignRow> = campaigns::table
        .filter(campaigns::location_id.eq(location_id))
        .load(conn)?;
    rows.into_iter().map(TryInto::try_into).collect()
}

/// Counts the documents registered against a campaign.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_campaign_files(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(campaign_files::table
        .filter(campaign_files::campaign_id.eq(campaign_id))
        .count()
        .get_result(conn)?)
}

/// Lists the documents registered against a campaign.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_campaign_files(
    conn: &mut SqliteConnection,
    campaign_id: i64,
) -> Result<Vec<CampaignFileRow>, PersistenceError> {
    Ok(campaign_files::table
        .filter(campaign_files::campaign_id.eq(campaign_id))
        .order(campaign_files::file_id.asc())
        .load(conn)?)
}

/// Loads a client row.
///
/// # Errors
///
/// Returns `ClientNotFound` if no row exists.
pub fn get_client(conn: &mut SqliteConnection, client_id: i64) -> Result<ClientRow, PersistenceError> {
    clients::table
        .filter(clients::client_id.eq(client_id))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ClientNotFound(client_id))
}

/// Resolves the tariff-driving client type for a campaign.
///
/// # Errors
///
/// Returns an error if the client is missing or its type is invalid.
pub fn client_type_for_campaign(
    conn: &mut SqliteConnection,
    campaign: &Campaign,
) -> Result<ClientType, PersistenceError> {
    get_client(conn, campaign.client_id)?.client_type()
}
