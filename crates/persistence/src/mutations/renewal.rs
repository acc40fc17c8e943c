// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Campaign renewal: one transaction that creates the successor campaign
//! and re-attaches the valid candidates with scheduled end dates.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::HashMap;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::diesel_schema::{assignments, campaigns};
use crate::error::PersistenceError;
use crate::mutations::assignments::recompute_provider_availability;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use camptrack::{
    CandidateSplit, SkippedCandidate, SuccessorPlan, check_renewal_source, filter_candidates,
    plan_successor, scheduled_assignment_end,
};
use camptrack_domain::{
    AssignmentStatus, Campaign, CampaignStatus, Provider, format_date, format_timestamp,
};

/// The result of a successful renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewalOutcome {
    /// The newly created successor campaign.
    pub campaign: Campaign,
    pub attached_count: i64,
    /// Candidates left behind, with reasons.
    pub skipped: Vec<SkippedCandidate>,
}

/// Renews a finished campaign into a PLANNED successor.
///
/// The candidate set is every provider ever assigned to the source,
/// optionally restricted to `provider_subset`. Candidate filtering is
/// non-fatal per provider; an empty or fully-skipped set fails the whole
/// renewal and nothing is written.
///
/// # Errors
///
/// Returns `CampaignNotFound`, the violated renewal rule, or a database
/// error.
pub fn renew_campaign(
    conn: &mut SqliteConnection,
    campaign_id: i64,
    new_start: Date,
    new_end: Date,
    provider_subset: Option<&[i64]>,
    now: OffsetDateTime,
) -> Result<RenewalOutcome, PersistenceError> {
    let source: Campaign = queries::campaigns::get_campaign(conn, campaign_id)?;
    check_renewal_source(&source)?;

    let mut candidates: Vec<Provider> =
        queries::assignments::providers_ever_assigned(conn, campaign_id)?;
    if let Some(subset) = provider_subset {
        candidates.retain(|p| subset.contains(&p.provider_id));
    }

    let mut open_commitments: HashMap<i64, String> = HashMap::new();
    for candidate in &candidates {
        if let Some(other) =
            queries::assignments::open_commitment(conn, candidate.provider_id, None)?
        {
            open_commitments.insert(candidate.provider_id, other.name);
        }
    }

    let split: CandidateSplit = filter_candidates(&source, &candidates, &open_commitments)?;
    let valid_count: i64 = i64::try_from(split.valid.len())
        .map_err(|e| PersistenceError::Other(e.to_string()))?;

    let neighbours: Vec<Campaign> =
        queries::campaigns::list_location_neighbours(conn, source.location_id)?;
    let plan: SuccessorPlan = plan_successor(&source, new_start, new_end, valid_count, &neighbours)?;

    let timestamp: String = format_timestamp(now)?;
    diesel::insert_into(campaigns::table)
        .values((
            campaigns::name.eq(&plan.name),
            campaigns::description.eq(plan.description.as_deref()),
            campaigns::objective.eq(plan.objective.as_deref()),
            campaigns::client_id.eq(plan.client_id),
            campaigns::location_id.eq(plan.location_id),
            campaigns::service_id.eq(plan.service_id),
            campaigns::manager.eq(&plan.manager),
            campaigns::supervisor.eq(plan.supervisor.as_deref()),
            campaigns::target_quantity.eq(plan.target_quantity),
            campaigns::target_provider_count.eq(Some(plan.target_provider_count)),
            campaigns::kind.eq(plan.kind.as_str()),
            campaigns::start_date.eq(format_date(plan.start_date)?),
            campaigns::end_date.eq(format_date(plan.end_date)?),
            campaigns::status.eq(CampaignStatus::Planned.as_str()),
            campaigns::parent_campaign_id.eq(Some(plan.parent_campaign_id)),
            campaigns::created_at.eq(&timestamp),
            campaigns::updated_at.eq(&timestamp),
        ))
        .execute(conn)?;
    let new_campaign_id: i64 = get_last_insert_rowid(conn)?;

    let scheduled_end: String = format_timestamp(scheduled_assignment_end(&source, now))?;
    for provider_id in &split.valid {
        diesel::insert_into(assignments::table)
            .values((
                assignments::campaign_id.eq(new_campaign_id),
                assignments::provider_id.eq(*provider_id),
                assignments::status.eq(AssignmentStatus::ScheduledEnd.as_str()),
                assignments::created_at.eq(&timestamp),
                assignments::end_date.eq(Some(&scheduled_end)),
            ))
            .execute(conn)?;
        recompute_provider_availability(conn, *provider_id)?;
    }

    info!(
        source_campaign_id = campaign_id,
        new_campaign_id,
        attached = split.valid.len(),
        skipped = split.skipped.len(),
        "Campaign renewed"
    );

    Ok(RenewalOutcome {
        campaign: queries::campaigns::get_campaign(conn, new_campaign_id)?,
        attached_count: valid_count,
        skipped: split.skipped,
    })
}
