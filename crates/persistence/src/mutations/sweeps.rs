// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled sweeps: auto-termination of expired campaigns and
//! auto-release of assignments whose scheduled end has passed.
//!
//! Both sweeps are idempotent: a second run over the same state matches
//! nothing and reports zero effects. They are safe to run in any order
//! because both converge on the same invariant, recomputed availability
//! from the assignment table.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::BTreeSet;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::diesel_schema::{assignments, campaigns};
use crate::error::PersistenceError;
use crate::mutations::assignments::{close_assignment, recompute_provider_availability};
use crate::queries;
use camptrack::campaign_expired;
use camptrack_domain::{
    Assignment, AssignmentStatus, Campaign, CampaignStatus, format_timestamp,
};

/// What one auto-termination run changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminationSweep {
    pub campaigns_terminated: i64,
    pub assignments_closed: i64,
    pub providers_released: i64,
    pub terminated_campaign_ids: Vec<i64>,
}

/// What one auto-release run changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseSweep {
    pub assignments_matched: i64,
    pub providers_released: i64,
    pub released_provider_ids: Vec<i64>,
    /// The (campaign, provider) pairs that were closed.
    pub closed_pairs: Vec<(i64, i64)>,
}

/// Finishes every campaign past its end date, closing its open
/// assignments and releasing the affected providers.
///
/// # Errors
///
/// Returns an error if any read or write fails; the caller's transaction
/// rolls the whole sweep back.
pub fn auto_terminate(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<TerminationSweep, PersistenceError> {
    let today: Date = now.date();
    let expired: Vec<Campaign> = queries::campaigns::list_campaigns(conn)?
        .into_iter()
        .filter(|c| campaign_expired(c, today))
        .collect();

    let mut sweep = TerminationSweep::default();
    let mut touched_providers: BTreeSet<i64> = BTreeSet::new();

    for campaign in &expired {
        diesel::update(campaigns::table)
            .filter(campaigns::campaign_id.eq(campaign.campaign_id))
            .set((
                campaigns::status.eq(CampaignStatus::Finished.as_str()),
                campaigns::updated_at.eq(format_timestamp(now)?),
            ))
            .execute(conn)?;

        let open: Vec<Assignment> =
            queries::assignments::list_open_for_campaign(conn, campaign.campaign_id)?;
        for assignment in &open {
            close_assignment(conn, assignment.campaign_id, assignment.provider_id, now)?;
            touched_providers.insert(assignment.provider_id);
            sweep.assignments_closed += 1;
        }

        sweep.campaigns_terminated += 1;
        sweep.terminated_campaign_ids.push(campaign.campaign_id);
        info!(
            campaign_id = campaign.campaign_id,
            assignments_closed = open.len(),
            "Campaign auto-terminated"
        );
    }

    for provider_id in &touched_providers {
        recompute_provider_availability(conn, *provider_id)?;
        sweep.providers_released += 1;
    }

    info!(
        campaigns = sweep.campaigns_terminated,
        assignments = sweep.assignments_closed,
        providers = sweep.providers_released,
        "Auto-termination sweep complete"
    );
    Ok(sweep)
}

/// Closes every open assignment whose scheduled end has passed,
/// regardless of campaign status, and releases the affected providers.
///
/// # Errors
///
/// Returns an error if any read or write fails; the caller's transaction
/// rolls the whole sweep back.
pub fn auto_release(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<ReleaseSweep, PersistenceError> {
    let open: Vec<Assignment> = queries::assignments::list_open(conn)?;
    let matched: Vec<Assignment> = open
        .into_iter()
        .filter(|a| a.end_date.is_some_and(|end| end < now))
        .collect();

    let mut sweep = ReleaseSweep::default();
    let mut touched_providers: BTreeSet<i64> = BTreeSet::new();

    for assignment in &matched {
        // The scheduled end already stands as the effective end; only the
        // status flips.
        diesel::update(assignments::table)
            .filter(assignments::campaign_id.eq(assignment.campaign_id))
            .filter(assignments::provider_id.eq(assignment.provider_id))
            .set(assignments::status.eq(AssignmentStatus::Closed.as_str()))
            .execute(conn)?;
        touched_providers.insert(assignment.provider_id);
        sweep
            .closed_pairs
            .push((assignment.campaign_id, assignment.provider_id));
        sweep.assignments_matched += 1;
    }

    for provider_id in &touched_providers {
        recompute_provider_availability(conn, *provider_id)?;
        sweep.providers_released += 1;
        sweep.released_provider_ids.push(*provider_id);
    }

    info!(
        assignments = sweep.assignments_matched,
        providers = sweep.providers_released,
        "Auto-release sweep complete"
    );
    Ok(sweep)
}
