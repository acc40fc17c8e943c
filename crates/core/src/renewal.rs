// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Renewal planning: candidate filtering and successor derivation.
//!
//! Candidate filtering is deliberately non-fatal per provider: a skipped
//! candidate is reported with a reason rather than failing the renewal.
//! Only an empty candidate set, or a candidate set where every provider
//! is skipped, fails the whole operation.

use crate::error::CoreError;
use crate::lifecycle::{check_campaign_dates, ensure_no_overlap};
use camptrack_domain::{Campaign, CampaignKind, CampaignStatus, DomainError, Provider};
use std::collections::HashMap;
use time::{Date, Duration, OffsetDateTime};

/// A renewal candidate that failed validation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub provider_id: i64,
    pub provider_name: String,
    pub reason: String,
}

/// The outcome of candidate filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSplit {
    /// Providers that will be attached to the successor campaign.
    pub valid: Vec<i64>,
    pub skipped: Vec<SkippedCandidate>,
}

/// The successor campaign to create, derived from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorPlan {
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub client_id: i64,
    pub location_id: i64,
    pub service_id: i64,
    pub manager: String,
    pub supervisor: Option<String>,
    pub target_quantity: i64,
    /// Sized to the valid candidate count.
    pub target_provider_count: i64,
    pub kind: CampaignKind,
    pub start_date: Date,
    pub end_date: Date,
    pub parent_campaign_id: i64,
}

/// Validates that a campaign may serve as a renewal source.
///
/// # Errors
///
/// Returns `RenewalSourceNotFinished` unless the campaign is FINISHED.
pub fn check_renewal_source(campaign: &Campaign) -> Result<(), CoreError> {
    if campaign.status != CampaignStatus::Finished {
        return Err(DomainError::RenewalSourceNotFinished {
            campaign: campaign.name.clone(),
            status: campaign.status,
        }
        .into());
    }
    Ok(())
}

/// Splits renewal candidates into valid and skipped sets.
///
/// `open_commitments` maps a provider to the name of a non-terminal
/// campaign it still holds an open assignment on. The availability flag
/// is deliberately not consulted here; commitment is re-derived from
/// assignments by the caller.
///
/// # Errors
///
/// Returns `NoRenewalCandidates` for an empty candidate set and
/// `AllCandidatesSkipped` when filtering leaves no valid provider.
pub fn filter_candidates(
    campaign: &Campaign,
    candidates: &[Provider],
    open_commitments: &HashMap<i64, String>,
) -> Result<CandidateSplit, CoreError> {
    if candidates.is_empty() {
        return Err(DomainError::NoRenewalCandidates {
            campaign: campaign.name.clone(),
        }
        .into());
    }

    let mut valid: Vec<i64> = Vec::new();
    let mut skipped: Vec<SkippedCandidate> = Vec::new();
    for provider in candidates {
        if provider.service_id != campaign.service_id {
            skipped.push(SkippedCandidate {
                provider_id: provider.provider_id,
                provider_name: provider.name.clone(),
                reason: String::from("service no longer matches the campaign"),
            });
        } else if let Some(other) = open_commitments.get(&provider.provider_id) {
            skipped.push(SkippedCandidate {
                provider_id: provider.provider_id,
                provider_name: provider.name.clone(),
                reason: format!("committed to campaign '{other}'"),
            });
        } else {
            valid.push(provider.provider_id);
        }
    }

    if valid.is_empty() {
        return Err(DomainError::AllCandidatesSkipped {
            campaign: campaign.name.clone(),
            considered: candidates.len(),
        }
        .into());
    }

    Ok(CandidateSplit { valid, skipped })
}

/// Derives the successor campaign from the source.
///
/// The new dates are validated and checked for location overlap against
/// `neighbours` (the source itself is a legitimate neighbour here: it is
/// FINISHED, not CANCELLED, so its dates still block the location).
///
/// # Errors
///
/// Returns the date-range or overlap violation.
pub fn plan_successor(
    source: &Campaign,
    new_start: Date,
    new_end: Date,
    valid_count: i64,
    neighbours: &[Campaign],
) -> Result<SuccessorPlan, CoreError> {
    check_campaign_dates(new_start, new_end)?;
    ensure_no_overlap(source.location_id, new_start, new_end, neighbours, None)?;
    Ok(SuccessorPlan {
        name: format!("{} (Renouvellement)", source.name),
        description: source.description.clone(),
        objective: source.objective.clone(),
        client_id: source.client_id,
        location_id: source.location_id,
        service_id: source.service_id,
        manager: source.manager.clone(),
        supervisor: source.supervisor.clone(),
        target_quantity: source.target_quantity,
        target_provider_count: valid_count,
        kind: source.kind,
        start_date: new_start,
        end_date: new_end,
        parent_campaign_id: source.campaign_id,
    })
}

/// Scheduled end for a renewal-created assignment: the reference instant
/// plus the source campaign's duration.
#[must_use]
pub fn scheduled_assignment_end(source: &Campaign, now: OffsetDateTime) -> OffsetDateTime {
    now + Duration::days(source.duration_days())
}
