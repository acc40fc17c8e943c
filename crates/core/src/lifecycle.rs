// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Campaign lifecycle guards: date validity, location exclusivity, the
//! status state machine, and the deletion guard.

use crate::error::CoreError;
use camptrack_domain::{
    Campaign, CampaignStatus, DomainError, ranges_overlap, validate_date_range,
};
use time::Date;

/// Validates a campaign date range (`end > start`).
///
/// # Errors
///
/// Returns `EndDateNotAfterStart` otherwise.
pub fn check_campaign_dates(start: Date, end: Date) -> Result<(), CoreError> {
    validate_date_range(start, end)?;
    Ok(())
}

/// Enforces location exclusivity: at most one non-cancelled campaign per
/// location for overlapping inclusive date ranges.
///
/// `exclude_id` skips the campaign being updated so it does not collide
/// with itself.
///
/// # Errors
///
/// Returns `DateOverlap` naming the first collider found.
pub fn ensure_no_overlap(
    location_id: i64,
    start: Date,
    end: Date,
    neighbours: &[Campaign],
    exclude_id: Option<i64>,
) -> Result<(), CoreError> {
    for other in neighbours {
        if other.location_id != location_id
            || other.status == CampaignStatus::Cancelled
            || exclude_id == Some(other.campaign_id)
        {
            continue;
        }
        if ranges_overlap(start, end, other.start_date, other.end_date) {
            return Err(DomainError::DateOverlap {
                location_id,
                other_campaign: other.name.clone(),
                other_campaign_id: other.campaign_id,
            }
            .into());
        }
    }
    Ok(())
}

/// Validates a status transition against the state machine.
///
/// Starting a campaign additionally requires at least one assignment.
///
/// # Errors
///
/// Returns `InvalidStatusTransition` for a pair outside the state machine,
/// or `TransitionRequiresAssignments` for an unstaffed start.
pub fn check_transition(
    campaign: &Campaign,
    target: CampaignStatus,
    assignment_count: i64,
) -> Result<(), CoreError> {
    if !campaign.status.can_transition_to(target) {
        return Err(DomainError::InvalidStatusTransition {
            from: campaign.status,
            to: target,
        }
        .into());
    }
    if campaign.status == CampaignStatus::Planned
        && target == CampaignStatus::Ongoing
        && assignment_count == 0
    {
        return Err(DomainError::TransitionRequiresAssignments {
            campaign: campaign.name.clone(),
        }
        .into());
    }
    Ok(())
}

/// Validates that a campaign may be deleted.
///
/// # Errors
///
/// Returns an error while any assignment or registered file remains.
pub fn check_delete(
    campaign: &Campaign,
    assignment_count: i64,
    file_count: i64,
) -> Result<(), CoreError> {
    if assignment_count > 0 {
        return Err(DomainError::CampaignHasAssignments {
            campaign: campaign.name.clone(),
            count: assignment_count,
        }
        .into());
    }
    if file_count > 0 {
        return Err(DomainError::CampaignHasFiles {
            campaign: campaign.name.clone(),
            count: file_count,
        }
        .into());
    }
    Ok(())
}

/// Returns whether the auto-termination sweep should finish this campaign:
/// past its end date and not already terminal.
#[must_use]
pub fn campaign_expired(campaign: &Campaign, today: Date) -> bool {
    campaign.has_ended(today) && !campaign.status.is_terminal()
}
