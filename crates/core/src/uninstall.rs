// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guards for confirming material de-installation after a campaign ends.

use crate::error::CoreError;
use camptrack_domain::{Assignment, Campaign, CampaignStatus, DomainError, PaymentType, Provider};
use time::Date;

/// Returns whether de-installation may be confirmed for the campaign:
/// FINISHED, or past its end date regardless of status.
#[must_use]
pub fn uninstallation_open(campaign: &Campaign, today: Date) -> bool {
    campaign.status == CampaignStatus::Finished || campaign.has_ended(today)
}

/// Validates a de-installation confirmation.
///
/// # Errors
///
/// Returns `CampaignNotEnded` while the campaign is still running,
/// `AlreadyUninstalled` for a repeated confirmation, and
/// `DuplicatePayment` when a DEINSTALLATION payment already exists for
/// the pair.
pub fn check_uninstallation(
    campaign: &Campaign,
    provider: &Provider,
    assignment: &Assignment,
    deinstallation_payment_exists: bool,
    today: Date,
) -> Result<(), CoreError> {
    if !uninstallation_open(campaign, today) {
        return Err(DomainError::CampaignNotEnded {
            campaign: campaign.name.clone(),
        }
        .into());
    }
    if assignment.deinstalled_at.is_some() {
        return Err(DomainError::AlreadyUninstalled {
            campaign: campaign.name.clone(),
            provider: provider.name.clone(),
        }
        .into());
    }
    if deinstallation_payment_exists {
        return Err(DomainError::DuplicatePayment {
            campaign_id: campaign.campaign_id,
            provider_id: provider.provider_id,
            payment_type: PaymentType::Deinstallation,
        }
        .into());
    }
    Ok(())
}
