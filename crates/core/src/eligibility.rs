// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The assignment eligibility gate.
//!
//! Attaching a provider to a campaign is the most contended operation in
//! the system; every check here assumes it runs inside the caller's
//! transaction against rows read in that same transaction.

use crate::error::CoreError;
use camptrack_domain::{Campaign, DomainError, Payment, PaymentStatus, Provider};

/// Everything the attach decision needs, loaded by the caller.
#[derive(Debug)]
pub struct AttachContext<'a> {
    /// The target campaign.
    pub campaign: &'a Campaign,
    /// The provider being attached.
    pub provider: &'a Provider,
    /// Whether any assignment already exists for this exact pair,
    /// regardless of its status.
    pub pair_assignment_exists: bool,
    /// Another non-terminal campaign the provider holds an open assignment
    /// on, if one exists. Derived from the assignment table, not from the
    /// availability flag.
    pub open_commitment: Option<&'a Campaign>,
    /// Number of open assignments the campaign currently holds.
    pub open_assignment_count: i64,
}

/// Decides whether a provider may be attached to a campaign.
///
/// Checks run in a fixed order so callers get deterministic errors:
/// service mismatch, duplicate pair, availability flag, cross-campaign
/// commitment, provider capacity.
///
/// A commitment found while the availability flag still reads `true` means
/// the cached flag is stale; the caller must heal the flag before
/// returning the error.
///
/// # Errors
///
/// Returns the first violated rule as a [`CoreError`].
pub fn check_attach(ctx: &AttachContext<'_>) -> Result<(), CoreError> {
    if ctx.provider.service_id != ctx.campaign.service_id {
        return Err(DomainError::ServiceMismatch {
            provider: ctx.provider.name.clone(),
            campaign: ctx.campaign.name.clone(),
        }
        .into());
    }

    if ctx.pair_assignment_exists {
        return Err(DomainError::DuplicateAssignment {
            campaign: ctx.campaign.name.clone(),
            provider: ctx.provider.name.clone(),
        }
        .into());
    }

    if !ctx.provider.available {
        return Err(DomainError::ProviderUnavailable {
            provider: ctx.provider.name.clone(),
        }
        .into());
    }

    if let Some(other) = ctx.open_commitment {
        return Err(DomainError::ProviderCommitted {
            provider: ctx.provider.name.clone(),
            campaign: other.name.clone(),
        }
        .into());
    }

    if let Some(limit) = ctx.campaign.target_provider_count
        && ctx.open_assignment_count >= limit
    {
        return Err(DomainError::ProviderCapacityReached {
            campaign: ctx.campaign.name.clone(),
            limit,
        }
        .into());
    }

    Ok(())
}

/// Decides whether a pair's assignment may still be removed.
///
/// Removal is only allowed before settlement starts: no payment for the
/// pair may have left EN_ATTENTE, and no transaction may have been
/// recorded against any of them.
///
/// # Errors
///
/// Returns `SettlementStarted` once either condition fails.
pub fn check_detach(
    campaign_id: i64,
    provider_id: i64,
    pair_payments: &[Payment],
    transaction_count: i64,
) -> Result<(), CoreError> {
    let settled: bool = transaction_count > 0
        || pair_payments
            .iter()
            .any(|p| p.status != PaymentStatus::Pending);
    if settled {
        return Err(DomainError::SettlementStarted {
            campaign_id,
            provider_id,
        }
        .into());
    }
    Ok(())
}
