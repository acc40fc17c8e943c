// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CampaignStatus, PaymentType};
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Campaign status string is not recognized.
    InvalidCampaignStatus(String),
    /// Campaign kind string is not recognized.
    InvalidCampaignKind(String),
    /// Client type string is not recognized.
    InvalidClientType(String),
    /// Assignment status string is not recognized.
    InvalidAssignmentStatus(String),
    /// Material grade string is not recognized.
    InvalidMaterialGrade(String),
    /// Payment type string is not recognized.
    InvalidPaymentType(String),
    /// Payment status string is not recognized.
    InvalidPaymentStatus(String),
    /// Failed to parse a date or timestamp from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a date or timestamp.
    DateFormatError {
        /// The formatting error message.
        error: String,
    },
    /// Campaign end date must be strictly after the start date.
    EndDateNotAfterStart {
        /// The start date.
        start: Date,
        /// The offending end date.
        end: Date,
    },
    /// Another non-cancelled campaign occupies the location for an
    /// overlapping date range.
    DateOverlap {
        /// The contested location.
        location_id: i64,
        /// The colliding campaign's name.
        other_campaign: String,
        /// The colliding campaign's identifier.
        other_campaign_id: i64,
    },
    /// The requested status transition is not allowed.
    InvalidStatusTransition {
        /// The current status.
        from: CampaignStatus,
        /// The requested status.
        to: CampaignStatus,
    },
    /// A campaign cannot start without at least one assignment.
    TransitionRequiresAssignments {
        /// The campaign's name.
        campaign: String,
    },
    /// A campaign with assignments cannot be deleted.
    CampaignHasAssignments {
        /// The campaign's name.
        campaign: String,
        /// The number of assignments.
        count: i64,
    },
    /// A campaign with registered files cannot be deleted.
    CampaignHasFiles {
        /// The campaign's name.
        campaign: String,
        /// The number of files.
        count: i64,
    },
    /// The provider's service does not match the campaign's service.
    ServiceMismatch {
        /// The provider's name.
        provider: String,
        /// The campaign's name.
        campaign: String,
    },
    /// An assignment already exists for this (campaign, provider) pair.
    DuplicateAssignment {
        /// The campaign's name.
        campaign: String,
        /// The provider's name.
        provider: String,
    },
    /// The provider's availability flag is false.
    ProviderUnavailable {
        /// The provider's name.
        provider: String,
    },
    /// The provider holds an open assignment on another non-terminal
    /// campaign.
    ProviderCommitted {
        /// The provider's name.
        provider: String,
        /// The name of the campaign the provider is committed to.
        campaign: String,
    },
    /// The campaign's provider capacity has been reached.
    ProviderCapacityReached {
        /// The campaign's name.
        campaign: String,
        /// The declared maximum provider count.
        limit: i64,
    },
    /// Only finished campaigns can be renewed.
    RenewalSourceNotFinished {
        /// The campaign's name.
        campaign: String,
        /// Its current status.
        status: CampaignStatus,
    },
    /// No provider was ever assigned to the campaign (or the requested
    /// subset matched none).
    NoRenewalCandidates {
        /// The campaign's name.
        campaign: String,
    },
    /// Every renewal candidate was skipped during validation.
    AllCandidatesSkipped {
        /// The campaign's name.
        campaign: String,
        /// The number of candidates considered.
        considered: usize,
    },
    /// The campaign has not ended yet.
    CampaignNotEnded {
        /// The campaign's name.
        campaign: String,
    },
    /// The assignment already carries a de-installation date.
    AlreadyUninstalled {
        /// The campaign's name.
        campaign: String,
        /// The provider's name.
        provider: String,
    },
    /// A payment of this type already exists for the pair.
    DuplicatePayment {
        /// The campaign identifier.
        campaign_id: i64,
        /// The provider identifier.
        provider_id: i64,
        /// The duplicated payment type.
        payment_type: PaymentType,
    },
    /// The pair's settlement has started; the assignment can no longer be
    /// removed.
    SettlementStarted {
        /// The campaign identifier.
        campaign_id: i64,
        /// The provider identifier.
        provider_id: i64,
    },
    /// Transaction amounts must be strictly positive.
    NonPositiveAmount {
        /// The offending amount.
        amount: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCampaignStatus(s) => write!(f, "Invalid campaign status: {s}"),
            Self::InvalidCampaignKind(s) => write!(f, "Invalid campaign kind: {s}"),
            Self::InvalidClientType(s) => write!(f, "Invalid client type: {s}"),
            Self::InvalidAssignmentStatus(s) => write!(f, "Invalid assignment status: {s}"),
            Self::InvalidMaterialGrade(s) => write!(f, "Invalid material grade: {s}"),
            Self::InvalidPaymentType(s) => write!(f, "Invalid payment type: {s}"),
            Self::InvalidPaymentStatus(s) => write!(f, "Invalid payment status: {s}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateFormatError { error } => write!(f, "Failed to format date: {error}"),
            Self::EndDateNotAfterStart { start, end } => {
                write!(f, "End date {end} must be after start date {start}")
            }
            Self::DateOverlap {
                location_id,
                other_campaign,
                other_campaign_id,
            } => write!(
                f,
                "Location {location_id} is already occupied by campaign '{other_campaign}' (id {other_campaign_id}) for an overlapping period"
            ),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Campaign status cannot change from {from} to {to}")
            }
            Self::TransitionRequiresAssignments { campaign } => write!(
                f,
                "Campaign '{campaign}' cannot start without at least one assigned provider"
            ),
            Self::CampaignHasAssignments { campaign, count } => write!(
                f,
                "Campaign '{campaign}' cannot be deleted: {count} assignment(s) exist"
            ),
            Self::CampaignHasFiles { campaign, count } => write!(
                f,
                "Campaign '{campaign}' cannot be deleted: {count} file(s) are registered"
            ),
            Self::ServiceMismatch { provider, campaign } => write!(
                f,
                "Provider '{provider}' does not offer the service required by campaign '{campaign}'"
            ),
            Self::DuplicateAssignment { campaign, provider } => write!(
                f,
                "Provider '{provider}' already has an assignment to campaign '{campaign}'"
            ),
            Self::ProviderUnavailable { provider } => {
                write!(f, "Provider '{provider}' is not available")
            }
            Self::ProviderCommitted { provider, campaign } => write!(
                f,
                "Provider '{provider}' is already committed to campaign '{campaign}'"
            ),
            Self::ProviderCapacityReached { campaign, limit } => write!(
                f,
                "Campaign '{campaign}' already has its maximum of {limit} provider(s)"
            ),
            Self::RenewalSourceNotFinished { campaign, status } => write!(
                f,
                "Campaign '{campaign}' cannot be renewed: status is {status}, expected FINISHED"
            ),
            Self::NoRenewalCandidates { campaign } => write!(
                f,
                "Campaign '{campaign}' has no renewal candidates: no provider was ever assigned"
            ),
            Self::AllCandidatesSkipped {
                campaign,
                considered,
            } => write!(
                f,
                "Campaign '{campaign}' cannot be renewed: all {considered} candidate(s) were skipped during validation"
            ),
            Self::CampaignNotEnded { campaign } => write!(
                f,
                "Campaign '{campaign}' has not ended: de-installation cannot be confirmed"
            ),
            Self::AlreadyUninstalled { campaign, provider } => write!(
                f,
                "De-installation already confirmed for provider '{provider}' on campaign '{campaign}'"
            ),
            Self::DuplicatePayment {
                campaign_id,
                provider_id,
                payment_type,
            } => write!(
                f,
                "A {} payment already exists for campaign {campaign_id} and provider {provider_id}",
                payment_type.as_str()
            ),
            Self::SettlementStarted {
                campaign_id,
                provider_id,
            } => write!(
                f,
                "Assignment of provider {provider_id} to campaign {campaign_id} cannot be removed: settlement has started"
            ),
            Self::NonPositiveAmount { amount } => {
                write!(f, "Transaction amount must be positive, got {amount}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
