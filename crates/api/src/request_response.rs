// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These are distinct from domain types and represent the wire contract.
//! Dates cross the boundary as `YYYY-MM-DD` strings and enums as their
//! stored wire values; handlers parse them into domain types before any
//! rule runs.

use serde::{Deserialize, Serialize};

use camptrack_domain::{Assignment, Campaign, MaterialCondition, Payment, Provider};

/// API request to create a new campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
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
    /// Campaign kind wire value (MASS or PROXIMITY).
    pub kind: String,
    /// Start date (`YYYY-MM-DD`).
    pub start_date: String,
    /// End date (`YYYY-MM-DD`), exclusive of the start.
    pub end_date: String,
}

/// API request to move a campaign's date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCampaignDatesRequest {
    /// New start date (`YYYY-MM-DD`).
    pub start_date: String,
    /// New end date (`YYYY-MM-DD`).
    pub end_date: String,
}

/// API request to transition a campaign's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCampaignRequest {
    /// Target status wire value (PLANNED, ONGOING, FINISHED, CANCELLED).
    pub status: String,
}

/// API request to register a file against a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFileRequest {
    pub label: String,
    pub url: String,
}

/// API request to attach a provider to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachProviderRequest {
    pub provider_id: i64,
}

/// API request to record an installed-poster photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterImageRequest {
    pub url: String,
}

/// API request to record a material condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConditionRequest {
    pub campaign_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub material_name: String,
    /// Grade wire value (GOOD, MEDIUM, BAD).
    pub grade: String,
    pub description: Option<String>,
    /// Explicit penalty override; omitted means "use the tariff".
    pub penalty_amount: Option<i64>,
    /// Omitted means "applied iff the grade is BAD".
    pub penalty_applied: Option<bool>,
    pub photo_url: Option<String>,
}

/// API request to override a condition's penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConditionRequest {
    pub penalty_amount: Option<i64>,
    pub penalty_applied: Option<bool>,
}

/// API request to record a settlement transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransactionRequest {
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
}

/// API request to renew a finished campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewCampaignRequest {
    /// Successor start date (`YYYY-MM-DD`).
    pub start_date: String,
    /// Successor end date (`YYYY-MM-DD`).
    pub end_date: String,
    /// Optional restriction of the candidate set.
    pub provider_ids: Option<Vec<i64>>,
}

/// API response wrapping a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub campaign: Campaign,
    pub message: String,
}

/// API response wrapping an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub assignment: Assignment,
    pub message: String,
}

/// API response wrapping a material condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResponse {
    pub condition: MaterialCondition,
    pub message: String,
}

/// API response wrapping a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment: Payment,
    pub message: String,
}

/// API response for a read-only reconciliation preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePreviewResponse {
    /// The BASE payment that would be updated, if one exists yet.
    pub payment_id: Option<i64>,
    pub base_amount: i64,
    pub sanction_amount: i64,
    pub final_amount: i64,
}

/// A renewal candidate that was left behind, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCandidateInfo {
    pub provider_id: i64,
    pub provider_name: String,
    pub reason: String,
}

/// API response for a successful renewal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalResponse {
    /// The newly created successor campaign.
    pub campaign: Campaign,
    pub attached_count: i64,
    pub skipped: Vec<SkippedCandidateInfo>,
    pub message: String,
}

/// API response for a confirmed de-installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallationResponse {
    pub assignment: Assignment,
    /// The fixed de-installation fee issued by the confirmation.
    pub payment: Payment,
    pub message: String,
}

/// One assignment awaiting (or past) de-installation confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallationCandidateInfo {
    pub campaign: Campaign,
    pub provider: Provider,
    pub assignment: Assignment,
    /// Present once the confirmation has issued the fee.
    pub deinstallation_payment: Option<Payment>,
}
