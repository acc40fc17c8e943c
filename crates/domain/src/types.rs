// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Represents the lifecycle state of a campaign.
///
/// Transitions only move forward: a campaign is planned, runs, and then
/// either finishes or is cancelled. Terminal states have no outgoing
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CampaignStatus {
    /// Initial state after creation. Providers may be attached.
    #[default]
    Planned,
    /// The campaign is running in the field.
    Ongoing,
    /// The campaign ended normally. Terminal.
    Finished,
    /// The campaign was cancelled. Terminal.
    Cancelled,
}

impl FromStr for CampaignStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(Self::Planned),
            "ONGOING" => Ok(Self::Ongoing),
            "FINISHED" => Ok(Self::Finished),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidCampaignStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CampaignStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Ongoing => "ONGOING",
            Self::Finished => "FINISHED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Planned → Ongoing
    /// - Planned → Cancelled
    /// - Ongoing → Finished
    /// - Ongoing → Cancelled
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planned, Self::Ongoing)
                | (Self::Planned, Self::Cancelled)
                | (Self::Ongoing, Self::Finished)
                | (Self::Ongoing, Self::Cancelled)
        )
    }

    /// Returns whether this status has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

/// Campaign delivery model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignKind {
    /// High-volume coverage across a wide area.
    Mass,
    /// Targeted coverage close to specific points of interest.
    Proximity,
}

impl FromStr for CampaignKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MASS" => Ok(Self::Mass),
            "PROXIMITY" => Ok(Self::Proximity),
            _ => Err(DomainError::InvalidCampaignKind(s.to_string())),
        }
    }
}

impl CampaignKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mass => "MASS",
            Self::Proximity => "PROXIMITY",
        }
    }
}

/// Classification of the commissioning client.
///
/// The client type drives the tariff scales for base payments and
/// material-condition penalties (see the `tariffs` module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientType {
    /// A third-party client.
    External,
    /// An in-house campaign.
    Internal,
}

impl FromStr for ClientType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXTERNAL" => Ok(Self::External),
            "INTERNAL" => Ok(Self::Internal),
            _ => Err(DomainError::InvalidClientType(s.to_string())),
        }
    }
}

impl ClientType {
    /// Converts this client type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::External => "EXTERNAL",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Represents the commitment state of an assignment.
///
/// The status enum is the single source of truth for whether a provider is
/// committed; `end_date` is an orthogonal scheduling field. An assignment is
/// "open" (blocking the provider from other campaigns) unless it is Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssignmentStatus {
    /// Open-ended commitment created by a normal attach.
    #[default]
    Active,
    /// Commitment with a concrete scheduled end date, created by renewal.
    ScheduledEnd,
    /// The commitment has ended. Terminal.
    Closed,
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "SCHEDULED_END" => Ok(Self::ScheduledEnd),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidAssignmentStatus(s.to_string())),
        }
    }
}

impl AssignmentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::ScheduledEnd => "SCHEDULED_END",
            Self::Closed => "CLOSED",
        }
    }

    /// Returns whether this assignment still commits the provider.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Condition grade recorded by a field controller for a provider's material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialGrade {
    Good,
    Medium,
    /// Damaged material. Triggers the default penalty at creation time.
    Bad,
}

impl FromStr for MaterialGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GOOD" => Ok(Self::Good),
            "MEDIUM" => Ok(Self::Medium),
            "BAD" => Ok(Self::Bad),
            _ => Err(DomainError::InvalidMaterialGrade(s.to_string())),
        }
    }
}

impl MaterialGrade {
    /// Converts this grade to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Medium => "MEDIUM",
            Self::Bad => "BAD",
        }
    }
}

/// Settlement category of a payment.
///
/// A (campaign, provider) pair may hold at most one payment per type: the
/// BASE payment for the assignment itself and a separate DEINSTALLATION fee
/// issued when the provider removes the material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// The assignment's base remuneration, reduced by applied sanctions.
    Base,
    /// The fixed de-installation fee.
    Deinstallation,
}

impl FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASE" => Ok(Self::Base),
            "DEINSTALLATION" => Ok(Self::Deinstallation),
            _ => Err(DomainError::InvalidPaymentType(s.to_string())),
        }
    }
}

impl PaymentType {
    /// Converts this payment type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::Deinstallation => "DEINSTALLATION",
        }
    }
}

/// Settlement progress of a payment, derived from its transactions.
///
/// The status strings keep the legacy wire values used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    /// No amount has been received yet.
    #[default]
    Pending,
    /// Some amount has been received, but less than the final amount.
    Partial,
    /// The cumulative received amount covers the final amount.
    Paid,
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN_ATTENTE" => Ok(Self::Pending),
            "PARTIEL" => Ok(Self::Partial),
            "PAYE" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PaymentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "EN_ATTENTE",
            Self::Partial => "PARTIEL",
            Self::Paid => "PAYE",
        }
    }

    /// Derives the status from the cumulative transaction total.
    ///
    /// - `PAYE` when `total_paid >= final_amount`
    /// - `PARTIEL` when `0 < total_paid < final_amount`
    /// - `EN_ATTENTE` when `total_paid == 0`
    ///
    /// A zero final amount with no transactions stays `EN_ATTENTE`; the
    /// first transaction settles it.
    #[must_use]
    pub const fn from_totals(total_paid: i64, final_amount: i64) -> Self {
        if total_paid == 0 {
            Self::Pending
        } else if total_paid >= final_amount {
            Self::Paid
        } else {
            Self::Partial
        }
    }

    /// Legacy boolean mirror: `true` iff fully paid.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A time-boxed advertising engagement for a client at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Canonical identifier assigned by the database.
    pub campaign_id: i64,
    /// Display name.
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    /// The commissioning client.
    pub client_id: i64,
    /// The location the campaign occupies. At most one non-cancelled
    /// campaign may occupy a location for overlapping date ranges.
    pub location_id: i64,
    /// The service category providers must match to be attached.
    pub service_id: i64,
    /// Opaque reference to the managing staff member.
    pub manager: String,
    /// Optional opaque reference to a supervising staff member.
    pub supervisor: Option<String>,
    /// Target quantity of advertising material.
    pub target_quantity: i64,
    /// Maximum number of providers; `None` means unlimited.
    pub target_provider_count: Option<i64>,
    pub kind: CampaignKind,
    /// First day of the campaign (inclusive).
    pub start_date: Date,
    /// Last day of the campaign (inclusive). Must be after `start_date`.
    pub end_date: Date,
    pub status: CampaignStatus,
    /// Set when this campaign was created by renewing another.
    pub parent_campaign_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Campaign {
    /// Returns the campaign duration in whole days.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).whole_days()
    }

    /// Returns whether the campaign's end date has passed.
    #[must_use]
    pub fn has_ended(&self, today: Date) -> bool {
        self.end_date < today
    }
}

/// Vehicle descriptor for a provider's tricycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub panel_type: Option<String>,
    /// Registration plate. Globally unique among providers when present.
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// An individual tricycle operator who carries advertising material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Canonical identifier assigned by the database.
    pub provider_id: i64,
    pub name: String,
    pub contact: String,
    /// The service category this provider works in.
    pub service_id: i64,
    /// Derived cache: `true` means "not committed to any non-terminal
    /// campaign". Mutators recompute it from the assignment table;
    /// correctness-critical decisions must not trust it alone.
    pub available: bool,
    pub vehicle: VehicleInfo,
    /// Per-service verification code.
    pub verification_code: Option<String>,
    pub contract_valid: bool,
    pub gps_equipped: bool,
}

/// The link between one provider and one campaign for a period.
///
/// At most one assignment ever exists per (campaign, provider) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub campaign_id: i64,
    pub provider_id: i64,
    pub status: AssignmentStatus,
    pub created_at: String,
    /// Scheduled or effective end of the commitment. `None` for open-ended
    /// ACTIVE assignments; concrete for renewal-created assignments and
    /// stamped when the assignment is closed.
    pub end_date: Option<OffsetDateTime>,
    /// Set once the provider has confirmed removing the material.
    pub deinstalled_at: Option<OffsetDateTime>,
    /// URL of the installed-poster photo, if uploaded.
    pub poster_image: Option<String>,
}

impl Assignment {
    /// Returns whether this assignment still commits the provider.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// An inspection record of a provider's advertising material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCondition {
    pub condition_id: i64,
    pub campaign_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub material_name: String,
    pub grade: MaterialGrade,
    pub description: Option<String>,
    /// Monetary penalty. Policy-derived at creation for BAD grades, but may
    /// be overridden on update.
    pub penalty_amount: i64,
    /// Only applied penalties count toward the pair's sanction total.
    pub penalty_applied: bool,
    pub photo_url: Option<String>,
    pub created_at: String,
}

/// The monetary settlement owed to a provider for one assignment or one
/// de-installation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub campaign_id: i64,
    pub provider_id: i64,
    pub payment_type: PaymentType,
    pub base_amount: i64,
    pub sanction_amount: i64,
    /// Always `max(0, base_amount - sanction_amount)`.
    pub final_amount: i64,
    pub status: PaymentStatus,
    /// Legacy boolean mirror of `status`: `true` iff PAYE.
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub created_at: String,
}

/// A single settlement installment against a payment. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub transaction_id: i64,
    pub payment_id: i64,
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
}
