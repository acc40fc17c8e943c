// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations over the persistence layer.
//!
//! Each handler enforces authorization, parses the wire request into
//! domain types, delegates to persistence, and translates errors into
//! the API contract. Handlers that change something an operator cares
//! about publish a notification event after the write commits.

use time::{Date, OffsetDateTime};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AssignmentResponse, AttachProviderRequest, CampaignResponse, ConditionResponse,
    CreateCampaignRequest, PaymentResponse, PosterImageRequest, ReconcilePreviewResponse,
    RecordConditionRequest, RecordTransactionRequest, RegisterFileRequest, RenewCampaignRequest,
    RenewalResponse, SkippedCandidateInfo, TransitionCampaignRequest, UninstallationCandidateInfo,
    UninstallationResponse, UpdateCampaignDatesRequest, UpdateConditionRequest,
};
use camptrack::ReconcilePlan;
use camptrack_domain::{
    Assignment, Campaign, CampaignKind, CampaignStatus, MaterialCondition, MaterialGrade, Payment,
    parse_date,
};
use camptrack_notify::{NotificationEvent, NotificationSink};
use camptrack_persistence::{
    NewCampaign, NewMaterialCondition, Persistence, RenewalOutcome, UninstallationOutcome,
};

fn parse_wire_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: e.to_string(),
    })
}

// --- Campaign lifecycle ---

/// Creates a campaign in the PLANNED status.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized, a field fails to
/// parse, a referenced entity is missing, or the location is already
/// booked for an overlapping window.
pub fn create_campaign(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateCampaignRequest,
    now: OffsetDateTime,
) -> Result<CampaignResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_campaign")?;

    let kind: CampaignKind = request
        .kind
        .parse()
        .map_err(|e| translate_domain_error(&e))?;
    let new = NewCampaign {
        name: request.name,
        description: request.description,
        objective: request.objective,
        client_id: request.client_id,
        location_id: request.location_id,
        service_id: request.service_id,
        manager: request.manager,
        supervisor: request.supervisor,
        target_quantity: request.target_quantity,
        target_provider_count: request.target_provider_count,
        kind,
        start_date: parse_wire_date("start_date", &request.start_date)?,
        end_date: parse_wire_date("end_date", &request.end_date)?,
    };

    let campaign: Campaign = db.create_campaign(&new, now)?;
    let message: String = format!("Successfully created campaign '{}'", campaign.name);
    Ok(CampaignResponse { campaign, message })
}

/// Moves a campaign's date window.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized, the dates are invalid,
/// or the new window collides with another campaign at the location.
pub fn update_campaign_dates(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    campaign_id: i64,
    request: UpdateCampaignDatesRequest,
    now: OffsetDateTime,
) -> Result<CampaignResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_campaign_dates")?;

    let start: Date = parse_wire_date("start_date", &request.start_date)?;
    let end: Date = parse_wire_date("end_date", &request.end_date)?;
    let campaign: Campaign = db.update_campaign_dates(campaign_id, start, end, now)?;
    let message: String = format!("Successfully rescheduled campaign '{}'", campaign.name);
    Ok(CampaignResponse { campaign, message })
}

/// Transitions a campaign to a new status.
///
/// Requires the Admin role. Publishes a status-change event on success.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized, the target status does
/// not parse, or the transition is not allowed from the current status.
pub fn transition_campaign(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    sink: &dyn NotificationSink,
    campaign_id: i64,
    request: &TransitionCampaignRequest,
    now: OffsetDateTime,
) -> Result<CampaignResponse, ApiError> {
    AuthorizationService::require_admin(actor, "transition_campaign")?;

    let target: CampaignStatus = request
        .status
        .parse()
        .map_err(|e| translate_domain_error(&e))?;
    let before: Campaign = db.get_campaign(campaign_id)?;
    let campaign: Campaign = db.transition_campaign(campaign_id, target, now)?;

    sink.publish(&NotificationEvent::CampaignStatusChanged {
        campaign_id,
        from: String::from(before.status.as_str()),
        to: String::from(campaign.status.as_str()),
    });
    let message: String = format!(
        "Campaign '{}' is now {}",
        campaign.name,
        campaign.status.as_str()
    );
    Ok(CampaignResponse { campaign, message })
}

/// Deletes a campaign that has no assignments and no files.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized or a delete guard
/// blocks the removal.
pub fn delete_campaign(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    campaign_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "delete_campaign")?;
    db.delete_campaign(campaign_id)?;
    Ok(())
}

/// Registers a file (contract, brief, artwork) against a campaign.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized or the campaign does
/// not exist.
pub fn register_campaign_file(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    campaign_id: i64,
    request: &RegisterFileRequest,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "register_campaign_file")?;
    db.register_campaign_file(campaign_id, &request.label, &request.url, now)?;
    Ok(())
}

/// Loads one campaign.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist.
pub fn get_campaign(db: &mut Persistence, campaign_id: i64) -> Result<Campaign, ApiError> {
    Ok(db.get_campaign(campaign_id)?)
}

/// Lists every campaign.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_campaigns(db: &mut Persistence) -> Result<Vec<Campaign>, ApiError> {
    Ok(db.list_campaigns()?)
}

// --- Assignments ---

/// Attaches a provider to a campaign after the eligibility checks pass.
///
/// Requires the Admin role. Publishes an assignment-created event on
/// success.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized or any eligibility
/// check rejects the pair.
pub fn attach_provider(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    sink: &dyn NotificationSink,
    campaign_id: i64,
    request: &AttachProviderRequest,
    now: OffsetDateTime,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::require_admin(actor, "attach_provider")?;

    let assignment: Assignment = db.attach_provider(campaign_id, request.provider_id, now)?;
    sink.publish(&NotificationEvent::AssignmentCreated {
        campaign_id,
        provider_id: request.provider_id,
    });
    Ok(AssignmentResponse {
        assignment,
        message: String::from("Successfully attached provider"),
    })
}

/// Detaches a provider from a campaign, allowed only before settlement
/// starts.
///
/// Requires the Admin role. Publishes an assignment-removed event on
/// success.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized, the assignment does
/// not exist, or any money has moved for the pair.
pub fn detach_provider(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    sink: &dyn NotificationSink,
    campaign_id: i64,
    provider_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "detach_provider")?;

    db.detach_provider(campaign_id, provider_id)?;
    sink.publish(&NotificationEvent::AssignmentRemoved {
        campaign_id,
        provider_id,
    });
    Ok(())
}

/// Records the installed-poster photo for an assignment.
///
/// # Errors
///
/// Returns an error if the assignment does not exist.
pub fn set_poster_image(
    db: &mut Persistence,
    campaign_id: i64,
    provider_id: i64,
    request: &PosterImageRequest,
) -> Result<AssignmentResponse, ApiError> {
    db.set_poster_image(campaign_id, provider_id, &request.url)?;
    let assignment: Assignment = db.get_assignment(campaign_id, provider_id)?;
    Ok(AssignmentResponse {
        assignment,
        message: String::from("Poster image recorded"),
    })
}

/// Lists a campaign's assignments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_assignments(
    db: &mut Persistence,
    campaign_id: i64,
) -> Result<Vec<Assignment>, ApiError> {
    Ok(db.list_assignments(campaign_id)?)
}

// --- Material conditions ---

/// Records a material condition observed in the field.
///
/// Open to controllers. Publishes a penalty-applied event when the
/// condition carries an applied penalty against a campaign pair.
///
/// # Errors
///
/// Returns an error if the grade does not parse or a referenced entity
/// is missing.
pub fn record_condition(
    db: &mut Persistence,
    sink: &dyn NotificationSink,
    request: RecordConditionRequest,
    now: OffsetDateTime,
) -> Result<ConditionResponse, ApiError> {
    let grade: MaterialGrade = request
        .grade
        .parse()
        .map_err(|e| translate_domain_error(&e))?;
    let new = NewMaterialCondition {
        campaign_id: request.campaign_id,
        provider_id: request.provider_id,
        material_name: request.material_name,
        grade,
        description: request.description,
        penalty_amount: request.penalty_amount,
        penalty_applied: request.penalty_applied,
        photo_url: request.photo_url,
    };

    let condition: MaterialCondition = db.record_material_condition(&new, now)?;
    if condition.penalty_applied
        && condition.penalty_amount > 0
        && let (Some(campaign_id), Some(provider_id)) =
            (condition.campaign_id, condition.provider_id)
    {
        sink.publish(&NotificationEvent::PenaltyApplied {
            campaign_id,
            provider_id,
            amount: condition.penalty_amount,
        });
    }
    Ok(ConditionResponse {
        condition,
        message: String::from("Material condition recorded"),
    })
}

/// Overrides a condition's penalty amount and/or applied flag.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized or the condition does
/// not exist.
pub fn update_condition(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    condition_id: i64,
    request: &UpdateConditionRequest,
    now: OffsetDateTime,
) -> Result<ConditionResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_condition")?;

    let condition: MaterialCondition = db.update_material_condition(
        condition_id,
        request.penalty_amount,
        request.penalty_applied,
        now,
    )?;
    Ok(ConditionResponse {
        condition,
        message: String::from("Material condition updated"),
    })
}

/// Deletes a condition and re-reconciles the pair it belonged to.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized or the condition does
/// not exist.
pub fn delete_condition(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    condition_id: i64,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(actor, "delete_condition")?;
    db.delete_material_condition(condition_id, now)?;
    Ok(())
}

/// Lists the conditions recorded against a pair.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_conditions(
    db: &mut Persistence,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Vec<MaterialCondition>, ApiError> {
    Ok(db.list_material_conditions(campaign_id, provider_id)?)
}

// --- Payments ---

/// Recomputes a pair's BASE payment from its material conditions.
///
/// # Errors
///
/// Returns an error if the campaign or provider does not exist.
pub fn reconcile_payment(
    db: &mut Persistence,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<PaymentResponse, ApiError> {
    let payment: Payment = db.reconcile_payment(campaign_id, provider_id, now)?;
    Ok(PaymentResponse {
        payment,
        message: String::from("Payment reconciled"),
    })
}

/// Previews what a reconciliation would produce, without writing.
///
/// # Errors
///
/// Returns an error if the campaign or provider does not exist.
pub fn preview_reconciliation(
    db: &mut Persistence,
    campaign_id: i64,
    provider_id: i64,
) -> Result<ReconcilePreviewResponse, ApiError> {
    let plan: ReconcilePlan = db.preview_reconciliation(campaign_id, provider_id)?;
    Ok(ReconcilePreviewResponse {
        payment_id: plan.payment_id,
        base_amount: plan.base,
        sanction_amount: plan.sanction,
        final_amount: plan.final_amount,
    })
}

/// Records a settlement transaction against a payment.
///
/// Open to controllers; the actor is recorded as the transaction's
/// author. Publishes a settled event when the payment reaches PAYE.
///
/// # Errors
///
/// Returns an error if the payment does not exist or the amount is not
/// strictly positive.
pub fn record_transaction(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    sink: &dyn NotificationSink,
    payment_id: i64,
    request: &RecordTransactionRequest,
    now: OffsetDateTime,
) -> Result<PaymentResponse, ApiError> {
    let before: Payment = db.get_payment(payment_id)?;
    let payment: Payment = db.record_payment_transaction(
        payment_id,
        request.amount,
        &request.method,
        request.reference.as_deref(),
        request.note.as_deref(),
        &actor.id,
        now,
    )?;

    if payment.is_paid && !before.is_paid {
        sink.publish(&NotificationEvent::PaymentSettled {
            payment_id,
            payment_type: payment.payment_type,
        });
    }
    Ok(PaymentResponse {
        payment,
        message: String::from("Transaction recorded"),
    })
}

/// Lists every payment for a pair.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_payments(
    db: &mut Persistence,
    campaign_id: i64,
    provider_id: i64,
) -> Result<Vec<Payment>, ApiError> {
    Ok(db.list_payments_for_pair(campaign_id, provider_id)?)
}

// --- Renewal ---

/// Renews a finished campaign into a PLANNED successor.
///
/// Requires the Admin role. Publishes a renewed event on success.
///
/// # Errors
///
/// Returns an error if the actor is unauthorized, the source is not
/// FINISHED, the candidate set is empty or fully skipped, or the new
/// window collides at the location.
pub fn renew_campaign(
    db: &mut Persistence,
    actor: &AuthenticatedActor,
    sink: &dyn NotificationSink,
    campaign_id: i64,
    request: &RenewCampaignRequest,
    now: OffsetDateTime,
) -> Result<RenewalResponse, ApiError> {
    AuthorizationService::require_admin(actor, "renew_campaign")?;

    let start: Date = parse_wire_date("start_date", &request.start_date)?;
    let end: Date = parse_wire_date("end_date", &request.end_date)?;
    let outcome: RenewalOutcome =
        db.renew_campaign(campaign_id, start, end, request.provider_ids.as_deref(), now)?;

    sink.publish(&NotificationEvent::CampaignRenewed {
        source_campaign_id: campaign_id,
        new_campaign_id: outcome.campaign.campaign_id,
    });
    let message: String = format!(
        "Successfully renewed campaign into '{}'",
        outcome.campaign.name
    );
    Ok(RenewalResponse {
        campaign: outcome.campaign,
        attached_count: outcome.attached_count,
        skipped: outcome
            .skipped
            .into_iter()
            .map(|s| SkippedCandidateInfo {
                provider_id: s.provider_id,
                provider_name: s.provider_name,
                reason: s.reason,
            })
            .collect(),
        message,
    })
}

// --- Uninstallation ---

/// Confirms a provider's de-installation and issues the fixed fee.
///
/// Open to controllers. Publishes a confirmed event on success.
///
/// # Errors
///
/// Returns an error if the campaign has not ended, the confirmation
/// already happened, or the fee was already issued.
pub fn confirm_uninstallation(
    db: &mut Persistence,
    sink: &dyn NotificationSink,
    campaign_id: i64,
    provider_id: i64,
    now: OffsetDateTime,
) -> Result<UninstallationResponse, ApiError> {
    let outcome: UninstallationOutcome = db.confirm_uninstallation(campaign_id, provider_id, now)?;
    sink.publish(&NotificationEvent::UninstallationConfirmed {
        campaign_id,
        provider_id,
    });
    Ok(UninstallationResponse {
        assignment: outcome.assignment,
        payment: outcome.payment,
        message: String::from("De-installation confirmed"),
    })
}

/// Lists every assignment open for de-installation confirmation.
///
/// # Errors
///
/// Returns an error if any read fails.
pub fn list_uninstallation_eligible(
    db: &mut Persistence,
    now: OffsetDateTime,
) -> Result<Vec<UninstallationCandidateInfo>, ApiError> {
    let candidates = db.list_uninstallation_eligible(now.date())?;
    Ok(candidates
        .into_iter()
        .map(|c| UninstallationCandidateInfo {
            campaign: c.campaign,
            provider: c.provider,
            assignment: c.assignment,
            deinstallation_payment: c.deinstallation_payment,
        })
        .collect())
}
